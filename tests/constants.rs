//! Every execution context reads the same value from a defined constant.

#![allow(clippy::approx_constant, clippy::float_cmp)]

use std::sync::Mutex;

use hemi::{
    config::Config,
    device::{Dim3, Idx3, Thread},
    kernel::{dispatch, LaunchConfig, StreamId},
    mode::ACCELERATOR_COMPILER,
    runtime::{Device, Runtime},
};

hemi::define_constant! {
    static PI: f32 = 3.14159;
}

#[hemi::kernel]
fn read_pi(thread: &Thread, reads: &Mutex<Vec<f32>>) {
    reads
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .push(PI.get(thread));
}

#[test]
fn host_reads_the_definition() {
    assert_eq!(PI.get(&Thread::host()), 3.14159);
}

#[test]
fn launched_threads_read_the_definition() {
    let reads = Mutex::new(Vec::new());

    hemi::launch!(read_pi, Dim3::linear(2), Dim3::linear(2), 0, StreamId::DEFAULT, &reads);

    let reads = reads.into_inner().unwrap_or_default();

    assert!(!reads.is_empty());
    assert!(reads.iter().all(|&pi| pi == 3.14159));
}

#[test]
fn every_device_thread_reads_the_device_copy() {
    let device = Device::new(&Config::default());
    let reads = Mutex::new(Vec::new());
    let config = LaunchConfig::new((2_u32, 2_u32), (3_u32, 1_u32, 2_u32), 0, StreamId::DEFAULT);

    dispatch(&device, "read_pi", &config, &read_pi_kernel, (&reads,));
    assert_eq!(device.synchronize(), Ok(()));

    assert_eq!(reads.into_inner().unwrap_or_default(), vec![3.14159; 24]);
    assert_eq!(PI.device().read(&Thread::host()), None);
}

#[test]
fn device_copy_reads_agree_with_get() {
    let thread = Thread::device(Idx3::ZERO, Idx3::ZERO, Dim3::ONE, Dim3::ONE);

    assert_eq!(PI.get(&thread), 3.14159);
    assert_eq!(PI.device().read(&thread).is_some(), ACCELERATOR_COMPILER);
}

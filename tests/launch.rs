//! `launch!` runs the same call site in the plain host and accelerator builds.

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Mutex,
};

use hemi::{
    check::{check_runtime_call, CheckPolicy, ErrorChecker},
    config::Config,
    device::{grid_stride, Dim3, Thread},
    kernel::{dispatch, LaunchConfig, StreamId},
    mode::{Mode, ACCELERATOR_COMPILER},
    runtime::{Device, Runtime, RuntimeError},
};

hemi::define_constant! {
    static SCALE: f32 = 2.0;
}

#[hemi::callable(inline)]
fn saxpy_element(a: f32, x: f32, y: f32) -> f32 {
    a * x + y
}

#[hemi::kernel]
fn saxpy(thread: &Thread, a: f32, x: &[f32], y: &[f32], out: &[AtomicU32]) {
    for idx in grid_stride(thread, out.len()) {
        let value = saxpy_element(a * SCALE.get(thread), x[idx], y[idx]);
        out[idx].store(value.to_bits(), Ordering::Relaxed);
    }
}

#[hemi::kernel]
fn modes(thread: &Thread, seen: &Mutex<Vec<Mode>>) {
    seen.lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .push(Mode::current(thread));
}

#[hemi::kernel]
#[allow(clippy::panic)]
fn fault(thread: &Thread) {
    if thread.index() == 3 {
        panic!("device fault");
    }
}

struct Shape {
    width: f32,
    height: f32,
}

impl Shape {
    #[hemi::callable]
    fn area(&self) -> f32 {
        self.width * self.height
    }

    #[hemi::callable(inline)]
    fn scaled(&self, thread: &Thread) -> f32 {
        self.area() * SCALE.get(thread)
    }
}

#[test]
#[allow(clippy::float_cmp)]
fn saxpy_matches_in_either_build() {
    let x = (0..100).map(|i| i as f32).collect::<Vec<_>>();
    let y = vec![1.0_f32; 100];
    let out = (0..100).map(|_| AtomicU32::new(0)).collect::<Vec<_>>();

    hemi::launch!(
        saxpy,
        Dim3::linear(4),
        Dim3::linear(8),
        0,
        StreamId::DEFAULT,
        0.5,
        x.as_slice(),
        y.as_slice(),
        out.as_slice(),
    );

    for (i, out) in out.iter().enumerate() {
        assert_eq!(f32::from_bits(out.load(Ordering::Relaxed)), i as f32 + 1.0);
    }
}

#[test]
fn launch_reports_the_build_mode() {
    let seen = Mutex::new(Vec::new());

    hemi::launch!(modes, Dim3::linear(2), Dim3::linear(3), 0, StreamId(1), &seen);

    let seen = seen.into_inner().unwrap_or_default();

    if ACCELERATOR_COMPILER {
        assert_eq!(seen, vec![Mode::AcceleratorDevice; 6]);
    } else {
        assert_eq!(seen, vec![Mode::Host]);
    }
}

#[test]
#[allow(clippy::float_cmp)]
fn callable_methods_run_on_host_and_device() {
    let shape = Shape {
        width: 2.0,
        height: 3.0,
    };
    let device = Device::new(&Config::default());
    let areas = Mutex::new(Vec::new());

    let measure = |thread: &Thread, shape: &Shape, areas: &Mutex<Vec<f32>>| {
        areas
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(shape.scaled(thread));
    };

    assert_eq!(shape.scaled(&Thread::host()), 12.0);

    dispatch(
        &device,
        "measure",
        &LaunchConfig::new(Dim3::ONE, Dim3::linear(2), 0, StreamId::DEFAULT),
        &measure,
        (&shape, &areas),
    );

    assert_eq!(areas.into_inner().unwrap_or_default(), vec![12.0, 12.0]);
}

#[test]
fn device_faults_surface_through_the_last_error() {
    let device = Device::new(&Config::default());
    let config = LaunchConfig::new(Dim3::linear(2), Dim3::linear(2), 0, StreamId::DEFAULT);

    dispatch(&device, "fault", &config, &fault_kernel, ());

    let checker = ErrorChecker::new(CheckPolicy::PassThrough);
    assert_eq!(checker.check_async(&device), Ok(()));

    let err = checker.check(device.last_error());
    assert!(matches!(
        err,
        Err(RuntimeError::LaunchFailure { kernel: "fault", ref message, .. })
            if message == "device fault"
    ));
    assert_eq!(device.last_error(), Ok(()));
}

#[test]
#[should_panic(expected = "kernel `fault` failed")]
fn device_faults_abort_under_the_abort_policy() {
    let device = Device::new(&Config::default());
    let config = LaunchConfig::new(Dim3::ONE, Dim3::linear(4), 0, StreamId::DEFAULT);

    dispatch(&device, "fault", &config, &fault_kernel, ());

    let _ = ErrorChecker::new(CheckPolicy::Abort).check_async(&device);
}

#[test]
fn successful_calls_pass_through() {
    assert_eq!(check_runtime_call(Ok("done")), Ok("done"));
}

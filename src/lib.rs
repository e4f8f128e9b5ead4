//! `hemi` lets one kernel or helper definition run either sequentially on
//! the host or as a parallel grid of threads on an accelerator device, with
//! the choice made at build time by the `accelerator` feature.
//!
//! - [`kernel`] declares a kernel entry point, and [`launch!`] invokes it,
//!   either once on the host or once per thread of a grid on the device.
//! - [`callable`] marks helpers that both host code and device threads call.
//! - [`device::element_offset`] and [`device::element_stride`] make one
//!   grid-strided loop correct in both builds.
//! - [`define_constant!`] creates constants with a host copy and a device
//!   copy.
//! - [`check::check_runtime_call`] and [`check::check_async_errors`] abort on
//!   runtime failures in debug builds and pass them through otherwise.
//!
//! The device is the [`runtime::Device`], which executes the blocks of a grid
//! in parallel on a pool of worker threads.

#![deny(clippy::pedantic)]

pub mod check;
pub mod config;
pub mod constant;
pub mod device;
pub mod kernel;
pub mod mode;
pub mod runtime;

pub use hemi_kernel::callable;
pub use kernel::{kernel, kernel_name};

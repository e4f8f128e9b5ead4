//! The accelerator runtime that kernels are launched on.
//!
//! [`Runtime`] is the seam to the runtime: it executes grids, and reports
//! failures asynchronously through a last-error state instead of through the
//! launch itself. [`Device`] is the runtime that ships with this crate, it
//! executes grids on a pool of worker threads.

mod device;
mod error;

pub use device::{Device, DeviceLimits};
pub use error::{RuntimeError, RuntimeResult};

use crate::kernel::{Kernel, LaunchConfig};

/// An accelerator runtime that grids are launched on.
pub trait Runtime: Sync {
    /// Executes the kernel `name` once per thread of the grid described by
    /// `config`, handing every thread its own execution context and `args`.
    ///
    /// Failures are not returned but recorded as the runtime's last error.
    fn launch<Args: Sync, K: Kernel<Args> + ?Sized>(
        &self,
        name: &'static str,
        config: &LaunchConfig,
        kernel: &K,
        args: &Args,
    );

    /// Blocks until all outstanding work on the runtime has completed.
    ///
    /// # Errors
    ///
    /// Returns the most recent failure of previously launched work, without
    /// clearing it.
    fn synchronize(&self) -> RuntimeResult;

    /// Fetches and clears the most recent failure.
    ///
    /// # Errors
    ///
    /// Returns the most recent failure, if any was recorded since the last
    /// call.
    fn last_error(&self) -> RuntimeResult;

    /// Like [`Runtime::last_error`], but leaves the failure in place.
    ///
    /// # Errors
    ///
    /// Returns the most recent failure, if any.
    fn peek_error(&self) -> RuntimeResult;
}

//! Detection of the build mode and of the execution context.
//!
//! The `accelerator` feature selects the accelerator build, in which
//! [`launch!`](crate::launch) dispatches grids onto the device. Without it,
//! the crate behaves like a plain host build and kernels run sequentially.

use crate::device::{Location, Thread};

/// `true` iff this is the accelerator build.
pub const ACCELERATOR_COMPILER: bool = cfg!(feature = "accelerator");

/// `true` iff this is the plain host build.
pub const HOST_COMPILER: bool = !ACCELERATOR_COMPILER;

/// Where the accelerator build sends kernels: `"Device"`, or `"Host"` in
/// the plain host build.
pub const LOCATION: &str = if ACCELERATOR_COMPILER {
    "Device"
} else {
    "Host"
};

/// Version of the portability layer, `major * 100000 + minor * 100`.
pub const VERSION: u32 = 100;

/// The `(major, minor)` version encoded in [`VERSION`].
#[must_use]
pub const fn version() -> (u32, u32) {
    (VERSION / 100_000, VERSION / 100 % 1000)
}

/// Build mode combined with the execution context of a piece of code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Plain host build.
    Host,
    /// Host code of the accelerator build.
    AcceleratorHost,
    /// Device code of the accelerator build.
    AcceleratorDevice,
}

impl Mode {
    /// The mode in which code running in the execution context `thread`
    /// executes.
    #[must_use]
    #[hemi_kernel::callable(inline)]
    pub const fn current(thread: &Thread) -> Self {
        match (ACCELERATOR_COMPILER, thread.location()) {
            (false, _) => Self::Host,
            (true, Location::Host) => Self::AcceleratorHost,
            (true, Location::Device) => Self::AcceleratorDevice,
        }
    }

    /// `true` in both contexts of the accelerator build.
    #[must_use]
    pub const fn is_accelerator_compiler(self) -> bool {
        !matches!(self, Self::Host)
    }

    /// `true` only inside a device thread of the accelerator build.
    #[must_use]
    pub const fn is_device_code(self) -> bool {
        matches!(self, Self::AcceleratorDevice)
    }
}

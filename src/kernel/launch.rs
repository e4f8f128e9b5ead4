use core::fmt;

use super::Kernel;
use crate::{
    device::{Dim3, Thread},
    runtime::Runtime,
};

/// Identifier of the stream that a launch is issued on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct StreamId(pub u32);

impl StreamId {
    /// The default stream
    pub const DEFAULT: Self = Self(0);
}

impl From<u32> for StreamId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "stream {}", self.0)
    }
}

/// Shape and resources of a grid launch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LaunchConfig {
    /// Number of blocks in the grid
    pub grid: Dim3,
    /// Number of threads per block
    pub block: Dim3,
    /// Bytes of dynamic shared memory per block
    pub shared_bytes: usize,
    /// Stream that the launch is issued on
    pub stream: StreamId,
}

impl LaunchConfig {
    #[must_use]
    pub fn new(
        grid: impl Into<Dim3>,
        block: impl Into<Dim3>,
        shared_bytes: usize,
        stream: impl Into<StreamId>,
    ) -> Self {
        Self {
            grid: grid.into(),
            block: block.into(),
            shared_bytes,
            stream: stream.into(),
        }
    }
}

/// Invokes `kernel` once, sequentially, in the host execution context.
pub fn sequential<Args, K: Kernel<Args> + ?Sized>(kernel: &K, args: Args) {
    kernel.invoke(&Thread::host(), &args);
}

/// Launches `kernel` as the grid described by `config` on `runtime`.
///
/// Failures are recorded as the runtime's last error, see
/// [`Runtime::launch`].
pub fn dispatch<R: Runtime, Args: Sync, K: Kernel<Args> + ?Sized>(
    runtime: &R,
    name: &'static str,
    config: &LaunchConfig,
    kernel: &K,
    args: Args,
) {
    runtime.launch(name, config, kernel, &args);
}

#[cfg(feature = "accelerator")]
pub fn launch<Args: Sync, K: Kernel<Args> + ?Sized>(
    name: &'static str,
    config: &LaunchConfig,
    kernel: &K,
    args: Args,
) {
    dispatch(crate::runtime::Device::current(), name, config, kernel, args);

    // surface asynchronous launch failures at the launch site
    let _ = crate::check::check_async_errors();
}

#[cfg(not(feature = "accelerator"))]
pub fn launch<Args: Sync, K: Kernel<Args> + ?Sized>(
    name: &'static str,
    config: &LaunchConfig,
    kernel: &K,
    args: Args,
) {
    let _ = (name, config);

    sequential(kernel, args);
}

/// Launches the [`kernel`](crate::kernel) `name` as a grid of `grid` blocks
/// of `block` threads each, with `shared_bytes` of dynamic shared memory per
/// block, on `stream`, passing it the remaining arguments.
///
/// In the accelerator build the grid is dispatched onto
/// [`Device::current`](crate::runtime::Device::current), and launch failures
/// are checked right after under the current
/// [`check_policy`](crate::check::check_policy). In the plain host build the
/// launch configuration is ignored and the kernel is called once on the host.
///
/// The arguments are evaluated exactly once. They must be [`Sync`] and
/// [`Clone`] in both builds, so that a launch that compiles in one build
/// compiles in the other.
#[macro_export]
macro_rules! launch {
    (
        $name:ident, $grid:expr, $block:expr, $shared_bytes:expr, $stream:expr
        $(, $arg:expr)* $(,)?
    ) => {
        $crate::kernel::launch(
            ::core::stringify!($name),
            &$crate::kernel::LaunchConfig::new($grid, $block, $shared_bytes, $stream),
            &$crate::kernel_name!($name),
            ($($arg,)*),
        )
    };
}

use crate::device::Idx3;

/// Result of a runtime call, `Ok(())` being the success status.
pub type RuntimeResult<T = ()> = Result<T, RuntimeError>;

/// Failure status reported by an accelerator [`Runtime`](super::Runtime).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// The grid, block, or shared memory configuration of a launch is not
    /// supported by the device
    #[error("invalid launch configuration for kernel `{kernel}`: {reason}")]
    InvalidConfiguration {
        /// Name of the launched kernel
        kernel: &'static str,
        /// Violated device limit
        reason: String,
    },

    /// A device thread faulted while executing a kernel
    #[error("kernel `{kernel}` failed in thread {thread} of block {block}: {message}")]
    LaunchFailure {
        /// Name of the launched kernel
        kernel: &'static str,
        /// Index of the faulting block in the grid
        block: Idx3,
        /// Index of the faulting thread in its block
        thread: Idx3,
        /// Fault message
        message: String,
    },

    /// The device could not be initialised
    #[error("device initialisation failed: {0}")]
    NotInitialized(String),
}

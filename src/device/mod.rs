//! Execution contexts of host code and device threads, and the helpers that
//! partition element ranges between them.

mod partition;
mod thread;

pub use partition::{element_offset, element_stride, grid_stride};
pub use thread::{Dim3, Idx3, Location, Thread, ThreadBlock, ThreadBlockGrid};

//! Element offset and stride of the current thread for grid-strided loops.
//!
//! ```rust
//! # use hemi::device::{element_offset, element_stride, Thread};
//! # let thread = Thread::host();
//! # let n = 10;
//! let mut idx = element_offset(&thread);
//!
//! while idx < n {
//!     // process element `idx`
//!     idx += element_stride(&thread);
//! }
//! ```
//!
//! On the host the loop visits `0..n` in order. On the device every index in
//! `0..n` is visited by exactly one thread of the grid, whatever the number
//! of launched threads.

use core::{iter::StepBy, ops::Range};

use super::{Location, Thread};

/// Offset of the current thread's first element: its flattened index in the
/// grid on the device, or `0` on the host.
#[must_use]
#[hemi_kernel::callable(inline)]
pub fn element_offset(thread: &Thread) -> usize {
    match thread.location() {
        Location::Host => 0,
        Location::Device => thread.index(),
    }
}

/// Stride between the elements of the current thread: the total number of
/// threads in the grid on the device, or `1` on the host.
#[must_use]
#[hemi_kernel::callable(inline)]
pub fn element_stride(thread: &Thread) -> usize {
    match thread.location() {
        Location::Host => 1,
        Location::Device => {
            let block = thread.block();

            block.dim().size() * block.grid().dim().size()
        },
    }
}

/// The indices in `0..n` that the current thread of a grid-strided loop
/// visits, in ascending order.
#[must_use]
#[hemi_kernel::callable(inline)]
pub fn grid_stride(thread: &Thread, n: usize) -> StepBy<Range<usize>> {
    let offset = element_offset(thread).min(n);

    (offset..n).step_by(element_stride(thread).max(1))
}

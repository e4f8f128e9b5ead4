//! Kernels: work bodies defined once and invoked either sequentially on the
//! host or once per thread of a grid on the device.
//!
//! ```rust
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! use hemi::device::{grid_stride, Dim3, Thread};
//! use hemi::kernel::StreamId;
//!
//! #[hemi::kernel]
//! fn square(thread: &Thread, input: &[u32], output: &[AtomicU32]) {
//!     for idx in grid_stride(thread, input.len()) {
//!         output[idx].store(input[idx] * input[idx], Ordering::Relaxed);
//!     }
//! }
//!
//! let input = [1, 2, 3, 4, 5];
//! let output: Vec<AtomicU32> = input.iter().map(|_| AtomicU32::new(0)).collect();
//!
//! hemi::launch!(
//!     square, Dim3::linear(2), Dim3::linear(2), 0, StreamId::DEFAULT,
//!     &input[..], &output[..]
//! );
//!
//! assert_eq!(output[4].load(Ordering::Relaxed), 25);
//! ```

pub use hemi_kernel::{kernel, kernel_name};

mod launch;

pub use launch::{dispatch, sequential, LaunchConfig, StreamId};

#[doc(hidden)]
pub use launch::launch;

use crate::device::Thread;

/// A work body that can be invoked with the argument tuple `Args`.
///
/// Implemented for every `Fn(&Thread, A, B, ..)` with up to 12 arguments.
/// Every invocation receives its own clone of each argument, so that a
/// kernel can take its arguments by value.
pub trait Kernel<Args>: Sync {
    fn invoke(&self, thread: &Thread, args: &Args);
}

macro_rules! impl_kernel_for_fn {
    ($($arg:ident : $T:ident),*) => {
        impl<Func, $($T: Clone),*> Kernel<($($T,)*)> for Func
        where
            Func: Fn(&Thread, $($T),*) + Sync,
        {
            #[inline]
            fn invoke(&self, thread: &Thread, args: &($($T,)*)) {
                let ($($arg,)*) = args;

                (self)(thread, $(<$T as Clone>::clone($arg)),*);
            }
        }
    };
}

impl_kernel_for_fn! {}

impl_kernel_for_fn! { arg1: A }

impl_kernel_for_fn! { arg1: A, arg2: B }

impl_kernel_for_fn! { arg1: A, arg2: B, arg3: C }

impl_kernel_for_fn! { arg1: A, arg2: B, arg3: C, arg4: D }

impl_kernel_for_fn! { arg1: A, arg2: B, arg3: C, arg4: D, arg5: E }

impl_kernel_for_fn! { arg1: A, arg2: B, arg3: C, arg4: D, arg5: E, arg6: F }

impl_kernel_for_fn! { arg1: A, arg2: B, arg3: C, arg4: D, arg5: E, arg6: F, arg7: G }

impl_kernel_for_fn! {
    arg1: A, arg2: B, arg3: C, arg4: D, arg5: E, arg6: F, arg7: G, arg8: H
}

impl_kernel_for_fn! {
    arg1: A, arg2: B, arg3: C, arg4: D, arg5: E, arg6: F, arg7: G, arg8: H, arg9: I
}

impl_kernel_for_fn! {
    arg1: A, arg2: B, arg3: C, arg4: D, arg5: E, arg6: F, arg7: G, arg8: H, arg9: I, arg10: J
}

impl_kernel_for_fn! {
    arg1: A, arg2: B, arg3: C, arg4: D, arg5: E, arg6: F, arg7: G, arg8: H, arg9: I, arg10: J,
    arg11: K
}

impl_kernel_for_fn! {
    arg1: A, arg2: B, arg3: C, arg4: D, arg5: E, arg6: F, arg7: G, arg8: H, arg9: I, arg10: J,
    arg11: K, arg12: L
}

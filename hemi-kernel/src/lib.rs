//! `hemi-kernel` provides the attribute and function-like procedural macros
//! behind [`hemi`](https://docs.rs/hemi)'s single-source kernels:
//!
//! - `#[kernel]` declares a grid entry point `<name>_kernel`,
//! - `kernel_name!(<name>)` names the entry point generated for `<name>`,
//! - `#[callable]` / `#[callable(inline)]` mark helpers that are invoked
//!   from both host code and device threads.
//!
//! The expansions depend on the `accelerator` feature of this crate, which
//! `hemi` forwards from its own `accelerator` feature.

#![deny(clippy::complexity)]
#![deny(clippy::correctness)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]
#![deny(clippy::style)]
#![deny(clippy::suspicious)]
#![deny(unsafe_code)]

extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro_error2::proc_macro_error;

mod callable;
mod kernel;

/// Declares a kernel entry point.
///
/// The annotated `fn name(thread: &Thread, ..)` is emitted as
/// `fn name_kernel(thread: &Thread, ..)`, which `hemi::launch!` invokes
/// either once on the host or once per device thread of a grid.
#[proc_macro_error]
#[proc_macro_attribute]
pub fn kernel(attr: TokenStream, func: TokenStream) -> TokenStream {
    kernel::wrapper::kernel(attr, func)
}

/// Resolves a kernel name to the entry point generated by `#[kernel]`.
///
/// `kernel_name!(saxpy)` expands to `saxpy_kernel`, and
/// `kernel_name!(ops::saxpy)` to `ops::saxpy_kernel`.
#[proc_macro_error]
#[proc_macro]
pub fn kernel_name(tokens: TokenStream) -> TokenStream {
    kernel::name::kernel_name(tokens)
}

/// Marks a free function or method as callable from both host code and
/// device threads.
///
/// `#[callable(inline)]` additionally requests inlining, which is forced
/// under the accelerator build.
#[proc_macro_error]
#[proc_macro_attribute]
pub fn callable(attr: TokenStream, func: TokenStream) -> TokenStream {
    callable::callable(attr, func)
}

//! Constants with one copy for host code and one copy resident on the
//! device.
//!
//! ```rust
//! use hemi::device::Thread;
//!
//! hemi::define_constant! {
//!     pub static PI: f32 = 3.14159;
//! }
//!
//! assert_eq!(PI.get(&Thread::host()), 3.14159);
//! ```
//!
//! Both copies are initialised to the same value and are never
//! resynchronised.

use crate::{device::Thread, mode::Mode};

/// Defines `static` [`Constant`]s, each initialising its host and device
/// copies to the same value.
#[macro_export]
macro_rules! define_constant {
    ($($(#[$attr:meta])* $vis:vis static $name:ident : $ty:ty = $value:expr;)*) => {
        $(
            $(#[$attr])*
            $vis static $name: $crate::constant::Constant<$ty> =
                $crate::constant::Constant::new($value);
        )*
    };
}

/// A pair of same-valued copies of a constant, one for host code and one
/// resident on the device.
#[derive(Debug)]
pub struct Constant<T> {
    host: T,
    device: DeviceConstant<T>,
}

/// The device-resident copy of a [`Constant`], which can only be read from
/// a device thread.
#[derive(Debug)]
#[repr(transparent)]
pub struct DeviceConstant<T>(T);

impl<T: Copy> Constant<T> {
    /// Initialises both copies to `value`.
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self {
            host: value,
            device: DeviceConstant(value),
        }
    }

    /// The copy that is reachable from `thread`: the device copy in device
    /// code of the accelerator build, the host copy everywhere else.
    #[must_use]
    #[hemi_kernel::callable(inline)]
    pub fn get(&self, thread: &Thread) -> T {
        if Mode::current(thread).is_device_code() {
            self.device.0
        } else {
            self.host
        }
    }

    /// The host copy, in any execution context.
    #[must_use]
    pub const fn host(&self) -> T {
        self.host
    }

    /// The device copy, in any execution context.
    #[must_use]
    pub const fn device(&self) -> &DeviceConstant<T> {
        &self.device
    }
}

impl<T: Copy> DeviceConstant<T> {
    /// Reads the device copy from device code of the accelerator build,
    /// or returns [`None`] wherever [`Constant::get`] would read the host
    /// copy.
    #[must_use]
    #[hemi_kernel::callable(inline)]
    pub fn read(&self, thread: &Thread) -> Option<T> {
        if Mode::current(thread).is_device_code() {
            Some(self.0)
        } else {
            None
        }
    }

    /// Address of the device copy. Host code may use it for address
    /// arithmetic, but must not dereference it.
    #[must_use]
    pub const fn as_ptr(&self) -> *const T {
        core::ptr::from_ref(&self.0)
    }
}

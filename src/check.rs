//! Error-check helpers around runtime calls.
//!
//! Under [`CheckPolicy::Abort`] a failed runtime call is reported and aborts
//! the program through an assertion. Under [`CheckPolicy::PassThrough`] the
//! helpers do nothing and hand every status back to the caller, which must
//! then inspect it itself.

use core::{fmt, str::FromStr};
use std::sync::atomic::{AtomicU8, Ordering};

use crate::runtime::{Device, Runtime, RuntimeResult};

/// What the error-check helpers do with a failed runtime call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CheckPolicy {
    /// Report the failure and abort via an assertion.
    Abort,
    /// Return the failure to the caller unchanged, without any output.
    PassThrough,
}

impl CheckPolicy {
    /// [`CheckPolicy::Abort`] in builds with debug assertions,
    /// [`CheckPolicy::PassThrough`] otherwise.
    #[must_use]
    pub const fn from_build() -> Self {
        if cfg!(debug_assertions) {
            Self::Abort
        } else {
            Self::PassThrough
        }
    }
}

impl fmt::Display for CheckPolicy {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(match self {
            Self::Abort => "abort",
            Self::PassThrough => "pass-through",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown check policy {0:?}, expected `abort` or `pass-through`")]
pub struct UnknownCheckPolicy(String);

impl FromStr for CheckPolicy {
    type Err = UnknownCheckPolicy;

    fn from_str(policy: &str) -> Result<Self, Self::Err> {
        match policy.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "pass-through" | "passthrough" => Ok(Self::PassThrough),
            _ => Err(UnknownCheckPolicy(String::from(policy))),
        }
    }
}

const POLICY_UNSET: u8 = 0;
const POLICY_ABORT: u8 = 1;
const POLICY_PASS_THROUGH: u8 = 2;

static POLICY: AtomicU8 = AtomicU8::new(POLICY_UNSET);

/// The policy of [`check_runtime_call`] and [`check_async_errors`]: the one
/// last passed to [`set_check_policy`], or else the configured one.
#[must_use]
pub fn check_policy() -> CheckPolicy {
    match POLICY.load(Ordering::Relaxed) {
        POLICY_ABORT => CheckPolicy::Abort,
        POLICY_PASS_THROUGH => CheckPolicy::PassThrough,
        _ => crate::config::global().check_policy,
    }
}

pub fn set_check_policy(policy: CheckPolicy) {
    let policy = match policy {
        CheckPolicy::Abort => POLICY_ABORT,
        CheckPolicy::PassThrough => POLICY_PASS_THROUGH,
    };

    POLICY.store(policy, Ordering::Relaxed);
}

/// Checks runtime results under a fixed [`CheckPolicy`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ErrorChecker {
    policy: CheckPolicy,
}

impl ErrorChecker {
    #[must_use]
    pub const fn new(policy: CheckPolicy) -> Self {
        Self { policy }
    }

    /// A checker with the current [`check_policy`].
    #[must_use]
    pub fn current() -> Self {
        Self::new(check_policy())
    }

    #[must_use]
    pub const fn policy(&self) -> CheckPolicy {
        self.policy
    }

    /// Passes `result` through unchanged, after aborting on a failure under
    /// [`CheckPolicy::Abort`].
    ///
    /// # Errors
    ///
    /// Returns `result`'s error iff the policy is
    /// [`CheckPolicy::PassThrough`].
    ///
    /// # Panics
    ///
    /// Panics iff `result` is an error and the policy is
    /// [`CheckPolicy::Abort`].
    #[allow(clippy::panic)] // aborting is the point of the abort policy
    pub fn check<T>(&self, result: RuntimeResult<T>) -> RuntimeResult<T> {
        if let (CheckPolicy::Abort, Err(err)) = (self.policy, &result) {
            tracing::error!(%err, "runtime error");

            panic!("runtime error: {err}");
        }

        result
    }

    /// Waits for all outstanding work on `runtime`, then checks and clears
    /// its most recent asynchronous failure. Does nothing under
    /// [`CheckPolicy::PassThrough`].
    ///
    /// # Errors
    ///
    /// Never returns an error: under [`CheckPolicy::Abort`] it aborts
    /// instead, and under [`CheckPolicy::PassThrough`] it does not look.
    ///
    /// # Panics
    ///
    /// Panics iff a failure was recorded and the policy is
    /// [`CheckPolicy::Abort`].
    pub fn check_async<R: Runtime>(&self, runtime: &R) -> RuntimeResult {
        if self.policy == CheckPolicy::PassThrough {
            return Ok(());
        }

        if let Err(err) = runtime.synchronize() {
            tracing::error!(%err, "launch error");
        }

        self.check(runtime.last_error())
    }
}

/// Checks the result of a runtime call under the current [`check_policy`],
/// passing it through unchanged.
///
/// ```rust
/// # use hemi::check::check_runtime_call;
/// assert_eq!(check_runtime_call(Ok(42)), Ok(42));
/// ```
///
/// # Errors
///
/// Returns `result`'s error iff the policy is [`CheckPolicy::PassThrough`].
///
/// # Panics
///
/// Panics iff `result` is an error and the policy is [`CheckPolicy::Abort`].
pub fn check_runtime_call<T>(result: RuntimeResult<T>) -> RuntimeResult<T> {
    ErrorChecker::current().check(result)
}

/// Synchronizes [`Device::current`] and checks its most recent asynchronous
/// failure under the current [`check_policy`]. This is the only blocking
/// call in this crate, and it only blocks under [`CheckPolicy::Abort`].
///
/// # Errors
///
/// Never returns an error, see [`ErrorChecker::check_async`].
///
/// # Panics
///
/// Panics iff a failure was recorded and the policy is [`CheckPolicy::Abort`].
pub fn check_async_errors() -> RuntimeResult {
    let checker = ErrorChecker::current();

    if checker.policy() == CheckPolicy::PassThrough {
        return Ok(());
    }

    checker.check_async(Device::current())
}

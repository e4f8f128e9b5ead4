//! Runtime configuration, read from the environment.
//!
//! | variable              | values                  | default                     |
//! |-----------------------|-------------------------|-----------------------------|
//! | `HEMI_CHECK_POLICY`   | `abort`, `pass-through` | `abort` iff debug assertions |
//! | `HEMI_WORKER_THREADS` | positive integer        | one per available core      |

use std::{num::NonZeroUsize, sync::OnceLock};

use crate::check::CheckPolicy;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Policy of the error-check helpers
    pub check_policy: CheckPolicy,
    /// Number of worker threads that execute device grids
    pub worker_threads: Option<NonZeroUsize>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for `{var}`: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            check_policy: CheckPolicy::from_build(),
            worker_threads: None,
        }
    }
}

impl Config {
    pub const CHECK_POLICY_VAR: &'static str = "HEMI_CHECK_POLICY";
    pub const WORKER_THREADS_VAR: &'static str = "HEMI_WORKER_THREADS";

    /// # Errors
    ///
    /// Returns a [`ConfigError`] iff a set variable has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value, if set.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] iff a set variable has an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(Self::CHECK_POLICY_VAR) {
            config.check_policy = value.parse().map_err(|err: crate::check::UnknownCheckPolicy| {
                ConfigError::InvalidValue {
                    var: Self::CHECK_POLICY_VAR,
                    reason: err.to_string(),
                    value,
                }
            })?;
        }

        if let Some(value) = lookup(Self::WORKER_THREADS_VAR) {
            config.worker_threads =
                Some(value.trim().parse().map_err(|err: std::num::ParseIntError| {
                    ConfigError::InvalidValue {
                        var: Self::WORKER_THREADS_VAR,
                        reason: err.to_string(),
                        value,
                    }
                })?);
        }

        Ok(config)
    }
}

/// The process-wide configuration, read from the environment on first use.
///
/// Invalid variables are reported and replaced by their defaults.
#[must_use]
pub fn global() -> &'static Config {
    static GLOBAL: OnceLock<Config> = OnceLock::new();

    GLOBAL.get_or_init(|| {
        Config::from_env().unwrap_or_else(|err| {
            tracing::warn!(%err, "ignoring the invalid configuration");

            Config::default()
        })
    })
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::{Config, ConfigError};
    use crate::check::CheckPolicy;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |var| {
            vars.iter()
                .find(|(name, _)| *name == var)
                .map(|(_, value)| String::from(*value))
        }
    }

    #[test]
    fn unset_variables_keep_the_defaults() {
        assert_eq!(Config::from_lookup(lookup(&[])), Ok(Config::default()));
    }

    #[test]
    fn variables_override_the_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("HEMI_CHECK_POLICY", "pass-through"),
            ("HEMI_WORKER_THREADS", "3"),
        ]));

        assert_eq!(
            config,
            Ok(Config {
                check_policy: CheckPolicy::PassThrough,
                worker_threads: NonZeroUsize::new(3),
            })
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("HEMI_WORKER_THREADS", "0")])),
            Err(ConfigError::InvalidValue {
                var: "HEMI_WORKER_THREADS",
                ..
            })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("HEMI_CHECK_POLICY", "ignore")])),
            Err(ConfigError::InvalidValue {
                var: "HEMI_CHECK_POLICY",
                ..
            })
        ));
    }
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Duration;

use crate::config::consts::DEFAULT_SETUP_TIMEOUT_MS;
use crate::config::Config;
use crate::errors::BootstrapError;

/// Runtime options for a bootstrap run.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use the_dipper::config::BootstrapOptions;
///
/// let options = BootstrapOptions::from_millis(50).unwrap();
/// assert_eq!(options.setup_timeout, Duration::from_millis(50));
///
/// assert!(BootstrapOptions::from_millis(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapOptions {
    /// How long a package may take to register all of its declared capabilities
    pub setup_timeout: Duration,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            setup_timeout: Duration::from_millis(DEFAULT_SETUP_TIMEOUT_MS),
        }
    }
}

impl BootstrapOptions {
    /// Options with the given setup timeout; zero is rejected.
    pub fn from_millis(setup_timeout_ms: u64) -> Result<Self, BootstrapError> {
        if setup_timeout_ms == 0 {
            return Err(BootstrapError::InvalidOptions(
                "setup_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            setup_timeout: Duration::from_millis(setup_timeout_ms),
        })
    }

    /// Options taken from a loaded config file.
    pub fn from_config(cfg: &Config) -> Result<Self, BootstrapError> {
        Self::from_millis(cfg.setup_timeout_ms)
    }
}

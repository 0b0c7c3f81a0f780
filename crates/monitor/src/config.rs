use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for the status monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// How often the automatic refresh runs.
    pub interval: Duration,

    /// Max wait per individual checker call. The deadline is owned by the
    /// aggregator; a probe that exceeds it is reported as unknown.
    pub probe_timeout: Duration,

    /// Number of consecutive matching results required to settle a new state.
    pub confirmations: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(5),
            confirmations: 2,
        }
    }
}

impl MonitorConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero interval, zero probe timeout,
    /// zero confirmation threshold, or a probe timeout longer than the
    /// refresh interval.
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(Error::Config("interval must be non-zero"));
        }

        if self.probe_timeout.is_zero() {
            return Err(Error::Config("probe timeout must be non-zero"));
        }

        if self.probe_timeout > self.interval {
            return Err(Error::Config(
                "probe timeout must not exceed the refresh interval",
            ));
        }

        if self.confirmations == 0 {
            return Err(Error::Config("confirmations must be at least 1"));
        }

        Ok(())
    }
}

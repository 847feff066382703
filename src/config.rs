//! Engine configuration.
//!
//! Only collaborator timeouts are configurable. Admission rules and
//! completion requirements are fixed.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Timeouts applied to external collaborators.
///
/// # Examples
///
/// ```
/// use fieldgate::config::EngineConfig;
/// use std::time::Duration;
///
/// let config = EngineConfig::from_json_str(r#"{"dispatch_send_timeout_ms": 2500}"#)
///     .expect("valid configuration");
/// assert_eq!(config.dispatch_send_timeout(), Duration::from_millis(2500));
/// assert_eq!(config.photo_capture_timeout(), Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Upper bound for notifying a truck/driver of a dispatch, in milliseconds.
    pub dispatch_send_timeout_ms: u64,
    /// Upper bound for the photo-capture collaborator, in milliseconds.
    pub photo_capture_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dispatch_send_timeout_ms: 10_000,
            photo_capture_timeout_ms: 30_000,
        }
    }
}

/// Errors returned while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON for [`EngineConfig`].
    #[error("invalid engine configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A timeout was configured as zero.
    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

impl EngineConfig {
    /// Parses configuration from a JSON document, filling omitted fields with
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields and
    /// [`ConfigError::ZeroTimeout`] when a timeout is zero.
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every timeout is positive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] naming the offending field.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.dispatch_send_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("dispatch_send_timeout_ms"));
        }
        if self.photo_capture_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("photo_capture_timeout_ms"));
        }
        Ok(())
    }

    /// Sets the dispatch send timeout.
    #[must_use]
    pub fn with_dispatch_send_timeout(mut self, timeout: Duration) -> Self {
        self.dispatch_send_timeout_ms = duration_to_millis(timeout);
        self
    }

    /// Sets the photo-capture timeout.
    #[must_use]
    pub fn with_photo_capture_timeout(mut self, timeout: Duration) -> Self {
        self.photo_capture_timeout_ms = duration_to_millis(timeout);
        self
    }

    /// Returns the dispatch send timeout.
    #[must_use]
    pub const fn dispatch_send_timeout(&self) -> Duration {
        Duration::from_millis(self.dispatch_send_timeout_ms)
    }

    /// Returns the photo-capture timeout.
    #[must_use]
    pub const fn photo_capture_timeout(&self) -> Duration {
        Duration::from_millis(self.photo_capture_timeout_ms)
    }
}

/// Saturates at `u64::MAX` milliseconds.
fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

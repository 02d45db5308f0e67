//! Error types for shared Konnect settings
//!
//! Errors name the setting they concern so that a failed startup can be
//! traced back to the variable that caused it.

use thiserror::Error;

/// Main error type for shared Konnect helpers
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid process configuration
    #[error("configuration error for {key}: {message}")]
    Config {
        /// Environment variable or setting name
        key: String,
        /// Description of what's invalid
        message: String,
    },
}

impl Error {
    /// Create a configuration error for a setting
    pub fn config(key: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Config {
            key: key.into(),
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // Story Tests: Local failures before any remote call
    // ==========================================================================

    /// Story: a malformed environment variable stops startup with its name
    #[test]
    fn story_config_errors_name_the_setting() {
        let err = Error::config("KONNECT_SYNC_PERIOD_SECONDS", "not a number: abc");
        assert_eq!(
            err.to_string(),
            "configuration error for KONNECT_SYNC_PERIOD_SECONDS: not a number: abc"
        );
    }
}

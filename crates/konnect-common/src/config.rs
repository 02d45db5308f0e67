//! Sync settings shared by every reconciler that drives the sync core

use std::time::Duration;

use crate::{Error, Result};

/// Environment variable holding the sync period in seconds
pub const SYNC_PERIOD_ENV: &str = "KONNECT_SYNC_PERIOD_SECONDS";

/// Default interval between forced resyncs of a converged entity
pub const DEFAULT_SYNC_PERIOD: Duration = Duration::from_secs(60);

/// Settings for the sync core
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncConfig {
    /// Minimum time between two remote updates of an unchanged, programmed entity
    pub sync_period: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            sync_period: DEFAULT_SYNC_PERIOD,
        }
    }
}

impl SyncConfig {
    /// Load settings from the process environment, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(SYNC_PERIOD_ENV) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| Error::config(SYNC_PERIOD_ENV, format!("not a number: {raw}")))?;
            if secs == 0 {
                return Err(Error::config(SYNC_PERIOD_ENV, "must be greater than zero"));
            }
            config.sync_period = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Override the sync period
    pub fn with_sync_period(mut self, sync_period: Duration) -> Self {
        self.sync_period = sync_period;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = SyncConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, SyncConfig::default());
        assert_eq!(config.sync_period, Duration::from_secs(60));
    }

    #[test]
    fn reads_sync_period() {
        let config = SyncConfig::from_lookup(lookup(&[(SYNC_PERIOD_ENV, " 300 ")])).unwrap();
        assert_eq!(config.sync_period, Duration::from_secs(300));
    }

    #[rstest]
    #[case::not_a_number(SYNC_PERIOD_ENV, "soon")]
    #[case::zero(SYNC_PERIOD_ENV, "0")]
    #[case::negative(SYNC_PERIOD_ENV, "-5")]
    fn invalid_values_are_config_errors(#[case] key: &str, #[case] value: &str) {
        let err = SyncConfig::from_lookup(lookup(&[(key, value)])).unwrap_err();
        match err {
            Error::Config { key: k, .. } => assert_eq!(k, key),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn with_sync_period_overrides_default() {
        let config = SyncConfig::default().with_sync_period(Duration::from_secs(5));
        assert_eq!(config.sync_period, Duration::from_secs(5));
    }
}

//! # Runtime Configuration
//!
//! Defaults, overridden by `DDT_*` environment variables, overridden by
//! command-line flags.

use std::time::Duration;

use ddt_01_record_ledger::{KeyLayout, LedgerConfig};
use thiserror::Error;
use tracing::{info, warn};

pub const ENV_INDEX_KEY: &str = "DDT_INDEX_KEY";
pub const ENV_RECORD_PREFIX: &str = "DDT_RECORD_PREFIX";
pub const ENV_SIMULATION_TIMEOUT_MS: &str = "DDT_SIMULATION_TIMEOUT_MS";
pub const ENV_SIMULATION_DELAY_MS: &str = "DDT_SIMULATION_DELAY_MS";

/// Complete session configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Ledger key layout and simulation timeout.
    pub ledger: LedgerConfig,
    /// Artificial latency of the placeholder simulation provider.
    pub simulation_delay: Duration,
    /// Account connected at startup, if any.
    pub account: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            ledger: LedgerConfig::default(),
            simulation_delay: Duration::from_secs(3),
            account: None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("index key must not be empty (set {ENV_INDEX_KEY} or --index-key)")]
    EmptyIndexKey,

    #[error("record prefix must not be empty (set {ENV_RECORD_PREFIX} or --record-prefix)")]
    EmptyRecordPrefix,

    #[error("simulation timeout must be greater than zero")]
    ZeroTimeout,
}

/// Flag values that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub index_key: Option<String>,
    pub record_prefix: Option<String>,
    pub simulation_timeout_ms: Option<u64>,
    pub simulation_delay_ms: Option<u64>,
    pub account: Option<String>,
}

impl RuntimeConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `DDT_*` name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(key) = lookup(ENV_INDEX_KEY) {
            config.ledger.keys.index_key = key;
        }
        if let Some(prefix) = lookup(ENV_RECORD_PREFIX) {
            config.ledger.keys.record_prefix = prefix;
        }
        if let Some(ms) = parse_millis(&lookup, ENV_SIMULATION_TIMEOUT_MS) {
            config.ledger.simulation_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_millis(&lookup, ENV_SIMULATION_DELAY_MS) {
            config.simulation_delay = Duration::from_millis(ms);
        }

        config
    }

    /// Apply command-line flags on top of the current values.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(key) = overrides.index_key {
            self.ledger.keys.index_key = key;
        }
        if let Some(prefix) = overrides.record_prefix {
            self.ledger.keys.record_prefix = prefix;
        }
        if let Some(ms) = overrides.simulation_timeout_ms {
            self.ledger.simulation_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = overrides.simulation_delay_ms {
            self.simulation_delay = Duration::from_millis(ms);
        }
        if overrides.account.is_some() {
            self.account = overrides.account;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let KeyLayout {
            index_key,
            record_prefix,
        } = &self.ledger.keys;
        if index_key.trim().is_empty() {
            return Err(ConfigError::EmptyIndexKey);
        }
        if record_prefix.is_empty() {
            return Err(ConfigError::EmptyRecordPrefix);
        }
        if self.ledger.simulation_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        info!(
            index_key = %index_key,
            record_prefix = %record_prefix,
            timeout_ms = self.ledger.simulation_timeout.as_millis() as u64,
            "Configuration validated"
        );
        Ok(())
    }
}

fn parse_millis(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<u64> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(ms) => Some(ms),
        Err(_) => {
            warn!(variable = name, value = %raw, "Ignoring non-numeric millisecond value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_match_persisted_layout() {
        let config = RuntimeConfig::from_lookup(|_| None);
        assert_eq!(config.ledger.keys.index_key, "drug_delivery_keys");
        assert_eq!(config.ledger.keys.record_prefix, "record:");
        assert_eq!(config.ledger.simulation_timeout, Duration::from_secs(30));
        assert_eq!(config.simulation_delay, Duration::from_secs(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_overrides_defaults() {
        let config = RuntimeConfig::from_lookup(lookup_from(&[
            (ENV_INDEX_KEY, "trial_keys"),
            (ENV_SIMULATION_TIMEOUT_MS, "1500"),
            (ENV_SIMULATION_DELAY_MS, "0"),
        ]));
        assert_eq!(config.ledger.keys.index_key, "trial_keys");
        assert_eq!(config.ledger.simulation_timeout, Duration::from_millis(1500));
        assert_eq!(config.simulation_delay, Duration::ZERO);
    }

    #[test]
    fn test_non_numeric_value_is_ignored() {
        let config =
            RuntimeConfig::from_lookup(lookup_from(&[(ENV_SIMULATION_TIMEOUT_MS, "soon")]));
        assert_eq!(config.ledger.simulation_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_flags_take_precedence_over_environment() {
        let config = RuntimeConfig::from_lookup(lookup_from(&[(ENV_RECORD_PREFIX, "env:")]))
            .with_overrides(ConfigOverrides {
                record_prefix: Some("flag:".to_string()),
                account: Some("0xabc".to_string()),
                ..ConfigOverrides::default()
            });
        assert_eq!(config.ledger.keys.record_prefix, "flag:");
        assert_eq!(config.account.as_deref(), Some("0xabc"));
    }

    #[test]
    fn test_validate_rejects_unusable_values() {
        let mut config = RuntimeConfig::default();
        config.ledger.keys.index_key = "  ".to_string();
        assert_eq!(config.validate(), Err(ConfigError::EmptyIndexKey));

        let mut config = RuntimeConfig::default();
        config.ledger.keys.record_prefix.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyRecordPrefix));

        let config = RuntimeConfig::default().with_overrides(ConfigOverrides {
            simulation_timeout_ms: Some(0),
            ..ConfigOverrides::default()
        });
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }
}

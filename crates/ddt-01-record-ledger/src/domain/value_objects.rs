//! # Value Objects
//!
//! Identifiers, ledger key layout and configuration for the Record Ledger.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default ledger key holding the serialized record index.
pub const DEFAULT_INDEX_KEY: &str = "drug_delivery_keys";

/// Default prefix for per-record ledger keys (`record:<id>`).
pub const DEFAULT_RECORD_PREFIX: &str = "record:";

/// Default upper bound on a single simulation round trip.
pub const DEFAULT_SIMULATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Length of the random base36 suffix of generated record ids.
pub const RECORD_ID_SUFFIX_LEN: usize = 7;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque, caller-generated record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier of the form `<unix-millis>-<base36 suffix>`.
    ///
    /// The millisecond prefix keeps ids roughly time-ordered; the random
    /// suffix makes collisions between writers in the same millisecond
    /// negligible.
    pub fn generate<R: Rng + ?Sized>(now_millis: u64, rng: &mut R) -> Self {
        let suffix: String = (0..RECORD_ID_SUFFIX_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        Self(format!("{now_millis}-{suffix}"))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Wallet account authorizing ledger writes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signer {
    /// Account address as reported by the wallet.
    pub account: String,
}

impl Signer {
    /// Create a signer for the given account.
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
        }
    }
}

/// How ledger keys are derived.
///
/// The index lives under one fixed key; every record lives under
/// `record_prefix + id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLayout {
    /// Key holding the JSON list of record ids.
    pub index_key: String,
    /// Prefix for per-record keys.
    pub record_prefix: String,
}

impl KeyLayout {
    /// Ledger key of the record with the given id.
    pub fn record_key(&self, id: &RecordId) -> String {
        format!("{}{}", self.record_prefix, id)
    }
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self {
            index_key: DEFAULT_INDEX_KEY.to_string(),
            record_prefix: DEFAULT_RECORD_PREFIX.to_string(),
        }
    }
}

/// Configuration for the Record Ledger service.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Ledger key layout.
    pub keys: KeyLayout,
    /// Simulation calls exceeding this are treated as provider failures.
    pub simulation_timeout: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            keys: KeyLayout::default(),
            simulation_timeout: DEFAULT_SIMULATION_TIMEOUT,
        }
    }
}

impl LedgerConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the index key.
    pub fn with_index_key(mut self, key: impl Into<String>) -> Self {
        self.keys.index_key = key.into();
        self
    }

    /// Set the per-record key prefix.
    pub fn with_record_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.keys.record_prefix = prefix.into();
        self
    }

    /// Set the simulation timeout.
    pub fn with_simulation_timeout(mut self, timeout: Duration) -> Self {
        self.simulation_timeout = timeout;
        self
    }
}

//! # In-Memory Ledger
//!
//! `LedgerStore` backed by a `HashMap`, shared between sessions through an
//! `Arc`. Each call is atomic on its own, like a single contract call;
//! nothing spans two calls.
//!
//! Fault injection (availability toggle, per-key read and write failures,
//! raw overwrites) lets tests reproduce the failure modes of a real chain.
//! With yielding enabled every read and write suspends once before touching
//! state, the way a network round trip would, so concurrent sessions on one
//! runtime interleave between an index read and the following index write.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::domain::{Signer, StoreError};
use crate::ports::outbound::LedgerStore;

/// One accepted write, kept for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReceipt {
    pub sequence: u64,
    pub key: String,
    pub account: String,
}

/// In-memory key/value ledger.
#[derive(Debug)]
pub struct InMemoryLedger {
    entries: RwLock<HashMap<String, Vec<u8>>>,
    available: AtomicBool,
    failing_keys: RwLock<HashSet<String>>,
    failing_reads: RwLock<HashSet<String>>,
    yielding: AtomicBool,
    receipts: RwLock<Vec<WriteReceipt>>,
    sequence: AtomicU64,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
            failing_keys: RwLock::new(HashSet::new()),
            failing_reads: RwLock::new(HashSet::new()),
            yielding: AtomicBool::new(false),
            receipts: RwLock::new(Vec::new()),
            sequence: AtomicU64::new(0),
        }
    }
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle availability. An unavailable ledger fails every call.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Make every subsequent write to `key` fail.
    pub fn fail_writes_to(&self, key: impl Into<String>) {
        self.failing_keys.write().insert(key.into());
    }

    /// Clear all injected write failures.
    pub fn clear_write_failures(&self) {
        self.failing_keys.write().clear();
    }

    /// Make every subsequent read of `key` fail.
    pub fn fail_reads_from(&self, key: impl Into<String>) {
        self.failing_reads.write().insert(key.into());
    }

    /// Clear all injected read failures.
    pub fn clear_read_failures(&self) {
        self.failing_reads.write().clear();
    }

    /// Suspend once at the start of every read and write.
    pub fn set_yielding(&self, yielding: bool) {
        self.yielding.store(yielding, Ordering::SeqCst);
    }

    /// Builder form of [`InMemoryLedger::set_yielding`].
    pub fn with_yielding(self) -> Self {
        self.set_yielding(true);
        self
    }

    /// Store raw bytes under `key`, bypassing signer checks.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.entries.write().insert(key.into(), value.into());
    }

    /// Raw bytes under `key`, if any.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.read().get(key).cloned()
    }

    /// Number of accepted writes.
    pub fn write_count(&self) -> usize {
        self.receipts.read().len()
    }

    /// Accepted writes, oldest first.
    pub fn receipts(&self) -> Vec<WriteReceipt> {
        self.receipts.read().clone()
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable)
        }
    }

    async fn round_trip(&self) {
        if self.yielding.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    async fn read(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.round_trip().await;
        self.ensure_available()?;

        if self.failing_reads.read().contains(key) {
            return Err(StoreError::ReadFailed {
                key: key.to_string(),
                message: "call exception".to_string(),
            });
        }

        Ok(self.entries.read().get(key).cloned().unwrap_or_default())
    }

    async fn write(&self, signer: &Signer, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.round_trip().await;
        self.ensure_available()?;

        if self.failing_keys.read().contains(key) {
            return Err(StoreError::WriteFailed {
                key: key.to_string(),
                message: "execution reverted".to_string(),
            });
        }

        self.entries.write().insert(key.to_string(), value);
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.receipts.write().push(WriteReceipt {
            sequence,
            key: key.to_string(),
            account: signer.account.clone(),
        });
        Ok(())
    }

    async fn is_available(&self) -> Result<bool, StoreError> {
        Ok(self.available.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_absent_key_reads_empty() {
        let ledger = InMemoryLedger::new();
        assert!(ledger.read("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let ledger = InMemoryLedger::new();
        let signer = Signer::new("0xabc");

        ledger.write(&signer, "k", b"v".to_vec()).await.unwrap();

        assert_eq!(ledger.read("k").await.unwrap(), b"v".to_vec());
        let receipts = ledger.receipts();
        assert_eq!(receipts.len(), 1);
        assert_eq!(receipts[0].account, "0xabc");
    }

    #[tokio::test]
    async fn test_unavailable_ledger_fails_calls() {
        let ledger = InMemoryLedger::new();
        ledger.set_available(false);

        assert!(!ledger.is_available().await.unwrap());
        assert_eq!(ledger.read("k").await, Err(StoreError::Unavailable));
        assert_eq!(
            ledger.write(&Signer::new("a"), "k", vec![]).await,
            Err(StoreError::Unavailable)
        );
    }

    #[tokio::test]
    async fn test_injected_write_failure_leaves_value_untouched() {
        let ledger = InMemoryLedger::new();
        ledger.insert_raw("k", b"old".to_vec());
        ledger.fail_writes_to("k");

        let result = ledger.write(&Signer::new("a"), "k", b"new".to_vec()).await;

        assert!(matches!(result, Err(StoreError::WriteFailed { .. })));
        assert_eq!(ledger.raw("k"), Some(b"old".to_vec()));
        assert_eq!(ledger.write_count(), 0);
    }

    #[tokio::test]
    async fn test_injected_read_failure_is_per_key() {
        let ledger = InMemoryLedger::new();
        ledger.insert_raw("a", b"1".to_vec());
        ledger.insert_raw("b", b"2".to_vec());
        ledger.fail_reads_from("a");

        assert!(matches!(ledger.read("a").await, Err(StoreError::ReadFailed { .. })));
        assert_eq!(ledger.read("b").await.unwrap(), b"2".to_vec());

        ledger.clear_read_failures();
        assert_eq!(ledger.read("a").await.unwrap(), b"1".to_vec());
    }

    #[tokio::test]
    async fn test_yielding_interleaves_read_modify_write() {
        let ledger = InMemoryLedger::new().with_yielding();
        let signer = Signer::new("a");

        let bump = |suffix: &'static [u8]| {
            let ledger = &ledger;
            let signer = &signer;
            async move {
                let mut value = ledger.read("k").await.unwrap();
                value.extend_from_slice(suffix);
                ledger.write(signer, "k", value).await.unwrap();
            }
        };
        tokio::join!(bump(b"x"), bump(b"y"));

        // Both read the empty value before either wrote.
        assert_eq!(ledger.raw("k").map(|v| v.len()), Some(1));
        assert_eq!(ledger.write_count(), 2);
    }
}

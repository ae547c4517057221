//! # Record Index Manager
//!
//! Owns the ordered list of record ids stored under the index key.
//!
//! The ledger has no enumeration primitive, so this list is the only way to
//! discover records. Updates are read-modify-write with no version check: two
//! writers that both read before either writes will lose one id (last writer
//! wins). `RecordLedgerService::reconcile_index` repairs such losses.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{LedgerError, RecordId, Signer};
use crate::ports::outbound::{LedgerStore, RecordCodec};

/// Result of an append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The id was added and the index republished.
    Appended,
    /// The id was already indexed; nothing was written.
    AlreadyPresent,
}

/// Read/append access to the record index.
pub struct RecordIndex<L> {
    ledger: Arc<L>,
    codec: Arc<dyn RecordCodec>,
    index_key: String,
}

impl<L> Clone for RecordIndex<L> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            codec: Arc::clone(&self.codec),
            index_key: self.index_key.clone(),
        }
    }
}

impl<L: LedgerStore> RecordIndex<L> {
    pub fn new(ledger: Arc<L>, codec: Arc<dyn RecordCodec>, index_key: impl Into<String>) -> Self {
        Self {
            ledger,
            codec,
            index_key: index_key.into(),
        }
    }

    /// Ledger key holding the index.
    pub fn key(&self) -> &str {
        &self.index_key
    }

    /// Current index in ledger order.
    ///
    /// An absent or unparseable index reads as empty. Store failures are
    /// returned.
    pub async fn list_ids(&self) -> Result<Vec<RecordId>, LedgerError> {
        let bytes = self.ledger.read(&self.index_key).await?;
        if bytes.is_empty() {
            return Ok(Vec::new());
        }

        match self.codec.decode_index(&bytes) {
            Ok(ids) => Ok(ids),
            Err(e) => {
                warn!(key = %self.index_key, error = %e, "Unparseable record index, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Overwrite the index with `ids`.
    pub async fn publish(&self, signer: &Signer, ids: &[RecordId]) -> Result<(), LedgerError> {
        let bytes = self
            .codec
            .encode_index(ids)
            .map_err(|e| LedgerError::Serialization {
                key: self.index_key.clone(),
                message: e.message,
            })?;
        self.ledger.write(signer, &self.index_key, bytes).await?;
        debug!(key = %self.index_key, len = ids.len(), "Record index published");
        Ok(())
    }

    /// Append `id` if absent and republish the whole index.
    pub async fn append(&self, signer: &Signer, id: &RecordId) -> Result<AppendOutcome, LedgerError> {
        let mut ids = self.list_ids().await?;
        if ids.contains(id) {
            return Ok(AppendOutcome::AlreadyPresent);
        }
        ids.push(id.clone());
        self.publish(signer, &ids).await?;
        Ok(AppendOutcome::Appended)
    }
}

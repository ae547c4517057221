//! # Record Repository
//!
//! Maps record ids to their payloads under `record_prefix + id`.
//!
//! Reads isolate failures per key: a payload that cannot be read or decoded
//! is logged and treated as absent, so one bad entry never hides the rest.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{KeyLayout, LedgerError, Record, RecordId, Signer};
use crate::ports::outbound::{LedgerStore, RecordCodec};

use super::index::RecordIndex;

/// Point and bulk access to stored records.
pub struct RecordRepository<L> {
    ledger: Arc<L>,
    codec: Arc<dyn RecordCodec>,
    keys: KeyLayout,
    index: RecordIndex<L>,
}

impl<L: LedgerStore> RecordRepository<L> {
    pub fn new(ledger: Arc<L>, codec: Arc<dyn RecordCodec>, keys: KeyLayout) -> Self {
        let index = RecordIndex::new(Arc::clone(&ledger), Arc::clone(&codec), keys.index_key.clone());
        Self {
            ledger,
            codec,
            keys,
            index,
        }
    }

    /// The index this repository hydrates from.
    pub fn index(&self) -> &RecordIndex<L> {
        &self.index
    }

    /// Key layout in use.
    pub fn keys(&self) -> &KeyLayout {
        &self.keys
    }

    /// Point lookup.
    ///
    /// Absent and undecodable payloads both read as `None`. Store failures
    /// are returned.
    pub async fn get(&self, id: &RecordId) -> Result<Option<Record>, LedgerError> {
        let key = self.keys.record_key(id);
        let bytes = self.ledger.read(&key).await?;
        if bytes.is_empty() {
            return Ok(None);
        }

        match self.codec.decode_record(id, &bytes) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!(key = %key, error = %e, "Unparseable record payload, skipping");
                Ok(None)
            }
        }
    }

    /// Unconditional overwrite of the payload under `id` (last write wins).
    pub async fn put(&self, signer: &Signer, id: &RecordId, record: &Record) -> Result<(), LedgerError> {
        let key = self.keys.record_key(id);
        let bytes = self
            .codec
            .encode_record(record)
            .map_err(|e| LedgerError::Serialization {
                key: key.clone(),
                message: e.message,
            })?;
        self.ledger.write(signer, &key, bytes).await?;
        debug!(key = %key, status = %record.status, "Record payload written");
        Ok(())
    }

    /// Every readable indexed record, newest first.
    ///
    /// Ids are visited in index order and duplicates are ignored. Records
    /// with equal `created_at` keep their index order.
    pub async fn hydrate_all(&self) -> Result<Vec<Record>, LedgerError> {
        let ids = self.index.list_ids().await?;
        let mut seen = HashSet::with_capacity(ids.len());
        let mut records = Vec::with_capacity(ids.len());

        for id in ids {
            if !seen.insert(id.clone()) {
                continue;
            }
            match self.get(&id).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {
                    warn!(record_id = %id, "Indexed record has no readable payload, skipping");
                }
                Err(e) => {
                    warn!(record_id = %id, error = %e, "Failed to load indexed record, skipping");
                }
            }
        }

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}

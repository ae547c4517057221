//! # Inbound Ports (Driving Ports)
//!
//! Public API of the Record Ledger.

use async_trait::async_trait;

use crate::domain::{LedgerError, ReconcileReport, Record, RecordDraft, RecordId};

/// Primary API of the Record Ledger.
///
/// Reads never require a signer. Every write requires one and fails with
/// `Unauthenticated` or `UserCancelled` otherwise.
#[async_trait]
pub trait RecordLedgerApi: Send + Sync {
    /// Current index, in ledger order. Unreadable index reads as empty.
    async fn list_ids(&self) -> Result<Vec<RecordId>, LedgerError>;

    /// Point lookup. Unknown or unparseable records read as `None`.
    async fn get_record(&self, id: &RecordId) -> Result<Option<Record>, LedgerError>;

    /// Every readable indexed record, newest first.
    async fn load_all(&self) -> Result<Vec<Record>, LedgerError>;

    /// Encrypt, persist and index a new pending record.
    async fn create_record(&self, draft: RecordDraft) -> Result<Record, LedgerError>;

    /// Run the simulation for a pending record and mark it optimized.
    ///
    /// # Errors
    ///
    /// * `NotFound` - unknown id
    /// * `InvalidState` - record is not pending (no write happens)
    /// * `ExternalProvider` - simulation failed or timed out (no write happens)
    async fn run_simulation(&self, id: &RecordId) -> Result<Record, LedgerError>;

    /// Mark a pending record rejected.
    async fn reject_record(&self, id: &RecordId) -> Result<Record, LedgerError>;

    /// Re-append locally created ids missing from the index.
    async fn reconcile_index(&self) -> Result<ReconcileReport, LedgerError>;
}

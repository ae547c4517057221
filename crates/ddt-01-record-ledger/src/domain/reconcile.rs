//! # Index Reconciliation Report
//!
//! Outcome of re-registering locally created ids that a concurrent index
//! write dropped.

use serde::Serialize;

use super::value_objects::RecordId;

/// Result of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    /// Locally created ids examined.
    pub checked: usize,
    /// Ids that were missing from the index and have been appended again.
    pub reappended: Vec<RecordId>,
    /// Ids missing from the index whose payload is also unreadable.
    pub missing_payload: Vec<RecordId>,
}

impl ReconcileReport {
    /// Returns true if the index already contained every checked id.
    pub fn is_clean(&self) -> bool {
        self.reappended.is_empty() && self.missing_payload.is_empty()
    }
}

//! # Domain Entities
//!
//! Core entities of the Record Ledger: the trial record, its status and the
//! simulation result attached when a record is optimized.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::value_objects::RecordId;

/// Seconds since the Unix epoch.
pub type Timestamp = u64;

/// Lifecycle status of a record.
///
/// `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// Submitted, awaiting simulation.
    #[default]
    Pending,
    /// Simulation completed; a result is attached.
    Optimized,
    /// Rejected by an external caller.
    Rejected,
}

impl RecordStatus {
    /// All statuses, in dashboard order.
    pub const ALL: [RecordStatus; 3] = [Self::Pending, Self::Optimized, Self::Rejected];

    /// Returns true if no further transition is defined from this status.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Lowercase name as persisted on the ledger.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Optimized => "optimized",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery-optimization result produced by the simulation provider.
///
/// Values are opaque display strings (e.g. `"1.84mg"`, `"IV"`, `"2.1 hours"`,
/// `"63%"`); the core never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub optimal_dosage: String,
    pub delivery_route: String,
    pub time_to_peak: String,
    pub efficacy: String,
}

/// A drug-delivery trial record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: RecordId,
    pub patient_id: String,
    pub drug_name: String,
    pub dosage: String,
    /// Output of the encryption provider. Never decrypted by the core.
    pub encrypted_payload: String,
    /// Immutable once set.
    pub created_at: Timestamp,
    pub status: RecordStatus,
    /// Present only when `status == Optimized`.
    pub simulation_result: Option<SimulationResult>,
}

impl Record {
    /// Create a new pending record.
    pub fn pending(
        id: RecordId,
        draft: &RecordDraft,
        encrypted_payload: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            patient_id: draft.patient_id.clone(),
            drug_name: draft.drug_name.clone(),
            dosage: draft.dosage.clone(),
            encrypted_payload,
            created_at,
            status: RecordStatus::Pending,
            simulation_result: None,
        }
    }

    /// Returns true if the record is still awaiting simulation.
    pub fn is_pending(&self) -> bool {
        self.status == RecordStatus::Pending
    }
}

/// Caller-supplied input for a new record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    pub patient_id: String,
    pub drug_name: String,
    pub dosage: String,
    /// Sensitive free text; only ever handed to the encryption provider.
    pub medical_history: String,
}

impl RecordDraft {
    /// Plaintext fields to be sealed by the encryption provider.
    pub fn sealed_fields(&self) -> PlaintextFields {
        PlaintextFields {
            medical_history: self.medical_history.clone(),
            biometrics: PLACEHOLDER_BIOMETRICS.to_string(),
        }
    }
}

/// Biometrics marker carried alongside the medical history.
pub const PLACEHOLDER_BIOMETRICS: &str = "encrypted_biometric_data";

/// Fields handed to the encryption provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaintextFields {
    pub medical_history: String,
    pub biometrics: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_terminality() {
        assert!(!RecordStatus::Pending.is_terminal());
        assert!(RecordStatus::Optimized.is_terminal());
        assert!(RecordStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&RecordStatus::Optimized).unwrap();
        assert_eq!(json, "\"optimized\"");
        let parsed: RecordStatus = serde_json::from_str("\"rejected\"").unwrap();
        assert_eq!(parsed, RecordStatus::Rejected);
    }

    #[test]
    fn test_pending_record_from_draft() {
        let draft = RecordDraft {
            patient_id: "P-1".into(),
            drug_name: "Aspirin".into(),
            dosage: "100mg".into(),
            medical_history: "none".into(),
        };
        let record = Record::pending(RecordId::from("r1"), &draft, "FHE-00".into(), 10);

        assert!(record.is_pending());
        assert_eq!(record.drug_name, "Aspirin");
        assert!(record.simulation_result.is_none());
    }
}

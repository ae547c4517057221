//! Shared fixtures for unit tests.

use std::sync::Arc;
use std::time::Duration;

use crate::adapters::{
    FixedSimulation, HexEnvelopeEncryption, InMemoryLedger, JsonRecordCodec, ManualTimeSource,
    WalletSession,
};
use crate::domain::{
    LedgerConfig, Record, RecordDraft, RecordId, RecordStatus, SimulationResult,
};
use crate::service::{LedgerDependencies, RecordLedgerService};

pub const TEST_ACCOUNT: &str = "0x00000000000000000000000000000000000000aa";
pub const TEST_EPOCH_SECS: u64 = 1_700_000_000;

pub type TestService =
    RecordLedgerService<InMemoryLedger, WalletSession, HexEnvelopeEncryption, FixedSimulation>;

pub fn make_record(id: &str, drug: &str, created_at: u64) -> Record {
    Record {
        id: RecordId::from(id),
        patient_id: format!("PT-{id}"),
        drug_name: drug.to_string(),
        dosage: "100mg".to_string(),
        encrypted_payload: "FHE-7b7d".to_string(),
        created_at,
        status: RecordStatus::Pending,
        simulation_result: None,
    }
}

pub fn make_draft(patient: &str, drug: &str) -> RecordDraft {
    RecordDraft {
        patient_id: patient.to_string(),
        drug_name: drug.to_string(),
        dosage: "250mg".to_string(),
        medical_history: "hypertension".to_string(),
    }
}

pub fn sample_result() -> SimulationResult {
    SimulationResult {
        optimal_dosage: "1.75mg".to_string(),
        delivery_route: "Subcutaneous".to_string(),
        time_to_peak: "2.40 hours".to_string(),
        efficacy: "72%".to_string(),
    }
}

/// Service over `ledger` with a connected wallet and a fixed clock.
pub fn make_service(
    ledger: &Arc<InMemoryLedger>,
    simulation: FixedSimulation,
) -> (TestService, Arc<WalletSession>) {
    let wallet = Arc::new(WalletSession::connected(TEST_ACCOUNT));
    let deps = LedgerDependencies {
        ledger: Arc::clone(ledger),
        identity: Arc::clone(&wallet),
        encryption: HexEnvelopeEncryption,
        simulation,
    };
    let config = LedgerConfig::default().with_simulation_timeout(Duration::from_secs(5));
    let service = RecordLedgerService::with_parts(
        deps,
        config,
        Arc::new(JsonRecordCodec),
        Arc::new(ManualTimeSource::at_secs(TEST_EPOCH_SECS)),
    );
    (service, wallet)
}

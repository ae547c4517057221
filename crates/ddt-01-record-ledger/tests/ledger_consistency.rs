//! # Ledger Consistency Tests (ddt-01)
//!
//! Multi-session behaviour against one shared ledger, driven only through
//! the public API.
//!
//! ## Test Categories
//!
//! 1. **Lifecycle** - create, simulate, read back
//! 2. **Index races** - interleaved read-modify-write, reconcile convergence
//! 3. **Isolation** - absent keys, corrupt payloads
//! 4. **Projections** - search and histogram over a hydrated snapshot

use std::sync::Arc;
use std::time::Duration;

use ddt_01_record_ledger::adapters::{
    FixedSimulation, HexEnvelopeEncryption, InMemoryLedger, JsonRecordCodec, ManualTimeSource,
    WalletSession,
};
use ddt_01_record_ledger::{
    filter, histogram_by_drug, LedgerConfig, LedgerDependencies, RecordDraft, RecordId,
    RecordLedgerApi, RecordLedgerService, RecordStatus, Signer, SimulationResult, StatusSummary,
    TimeSource,
};

// =============================================================================
// TEST HELPERS
// =============================================================================

type Session =
    RecordLedgerService<InMemoryLedger, WalletSession, HexEnvelopeEncryption, FixedSimulation>;

const EPOCH_SECS: u64 = 1_700_000_000;

fn result() -> SimulationResult {
    SimulationResult {
        optimal_dosage: "2.10mg".to_string(),
        delivery_route: "Oral".to_string(),
        time_to_peak: "1.80 hours".to_string(),
        efficacy: "81%".to_string(),
    }
}

fn draft(patient: &str, drug: &str) -> RecordDraft {
    RecordDraft {
        patient_id: patient.to_string(),
        drug_name: drug.to_string(),
        dosage: "500mg".to_string(),
        medical_history: "none reported".to_string(),
    }
}

fn session(ledger: &Arc<InMemoryLedger>, account: &str, clock: &Arc<ManualTimeSource>) -> Session {
    let deps = LedgerDependencies {
        ledger: Arc::clone(ledger),
        identity: Arc::new(WalletSession::connected(account)),
        encryption: HexEnvelopeEncryption,
        simulation: FixedSimulation::succeeding(result()),
    };
    let time: Arc<dyn TimeSource> = clock.clone();
    RecordLedgerService::with_parts(
        deps,
        LedgerConfig::default().with_simulation_timeout(Duration::from_secs(5)),
        Arc::new(JsonRecordCodec),
        time,
    )
}

fn clock() -> Arc<ManualTimeSource> {
    Arc::new(ManualTimeSource::at_secs(EPOCH_SECS))
}

// =============================================================================
// LIFECYCLE
// =============================================================================

#[tokio::test]
async fn test_created_record_is_optimized_by_simulation() {
    let ledger = Arc::new(InMemoryLedger::new());
    let alice = session(&ledger, "0xa11ce", &clock());

    let record = alice.create_record(draft("PT-1", "Aspirin")).await.unwrap();
    assert_eq!(record.status, RecordStatus::Pending);

    alice.run_simulation(&record.id).await.unwrap();

    let stored = alice.get_record(&record.id).await.unwrap().unwrap();
    assert_eq!(stored.status, RecordStatus::Optimized);
    assert_eq!(stored.simulation_result, Some(result()));
    assert_eq!(stored.drug_name, "Aspirin");
}

#[tokio::test]
async fn test_other_session_sees_transition() {
    let ledger = Arc::new(InMemoryLedger::new());
    let time = clock();
    let alice = session(&ledger, "0xa11ce", &time);
    let bob = session(&ledger, "0xb0b", &time);

    let record = alice.create_record(draft("PT-1", "Aspirin")).await.unwrap();
    bob.run_simulation(&record.id).await.unwrap();

    let snapshot = alice.load_all().await.unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].status, RecordStatus::Optimized);
    assert_eq!(ledger.receipts().last().unwrap().account, "0xb0b");
}

// =============================================================================
// INDEX RACES
// =============================================================================

#[tokio::test]
async fn test_interleaved_appends_lose_one_id_until_repeated() {
    let ledger = Arc::new(InMemoryLedger::new());
    let time = clock();
    let alice = session(&ledger, "0xa11ce", &time);
    let bob = session(&ledger, "0xb0b", &time);
    let r1 = RecordId::from("r1");
    let r2 = RecordId::from("r2");

    // Both read the empty index before either writes.
    let mut seen_by_alice = alice.index().list_ids().await.unwrap();
    let mut seen_by_bob = bob.index().list_ids().await.unwrap();
    seen_by_alice.push(r1.clone());
    seen_by_bob.push(r2.clone());
    alice.index().publish(&Signer::new("0xa11ce"), &seen_by_alice).await.unwrap();
    bob.index().publish(&Signer::new("0xb0b"), &seen_by_bob).await.unwrap();

    assert_eq!(alice.list_ids().await.unwrap(), vec![r2.clone()]);

    alice.index().append(&Signer::new("0xa11ce"), &r1).await.unwrap();

    let mut ids = bob.list_ids().await.unwrap();
    ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    assert_eq!(ids, vec![r1, r2]);
}

#[tokio::test]
async fn test_reconcile_restores_id_dropped_by_stale_writer() {
    let ledger = Arc::new(InMemoryLedger::new());
    let time = clock();
    let alice = session(&ledger, "0xa11ce", &time);
    let bob = session(&ledger, "0xb0b", &time);

    let stale = bob.index().list_ids().await.unwrap();
    let from_alice = alice.create_record(draft("PT-1", "Aspirin")).await.unwrap();
    time.advance_secs(1);
    let from_bob = bob.create_record(draft("PT-2", "Ibuprofen")).await.unwrap();

    // Bob's delayed write from the snapshot taken before Alice committed.
    let mut overwrite = stale;
    overwrite.push(from_bob.id.clone());
    bob.index().publish(&Signer::new("0xb0b"), &overwrite).await.unwrap();
    assert_eq!(alice.load_all().await.unwrap().len(), 1);

    let report = alice.reconcile_index().await.unwrap();
    assert_eq!(report.reappended, vec![from_alice.id.clone()]);

    let snapshot = bob.load_all().await.unwrap();
    let ids: Vec<_> = snapshot.iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, vec![from_bob.id, from_alice.id]);
    assert!(bob.reconcile_index().await.unwrap().is_clean());
}

#[tokio::test]
async fn test_concurrent_creation_converges_after_reconcile() {
    let ledger = Arc::new(InMemoryLedger::new().with_yielding());
    let time = clock();
    let alice = session(&ledger, "0xa11ce", &time);
    let bob = session(&ledger, "0xb0b", &time);
    let carol = session(&ledger, "0xca201", &time);

    let (a, b, c) = tokio::join!(
        alice.create_record(draft("PT-1", "Metformin")),
        bob.create_record(draft("PT-2", "Metformin")),
        carol.create_record(draft("PT-3", "Metformin")),
    );
    let created = [a.unwrap(), b.unwrap(), c.unwrap()];

    // Every session read the index before any of them wrote it back.
    let before = alice.list_ids().await.unwrap();
    assert!(before.len() < created.len(), "no index write was lost: {before:?}");

    let mut reappended = 0;
    for s in [&alice, &bob, &carol] {
        reappended += s.reconcile_index().await.unwrap().reappended.len();
    }
    assert_eq!(reappended, created.len() - before.len());

    let ids = alice.list_ids().await.unwrap();
    assert_eq!(ids.len(), created.len());
    for record in &created {
        assert!(ids.contains(&record.id));
    }
    assert_eq!(bob.load_all().await.unwrap().len(), created.len());
}

// =============================================================================
// ISOLATION
// =============================================================================

#[tokio::test]
async fn test_unknown_id_is_absent_not_error() {
    let ledger = Arc::new(InMemoryLedger::new());
    let alice = session(&ledger, "0xa11ce", &clock());

    let found = alice.get_record(&RecordId::from("unknown")).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_corrupt_payload_is_skipped_during_hydration() {
    let ledger = Arc::new(InMemoryLedger::new());
    let alice = session(&ledger, "0xa11ce", &clock());
    let good = alice.create_record(draft("PT-1", "Aspirin")).await.unwrap();

    ledger.insert_raw("record:broken", b"{not json".to_vec());
    ledger.insert_raw(
        "drug_delivery_keys",
        format!(r#"["{}","broken","missing"]"#, good.id).into_bytes(),
    );

    let snapshot = alice.load_all().await.unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, good.id);
}

#[tokio::test]
async fn test_unreadable_key_does_not_abort_hydration() {
    let ledger = Arc::new(InMemoryLedger::new());
    let time = clock();
    let alice = session(&ledger, "0xa11ce", &time);
    let mut created = Vec::new();
    for drug in ["Aspirin", "Ibuprofen", "Metformin"] {
        created.push(alice.create_record(draft("PT-1", drug)).await.unwrap());
        time.advance_secs(1);
    }
    ledger.fail_reads_from(format!("record:{}", created[1].id));

    let snapshot = alice.load_all().await.unwrap();

    let drugs: Vec<_> = snapshot.iter().map(|r| r.drug_name.as_str()).collect();
    assert_eq!(drugs, vec!["Metformin", "Aspirin"]);
}

// =============================================================================
// PROJECTIONS
// =============================================================================

#[tokio::test]
async fn test_search_and_chart_over_snapshot() {
    let ledger = Arc::new(InMemoryLedger::new());
    let time = clock();
    let alice = session(&ledger, "0xa11ce", &time);
    for drug in ["Aspirin", "Ibuprofen", "Aspirin"] {
        alice.create_record(draft("PT-7", drug)).await.unwrap();
        time.advance_secs(10);
    }

    let snapshot = alice.load_all().await.unwrap();

    let matches = filter(&snapshot, "asp");
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(|r| r.drug_name == "Aspirin"));

    let chart = histogram_by_drug(&snapshot);
    assert_eq!(chart.get("Aspirin"), Some(2));
    assert_eq!(chart.get("Ibuprofen"), Some(1));
    assert_eq!(chart.max_count(), 2);

    let summary = StatusSummary::from_snapshot(&snapshot);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.pending, 3);
}

#[tokio::test]
async fn test_empty_ledger_has_empty_chart() {
    let ledger = Arc::new(InMemoryLedger::new());
    let alice = session(&ledger, "0xa11ce", &clock());

    let snapshot = alice.load_all().await.unwrap();
    let chart = histogram_by_drug(&snapshot);

    assert!(chart.is_empty());
    assert_eq!(chart.max_count(), 1);
    assert_eq!(chart.ratio("Aspirin"), 0.0);
}

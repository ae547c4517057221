//! # Record Ledger Subsystem (ddt-01)
//!
//! The Record Ledger persists drug-delivery trial records on an external
//! key/value ledger, keeps the shared record index consistent across
//! concurrent writers, and drives each record's lifecycle through an external
//! simulation step.
//!
//! ## Persisted Layout
//!
//! ```text
//! drug_delivery_keys → ["<id>", "<id>", ...]          (Record Index)
//! record:<id>        → {"patientId", "drugName", ...}  (Record Repository)
//! ```
//!
//! The ledger offers one-write-per-call atomicity and no enumeration. The
//! index is the only way to discover records, and it is updated by blind
//! read-modify-write.
//!
//! ## Record Lifecycle
//!
//! ```text
//!            ┌── run_simulation ──→ Optimized (terminal, result attached)
//! Pending ───┤
//!            └── reject_record ───→ Rejected  (terminal)
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement |
//! |----|-----------|-------------|
//! | INVARIANT-1 | Index/repository convergence | payload written before index; `reconcile_index` re-appends dropped ids |
//! | INVARIANT-2 | No duplicate index entries | `RecordIndex::append` skips present ids; hydration dedups |
//! | INVARIANT-3 | Terminal states are final | `domain::lifecycle::apply` |
//! | INVARIANT-4 | No partial writes | every guard and provider call precedes the single `put` |
//! | INVARIANT-5 | Per-key failure isolation | `RecordRepository::get` / `hydrate_all` log and skip |
//!
//! ## Hexagonal Architecture
//!
//! - **Domain Layer** (`domain/`): entities, state machine, projections; no I/O
//! - **Ports Layer** (`ports/`): `RecordLedgerApi` inbound, collaborator traits outbound
//! - **Service Layer** (`service/`): index manager, repository, lifecycle operations
//! - **Adapters Layer** (`adapters/`): in-memory ledger, JSON codec, placeholder providers, API handler
//!
//! ## Usage
//!
//! ```ignore
//! use ddt_01_record_ledger::prelude::*;
//!
//! let service = RecordLedgerService::new(deps, LedgerConfig::default());
//! let record = service.create_record(draft).await?;
//! let optimized = service.run_simulation(&record.id).await?;
//! let snapshot = service.load_all().await?;
//! let chart = histogram_by_drug(&snapshot);
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(test)]
mod test_utils;

// Re-export main types for convenience
pub use domain::{
    count_by_status, filter, histogram_by_drug, DrugCount, DrugHistogram, KeyLayout,
    LedgerConfig, LedgerError, LedgerErrorKind, PlaintextFields, ReconcileReport, Record,
    RecordDraft, RecordId, RecordStatus, SimulationResult, Signer, StatusSummary, Timestamp,
};

pub use ports::{
    EncryptionProvider, IdentityProvider, LedgerStore, RecordCodec, RecordLedgerApi,
    SimulationProvider, TimeSource,
};

pub use service::{
    AppendOutcome, LedgerDependencies, RecordIndex, RecordLedgerService, RecordRepository,
    ServiceStats,
};

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::{
        FixedSimulation, HexEnvelopeEncryption, InMemoryLedger, JsonRecordCodec,
        RandomizedSimulation, SystemTimeSource, WalletSession,
    };
    pub use crate::domain::{
        count_by_status, filter, histogram_by_drug, DrugHistogram, LedgerConfig, LedgerError,
        LedgerErrorKind, Record, RecordDraft, RecordId, RecordStatus, SimulationResult,
        StatusSummary,
    };
    pub use crate::ports::{RecordLedgerApi, LedgerStore};
    pub use crate::service::{LedgerDependencies, RecordLedgerService};
}

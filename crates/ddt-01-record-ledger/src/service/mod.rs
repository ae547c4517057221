//! # Record Ledger Service
//!
//! Application service composing the index manager, the repository and the
//! lifecycle state machine behind `RecordLedgerApi`.
//!
//! ## Write ordering
//!
//! Creation writes the record payload first and the index second. A failure
//! between the two leaves an unreferenced payload, which is invisible to
//! readers and harmless; the id is remembered so `reconcile_index` can
//! register it later.

mod index;
mod lifecycle;
mod repository;


pub use index::{AppendOutcome, RecordIndex};
pub use repository::RecordRepository;

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::adapters::{JsonRecordCodec, SystemTimeSource};
use crate::domain::{
    LedgerConfig, LedgerError, ReconcileReport, Record, RecordDraft, RecordId, Signer,
};
use crate::ports::inbound::RecordLedgerApi;
use crate::ports::outbound::{
    EncryptionProvider, IdentityProvider, LedgerStore, RecordCodec, SimulationProvider, TimeSource,
};

/// Collaborators injected into the service.
pub struct LedgerDependencies<L, I, E, S> {
    /// Ledger shared with other sessions.
    pub ledger: Arc<L>,
    /// Wallet supplying the signer.
    pub identity: Arc<I>,
    pub encryption: E,
    pub simulation: S,
}

/// Operation counters for one session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    pub records_created: u64,
    pub simulations_completed: u64,
    pub simulations_failed: u64,
    pub records_rejected: u64,
    pub ids_reconciled: u64,
}

/// Record Ledger service for one session.
pub struct RecordLedgerService<L, I, E, S> {
    config: LedgerConfig,
    ledger: Arc<L>,
    identity: Arc<I>,
    encryption: E,
    simulation: S,
    repository: RecordRepository<L>,
    time: Arc<dyn TimeSource>,
    /// Ids whose payload this session wrote, in creation order.
    created_locally: Mutex<Vec<RecordId>>,
    stats: Mutex<ServiceStats>,
}

impl<L, I, E, S> RecordLedgerService<L, I, E, S>
where
    L: LedgerStore,
    I: IdentityProvider,
    E: EncryptionProvider,
    S: SimulationProvider,
{
    /// Create a service with the JSON codec and the system clock.
    pub fn new(deps: LedgerDependencies<L, I, E, S>, config: LedgerConfig) -> Self {
        Self::with_parts(deps, config, Arc::new(JsonRecordCodec), Arc::new(SystemTimeSource))
    }

    /// Create a service with an explicit codec and clock.
    pub fn with_parts(
        deps: LedgerDependencies<L, I, E, S>,
        config: LedgerConfig,
        codec: Arc<dyn RecordCodec>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        let repository = RecordRepository::new(Arc::clone(&deps.ledger), codec, config.keys.clone());
        Self {
            config,
            ledger: deps.ledger,
            identity: deps.identity,
            encryption: deps.encryption,
            simulation: deps.simulation,
            repository,
            time,
            created_locally: Mutex::new(Vec::new()),
            stats: Mutex::new(ServiceStats::default()),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn repository(&self) -> &RecordRepository<L> {
        &self.repository
    }

    pub fn index(&self) -> &RecordIndex<L> {
        self.repository.index()
    }

    /// Snapshot of the session counters.
    pub fn stats(&self) -> ServiceStats {
        self.stats.lock().clone()
    }

    /// Ids created by this session, oldest first.
    pub fn created_locally(&self) -> Vec<RecordId> {
        self.created_locally.lock().clone()
    }

    /// Fail with `LedgerUnavailable` unless the ledger accepts calls.
    async fn ensure_available(&self) -> Result<(), LedgerError> {
        if self.ledger.is_available().await? {
            Ok(())
        } else {
            warn!("Ledger reports unavailable");
            Err(LedgerError::LedgerUnavailable)
        }
    }

    /// Signer for a write, then an availability check.
    async fn authorize_write(&self) -> Result<Signer, LedgerError> {
        let signer = self.identity.signer().await?;
        self.ensure_available().await?;
        Ok(signer)
    }

    fn remember_created(&self, id: &RecordId) {
        let mut created = self.created_locally.lock();
        if !created.contains(id) {
            created.push(id.clone());
        }
    }

    /// Every readable indexed record, newest first.
    #[instrument(skip(self))]
    pub async fn hydrate_all(&self) -> Result<Vec<Record>, LedgerError> {
        self.ensure_available().await?;
        self.repository.hydrate_all().await
    }

    /// Encrypt, persist and index a new pending record.
    #[instrument(skip(self, draft), fields(drug = %draft.drug_name))]
    pub async fn create(&self, draft: RecordDraft) -> Result<Record, LedgerError> {
        let signer = self.authorize_write().await?;

        let encrypted = self
            .encryption
            .encrypt(&draft.sealed_fields())
            .await
            .map_err(|e| LedgerError::from_provider("encryption", e))?;

        let id = RecordId::generate(self.time.now_millis(), &mut rand::thread_rng());
        let record = Record::pending(id.clone(), &draft, encrypted, self.time.now());

        self.repository.put(&signer, &id, &record).await?;
        self.remember_created(&id);
        self.repository.index().append(&signer, &id).await?;

        self.stats.lock().records_created += 1;
        info!(record_id = %id, "Record created");
        Ok(record)
    }

    /// Re-append locally created ids that are missing from the index.
    ///
    /// Ids whose payload cannot be read are reported, not re-appended, so
    /// the index never gains a dangling entry from this pass.
    #[instrument(skip(self))]
    pub async fn reconcile(&self) -> Result<ReconcileReport, LedgerError> {
        self.ensure_available().await?;

        let local = self.created_locally();
        let indexed = self.repository.index().list_ids().await?;
        let mut report = ReconcileReport {
            checked: local.len(),
            ..ReconcileReport::default()
        };

        for id in local.into_iter().filter(|id| !indexed.contains(id)) {
            if self.repository.get(&id).await?.is_some() {
                report.reappended.push(id);
            } else {
                warn!(record_id = %id, "Locally created record has no readable payload");
                report.missing_payload.push(id);
            }
        }

        if report.reappended.is_empty() {
            return Ok(report);
        }

        let signer = self.identity.signer().await?;
        let mut ids = self.repository.index().list_ids().await?;
        for id in &report.reappended {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        self.repository.index().publish(&signer, &ids).await?;

        self.stats.lock().ids_reconciled += report.reappended.len() as u64;
        info!(reappended = report.reappended.len(), "Record index reconciled");
        Ok(report)
    }
}

#[async_trait]
impl<L, I, E, S> RecordLedgerApi for RecordLedgerService<L, I, E, S>
where
    L: LedgerStore,
    I: IdentityProvider,
    E: EncryptionProvider,
    S: SimulationProvider,
{
    async fn list_ids(&self) -> Result<Vec<RecordId>, LedgerError> {
        self.repository.index().list_ids().await
    }

    async fn get_record(&self, id: &RecordId) -> Result<Option<Record>, LedgerError> {
        self.repository.get(id).await
    }

    async fn load_all(&self) -> Result<Vec<Record>, LedgerError> {
        self.hydrate_all().await
    }

    async fn create_record(&self, draft: RecordDraft) -> Result<Record, LedgerError> {
        self.create(draft).await
    }

    async fn run_simulation(&self, id: &RecordId) -> Result<Record, LedgerError> {
        self.simulate(id).await
    }

    async fn reject_record(&self, id: &RecordId) -> Result<Record, LedgerError> {
        self.reject(id).await
    }

    async fn reconcile_index(&self) -> Result<ReconcileReport, LedgerError> {
        self.reconcile().await
    }
}

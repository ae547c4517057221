//! # Record Lifecycle Operations
//!
//! I/O around the pure state machine in `domain::lifecycle`: load the
//! record, check eligibility, call the simulation provider, write the
//! successor. No write happens unless every earlier step succeeded.

use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::domain::lifecycle::{self, Transition};
use crate::domain::{LedgerError, ProviderError, Record, RecordId};
use crate::ports::outbound::{
    EncryptionProvider, IdentityProvider, LedgerStore, SimulationProvider,
};

use super::RecordLedgerService;

impl<L, I, E, S> RecordLedgerService<L, I, E, S>
where
    L: LedgerStore,
    I: IdentityProvider,
    E: EncryptionProvider,
    S: SimulationProvider,
{
    async fn load_existing(&self, id: &RecordId) -> Result<Record, LedgerError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| LedgerError::NotFound { id: id.clone() })
    }

    /// pending → optimized, guarded by the simulation provider.
    ///
    /// The provider call is bounded by `simulation_timeout`; expiry counts
    /// as a provider failure and the record stays pending.
    #[instrument(skip(self, id), fields(record_id = %id))]
    pub async fn simulate(&self, id: &RecordId) -> Result<Record, LedgerError> {
        let signer = self.authorize_write().await?;
        let record = self.load_existing(id).await?;
        lifecycle::ensure_pending(&record, "simulate")?;

        let timeout = self.config.simulation_timeout;
        let started = Instant::now();
        let outcome =
            match tokio::time::timeout(timeout, self.simulation.simulate(&record.encrypted_payload))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout {
                    elapsed_ms: started.elapsed().as_millis() as u64,
                }),
            };

        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Simulation failed, record stays pending");
                self.stats.lock().simulations_failed += 1;
                return Err(LedgerError::from_provider("simulation", e));
            }
        };

        let optimized = lifecycle::apply(&record, Transition::Optimize(result))?;
        self.repository.put(&signer, id, &optimized).await?;

        self.stats.lock().simulations_completed += 1;
        info!("Record optimized");
        Ok(optimized)
    }

    /// pending → rejected. Only reachable through an explicit call.
    #[instrument(skip(self, id), fields(record_id = %id))]
    pub async fn reject(&self, id: &RecordId) -> Result<Record, LedgerError> {
        let signer = self.authorize_write().await?;
        let record = self.load_existing(id).await?;

        let rejected = lifecycle::apply(&record, Transition::Reject)?;
        self.repository.put(&signer, id, &rejected).await?;

        self.stats.lock().records_rejected += 1;
        info!("Record rejected");
        Ok(rejected)
    }
}

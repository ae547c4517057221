//! # Placeholder Collaborators
//!
//! Stand-ins for the wallet, encryption and simulation collaborators.
//!
//! `HexEnvelopeEncryption` and `RandomizedSimulation` are NOT confidential
//! compute: the envelope is a reversible encoding and the simulation draws
//! random numbers. They exist so the record lifecycle can run end to end.

use async_trait::async_trait;
use parking_lot::RwLock;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::domain::{
    IdentityError, PlaintextFields, ProviderError, SimulationResult, Signer,
};
use crate::ports::outbound::{EncryptionProvider, IdentityProvider, SimulationProvider};

/// Prefix marking an envelope produced by `HexEnvelopeEncryption`.
pub const ENVELOPE_PREFIX: &str = "FHE-";

/// Delivery routes the placeholder simulation picks from.
pub const DELIVERY_ROUTES: [&str; 3] = ["IV", "Oral", "Subcutaneous"];

// =============================================================================
// IDENTITY
// =============================================================================

/// Wallet connection state for one session.
#[derive(Debug, Default)]
pub struct WalletSession {
    account: RwLock<Option<String>>,
    declining: AtomicBool,
}

impl WalletSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session already connected to `account`.
    pub fn connected(account: impl Into<String>) -> Self {
        let session = Self::new();
        session.connect(account);
        session
    }

    pub fn connect(&self, account: impl Into<String>) {
        *self.account.write() = Some(account.into());
    }

    pub fn disconnect(&self) {
        *self.account.write() = None;
    }

    /// Currently connected account, if any.
    pub fn account(&self) -> Option<String> {
        self.account.read().clone()
    }

    /// Make the wallet decline (or stop declining) authorization prompts.
    pub fn set_declining(&self, declining: bool) {
        self.declining.store(declining, Ordering::SeqCst);
    }
}

#[async_trait]
impl IdentityProvider for WalletSession {
    async fn signer(&self) -> Result<Signer, IdentityError> {
        let account = self.account().ok_or(IdentityError::NotConnected)?;
        if self.declining.load(Ordering::SeqCst) {
            return Err(IdentityError::Declined);
        }
        Ok(Signer::new(account))
    }
}

// =============================================================================
// ENCRYPTION
// =============================================================================

/// `FHE-` followed by the hex encoding of the JSON fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct HexEnvelopeEncryption;

#[async_trait]
impl EncryptionProvider for HexEnvelopeEncryption {
    async fn encrypt(&self, fields: &PlaintextFields) -> Result<String, ProviderError> {
        let json = serde_json::to_vec(fields).map_err(|e| ProviderError::Failed(e.to_string()))?;
        Ok(format!("{ENVELOPE_PREFIX}{}", hex::encode(json)))
    }
}

// =============================================================================
// SIMULATION
// =============================================================================

/// Simulation that sleeps for `latency` and returns randomized values.
#[derive(Debug, Clone)]
pub struct RandomizedSimulation {
    latency: Duration,
}

impl RandomizedSimulation {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for RandomizedSimulation {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}

#[async_trait]
impl SimulationProvider for RandomizedSimulation {
    async fn simulate(&self, encrypted_payload: &str) -> Result<SimulationResult, ProviderError> {
        if !encrypted_payload.starts_with(ENVELOPE_PREFIX) {
            return Err(ProviderError::Failed(
                "payload is not a sealed envelope".to_string(),
            ));
        }

        tokio::time::sleep(self.latency).await;

        let mut rng = rand::thread_rng();
        Ok(SimulationResult {
            optimal_dosage: format!("{:.2}mg", rng.gen_range(1.0..3.0)),
            delivery_route: DELIVERY_ROUTES[rng.gen_range(0..DELIVERY_ROUTES.len())].to_string(),
            time_to_peak: format!("{:.2} hours", rng.gen_range(1.0..5.0)),
            efficacy: format!("{}%", rng.gen_range(20..100)),
        })
    }
}

/// Simulation returning a preset outcome after an optional delay.
#[derive(Debug, Clone)]
pub struct FixedSimulation {
    outcome: Result<SimulationResult, ProviderError>,
    latency: Duration,
}

impl FixedSimulation {
    /// Always succeed with `result`.
    pub fn succeeding(result: SimulationResult) -> Self {
        Self {
            outcome: Ok(result),
            latency: Duration::ZERO,
        }
    }

    /// Always fail with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(ProviderError::Failed(message.into())),
            latency: Duration::ZERO,
        }
    }

    /// Delay every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl SimulationProvider for FixedSimulation {
    async fn simulate(&self, _encrypted_payload: &str) -> Result<SimulationResult, ProviderError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.outcome.clone()
    }
}

//! # Session Container
//!
//! Holds the ledger, the wallet and the Record Ledger service for one
//! process, wired to the in-memory adapters.

pub mod config;

pub use config::{ConfigError, ConfigOverrides, RuntimeConfig};

use std::sync::Arc;

use ddt_01_record_ledger::adapters::{
    ApiGatewayHandler, HexEnvelopeEncryption, InMemoryLedger, RandomizedSimulation, WalletSession,
};
use ddt_01_record_ledger::{LedgerDependencies, RecordLedgerService};
use tracing::info;

/// Record Ledger service as wired by the runtime.
pub type RuntimeService =
    RecordLedgerService<InMemoryLedger, WalletSession, HexEnvelopeEncryption, RandomizedSimulation>;

pub struct SessionContainer {
    pub ledger: Arc<InMemoryLedger>,
    pub wallet: Arc<WalletSession>,
    pub service: Arc<RuntimeService>,
    pub api: ApiGatewayHandler<RuntimeService>,
}

impl SessionContainer {
    /// Wire a fresh in-memory ledger.
    pub fn new(config: &RuntimeConfig) -> Self {
        Self::with_ledger(config, Arc::new(InMemoryLedger::new()))
    }

    /// Wire against an existing ledger, shared with other sessions.
    pub fn with_ledger(config: &RuntimeConfig, ledger: Arc<InMemoryLedger>) -> Self {
        let wallet = Arc::new(match &config.account {
            Some(account) => WalletSession::connected(account.clone()),
            None => WalletSession::new(),
        });

        let deps = LedgerDependencies {
            ledger: Arc::clone(&ledger),
            identity: Arc::clone(&wallet),
            encryption: HexEnvelopeEncryption,
            simulation: RandomizedSimulation::new(config.simulation_delay),
        };
        let service = Arc::new(RecordLedgerService::new(deps, config.ledger.clone()));
        let api = ApiGatewayHandler::new(Arc::clone(&service));

        info!(
            index_key = %config.ledger.keys.index_key,
            connected = wallet.account().is_some(),
            "Session container initialized"
        );

        Self {
            ledger,
            wallet,
            service,
            api,
        }
    }
}

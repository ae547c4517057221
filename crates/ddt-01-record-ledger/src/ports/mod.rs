//! # Ports Layer
//!
//! Hexagonal architecture ports for the Record Ledger.
//!
//! - **Driving Ports (Inbound)**: `RecordLedgerApi`, consumed by the session
//!   controller and the API handler.
//! - **Driven Ports (Outbound)**: ledger store, wallet, encryption and
//!   simulation collaborators, implemented by adapters.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;

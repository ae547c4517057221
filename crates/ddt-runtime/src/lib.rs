//! # DrugDeliveryTwin Session Runtime
//!
//! Wires the Record Ledger (ddt-01) to in-memory adapters and exposes the
//! session controller used by the `ddt-runtime` binary.

pub mod container;
pub mod session;

pub use container::{ConfigError, ConfigOverrides, RuntimeConfig, SessionContainer};
pub use session::SessionController;

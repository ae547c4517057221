//! # Adapters Layer
//!
//! Implementations of the outbound ports and the JSON query handler.
//!
//! - `memory_ledger` - shared in-memory ledger with fault injection
//! - `codec` - JSON layout of the index and record values
//! - `providers` - wallet session and placeholder confidential compute
//! - `time` - system and manual clocks
//! - `api_handler` - JSON method dispatch over `RecordLedgerApi`

pub mod api_handler;
pub mod codec;
pub mod memory_ledger;
pub mod providers;
pub mod time;

pub use api_handler::{handle_api_query, ApiGatewayHandler, ApiQueryError};
pub use codec::JsonRecordCodec;
pub use memory_ledger::{InMemoryLedger, WriteReceipt};
pub use providers::{
    FixedSimulation, HexEnvelopeEncryption, RandomizedSimulation, WalletSession,
    DELIVERY_ROUTES, ENVELOPE_PREFIX,
};
pub use time::{ManualTimeSource, SystemTimeSource};

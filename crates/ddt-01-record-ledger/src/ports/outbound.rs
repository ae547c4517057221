//! # Outbound Ports (Driven Ports)
//!
//! Collaborators the Record Ledger depends on. None of them is implemented
//! by the core; `adapters` provides in-memory and placeholder versions.

use async_trait::async_trait;

use crate::domain::{
    CodecError, IdentityError, PlaintextFields, ProviderError, Record, RecordId,
    SimulationResult, Signer, StoreError, Timestamp,
};

// =============================================================================
// LEDGER KEY/VALUE STORE
// =============================================================================

/// Blockchain-backed key/value storage contract.
///
/// ## Atomicity
///
/// Each `write` call is atomic on its own. Nothing spans two calls: a
/// record write followed by an index write can be interleaved with other
/// writers or interrupted between the two.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Read the value under `key`. An absent key reads as an empty vector.
    async fn read(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Overwrite the value under `key`, authorized by `signer`.
    async fn write(&self, signer: &Signer, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Whether the storage contract currently accepts calls.
    async fn is_available(&self) -> Result<bool, StoreError>;
}

// =============================================================================
// IDENTITY (WALLET)
// =============================================================================

/// Supplies the signing identity for ledger writes.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Request the signer for the next write.
    ///
    /// # Errors
    ///
    /// * `IdentityError::NotConnected` - no wallet is connected
    /// * `IdentityError::Declined` - the authorization prompt was declined
    async fn signer(&self) -> Result<Signer, IdentityError>;
}

// =============================================================================
// CONFIDENTIAL COMPUTE
// =============================================================================

/// Seals plaintext fields into an opaque payload.
#[async_trait]
pub trait EncryptionProvider: Send + Sync {
    async fn encrypt(&self, fields: &PlaintextFields) -> Result<String, ProviderError>;
}

/// Computes a delivery-optimization result from an opaque payload without
/// decrypting it in the clear.
///
/// Calls may be slow. The service bounds them with its configured timeout.
#[async_trait]
pub trait SimulationProvider: Send + Sync {
    async fn simulate(&self, encrypted_payload: &str) -> Result<SimulationResult, ProviderError>;
}

// =============================================================================
// LOCAL SERVICES
// =============================================================================

/// Persisted encoding of the index and of records.
pub trait RecordCodec: Send + Sync {
    /// Encode the ordered id list.
    fn encode_index(&self, ids: &[RecordId]) -> Result<Vec<u8>, CodecError>;

    /// Decode the ordered id list.
    fn decode_index(&self, bytes: &[u8]) -> Result<Vec<RecordId>, CodecError>;

    /// Encode a record. The id is carried by the key, not the value.
    fn encode_record(&self, record: &Record) -> Result<Vec<u8>, CodecError>;

    /// Decode the record stored under `id`.
    fn decode_record(&self, id: &RecordId, bytes: &[u8]) -> Result<Record, CodecError>;
}

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// Milliseconds since epoch.
    fn now_millis(&self) -> u64;

    /// Seconds since epoch.
    fn now(&self) -> Timestamp {
        self.now_millis() / 1000
    }
}

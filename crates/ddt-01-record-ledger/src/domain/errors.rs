//! # Error Types
//!
//! Errors surfaced by the Record Ledger and by its collaborators.
//!
//! Per-key serialization failures during reads are absorbed by the
//! repository and never reach callers as `LedgerError::Serialization`;
//! that variant is only returned when encoding a record for a write fails.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::RecordStatus;
use super::value_objects::RecordId;

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Terminal failure of a Record Ledger operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// No signer is available for a write.
    #[error("no signer available: connect a wallet first")]
    Unauthenticated,

    /// The wallet's authorization prompt was declined.
    #[error("authorization declined by user")]
    UserCancelled,

    /// Operation on an unknown record id.
    #[error("record not found: {id}")]
    NotFound { id: RecordId },

    /// Transition attempted from a non-eligible status.
    #[error("cannot {action} record {id} in status {status}")]
    InvalidState {
        id: RecordId,
        status: RecordStatus,
        action: &'static str,
    },

    /// Payload could not be encoded or decoded.
    #[error("serialization error for {key}: {message}")]
    Serialization { key: String, message: String },

    /// The ledger reports itself as unavailable.
    #[error("ledger unavailable")]
    LedgerUnavailable,

    /// A ledger write or read round trip failed.
    #[error("ledger store error: {0}")]
    Store(#[from] StoreError),

    /// Encryption or simulation collaborator failure.
    #[error("{provider} provider error: {message}")]
    ExternalProvider {
        provider: &'static str,
        message: String,
    },
}

impl LedgerError {
    /// The distinguishable kind of this error.
    pub fn kind(&self) -> LedgerErrorKind {
        match self {
            Self::Unauthenticated => LedgerErrorKind::Unauthenticated,
            Self::UserCancelled => LedgerErrorKind::UserCancelled,
            Self::NotFound { .. } => LedgerErrorKind::NotFound,
            Self::InvalidState { .. } => LedgerErrorKind::InvalidState,
            Self::Serialization { .. } => LedgerErrorKind::SerializationError,
            Self::LedgerUnavailable => LedgerErrorKind::LedgerUnavailable,
            Self::Store(StoreError::Unavailable) => LedgerErrorKind::LedgerUnavailable,
            Self::Store(_) => LedgerErrorKind::StoreFailure,
            Self::ExternalProvider { .. } => LedgerErrorKind::ExternalProviderError,
        }
    }

    pub(crate) fn from_provider(provider: &'static str, err: ProviderError) -> Self {
        Self::ExternalProvider {
            provider,
            message: err.to_string(),
        }
    }
}

impl From<IdentityError> for LedgerError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::NotConnected => Self::Unauthenticated,
            IdentityError::Declined => Self::UserCancelled,
        }
    }
}

/// Error kinds for callers that only need to branch on the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerErrorKind {
    Unauthenticated,
    UserCancelled,
    NotFound,
    InvalidState,
    SerializationError,
    LedgerUnavailable,
    StoreFailure,
    ExternalProviderError,
}

// =============================================================================
// COLLABORATOR ERRORS
// =============================================================================

/// Failures reported by a ledger key/value store adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store cannot be reached.
    #[error("store unavailable")]
    Unavailable,

    /// A write was rejected or did not complete.
    #[error("write to {key} failed: {message}")]
    WriteFailed { key: String, message: String },

    /// A read did not complete.
    #[error("read of {key} failed: {message}")]
    ReadFailed { key: String, message: String },
}

/// Failures reported by the encryption or simulation provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider rejected or failed the request.
    #[error("{0}")]
    Failed(String),

    /// The caller-imposed deadline expired.
    #[error("timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },
}

/// Failures reported by the identity (wallet) provider.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IdentityError {
    /// No wallet is connected.
    #[error("no wallet connected")]
    NotConnected,

    /// The user declined the authorization prompt.
    #[error("user rejected the request")]
    Declined,
}

/// Encoding/decoding failure of a persisted value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CodecError {
    pub message: String,
}

impl CodecError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}

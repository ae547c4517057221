//! # Record Lifecycle
//!
//! Pure state machine for record status transitions.
//!
//! ```text
//!            ┌──optimize──→ Optimized (terminal)
//! Pending ───┤
//!            └───reject───→ Rejected  (terminal)
//! ```
//!
//! The service layer performs I/O around these functions; nothing here
//! touches the ledger.

use super::entities::{Record, RecordStatus, SimulationResult};
use super::errors::LedgerError;

/// A requested status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Attach a simulation result and mark the record optimized.
    Optimize(SimulationResult),
    /// Mark the record rejected.
    Reject,
}

impl Transition {
    /// Target status of this transition.
    pub fn target(&self) -> RecordStatus {
        match self {
            Self::Optimize(_) => RecordStatus::Optimized,
            Self::Reject => RecordStatus::Rejected,
        }
    }

    /// Verb used in error messages.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Optimize(_) => "simulate",
            Self::Reject => "reject",
        }
    }
}

/// Returns true if `from -> to` is a defined transition.
pub fn can_transition(from: RecordStatus, to: RecordStatus) -> bool {
    matches!(
        (from, to),
        (RecordStatus::Pending, RecordStatus::Optimized)
            | (RecordStatus::Pending, RecordStatus::Rejected)
    )
}

/// Check that `record` may leave its current status via `action`.
pub fn ensure_pending(record: &Record, action: &'static str) -> Result<(), LedgerError> {
    if record.is_pending() {
        Ok(())
    } else {
        Err(LedgerError::InvalidState {
            id: record.id.clone(),
            status: record.status,
            action,
        })
    }
}

/// Produce the successor of `record` under `transition`.
///
/// All other fields, including `created_at`, are carried over unchanged.
pub fn apply(record: &Record, transition: Transition) -> Result<Record, LedgerError> {
    if !can_transition(record.status, transition.target()) {
        return Err(LedgerError::InvalidState {
            id: record.id.clone(),
            status: record.status,
            action: transition.action(),
        });
    }

    let mut next = record.clone();
    next.status = transition.target();
    next.simulation_result = match transition {
        Transition::Optimize(result) => Some(result),
        Transition::Reject => None,
    };
    Ok(next)
}

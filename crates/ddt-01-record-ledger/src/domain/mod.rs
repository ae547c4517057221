//! # Domain Layer
//!
//! Pure domain logic for the Record Ledger: entities, value objects, the
//! status state machine and snapshot projections.
//!
//! This module contains NO I/O. Ledger, wallet and provider access goes
//! through the traits in `ports`.

pub mod entities;
pub mod errors;
pub mod lifecycle;
pub mod projections;
pub mod reconcile;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use lifecycle::{can_transition, Transition};
pub use projections::*;
pub use reconcile::*;
pub use value_objects::*;

//! Sync core for Konnect gateway entities
//!
//! Maps local declarations of gateway entities onto the Konnect management
//! API: generic create/update/delete dispatch, adoption of pre-existing
//! remote entities, read-only mirroring, error classification and
//! condition reporting.
//!
//! Callers own reconciliation: they resolve parent references into status,
//! call one entry point per sync, persist the mutated status and schedule
//! the returned [`Outcome`].

pub mod adopt;
pub mod classify;
pub mod conditions;
pub mod dispatch;
pub mod entity;
pub mod error;
pub mod mirror;
pub mod normalize;
pub mod tags;

mod ops;

#[cfg(test)]
mod testing;

pub use adopt::adopt;
pub use classify::{classify, ErrorClass};
pub use dispatch::{create, delete, update, Outcome, SyncContext};
pub use entity::{Adoptable, EntityKind, EntityOps, KonnectEntity, Mirrorable};
pub use error::{AdoptionError, Op, OpError, OpResult};
pub use mirror::mirror;

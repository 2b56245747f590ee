//! Request/response state tracking for API-backed views.
//!
//! [`StateCell`] holds one current value and pushes every write to its
//! observers synchronously. [`EntityStore`] groups five trios of cells
//! (busy, last error, result) for the CRUD-shaped operations of one entity
//! type and drives them from caller-supplied producers.

pub mod cell;
pub mod join;
pub mod tracker;

pub use cell::{CellChanges, StateCell, Subscription};
pub use join::join_parallel;
pub use tracker::{EntityStore, OperationKind, OperationState};

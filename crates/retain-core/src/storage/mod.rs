//! Storage Module
//!
//! SQLite-based storage layer with:
//! - Card repository (written by the content pipeline)
//! - Progress store keyed by (learner, card) with optimistic versioning
//! - Append-only review log doubling as idempotency ledger

mod migrations;
mod sqlite;

pub use migrations::MIGRATIONS;
pub use sqlite::{LearnerStats, Result, ReviewLogEntry, Store, StoreError};

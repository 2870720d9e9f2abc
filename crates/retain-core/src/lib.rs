//! # Retain Core
//!
//! Spaced-repetition review engine for learning platforms:
//!
//! - **Scheduling Engine**: pure multiplicative stability/difficulty update
//!   per graded review, with clamped, total arithmetic - no input can corrupt
//!   a schedule
//! - **Due Queue**: deterministic most-overdue-first ordering with bounded
//!   new-card interleaving
//! - **Progress Store**: SQLite rows keyed by (learner, card) with optimistic
//!   versioning, so concurrent grades are effectively-once
//! - **Review Log**: append-only audit trail doubling as an idempotency
//!   ledger for retried grade submissions
//!
//! Cards themselves are produced elsewhere (hand-authored or AI-generated);
//! this crate only schedules them.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use retain_core::{CardInput, GradeRequest, LearnerId, ReviewSession, Store};
//!
//! // Open the store (uses the default platform-specific location)
//! let session = ReviewSession::new(Store::new(None)?);
//!
//! // What should learner 1 study right now?
//! let queue = session.get_due(LearnerId(1), chrono::Utc::now(), None, Some(20))?;
//!
//! // Record a review
//! let receipt = session.grade(GradeRequest {
//!     learner_id: LearnerId(1),
//!     card_id: queue.entries()[0].card.id,
//!     grade: 3,
//!     client_timestamp: None,
//!     review_id: None,
//! })?;
//! println!("next due: {:?}", receipt.next_due_at);
//! ```
//!
//! ## Feature Flags
//!
//! - `bundled-sqlite` (default): compile SQLite from source via rusqlite

#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod card;
pub mod progress;
pub mod queue;
pub mod scheduler;
pub mod session;
pub mod storage;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Entities
pub use card::{Card, CardId, CardInput, CardSource, LearnerId};
pub use progress::{Progress, ProgressStatus, ProgressSummary};

// Scheduling engine
pub use scheduler::{Grade, Scheduler, SchedulerConfig, MAX_DIFFICULTY, MIN_DIFFICULTY};

// Due queue
pub use queue::{DueEntry, DueQueue};

// Storage layer
pub use storage::{LearnerStats, Result, ReviewLogEntry, Store, StoreError};

// Session façade
pub use session::{GradeReceipt, GradeRequest, ReviewSession};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        Card, CardId, CardInput, DueEntry, DueQueue, Grade, GradeReceipt, GradeRequest,
        LearnerId, Progress, ProgressStatus, Result, ReviewSession, Scheduler, SchedulerConfig,
        Store, StoreError,
    };
}

//! Session Façade - the boundary the serving layer calls
//!
//! Two operations: `get_due` (read-only due queue) and `grade` (transactional
//! review update). The façade validates raw wire input and resolves the
//! effective review time; it never relabels or swallows storage errors, and
//! there is no degraded scoring path - a due date is either correctly
//! computed or the call fails outright.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::card::{CardId, LearnerId};
use crate::progress::{Progress, ProgressStatus};
use crate::queue::DueQueue;
use crate::scheduler::Grade;
use crate::storage::{LearnerStats, Result, Store, StoreError};

// ============================================================================
// WIRE TYPES
// ============================================================================

/// Deserialized body of a grade submission.
///
/// Uses `deny_unknown_fields` to prevent field injection attacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GradeRequest {
    pub learner_id: LearnerId,
    pub card_id: CardId,
    /// Raw grade value; must be 1 (again), 2 (hard), 3 (good), or 4 (easy)
    pub grade: i32,
    /// Client-reported review time, honored only within the configured
    /// clock-skew tolerance; server time is authoritative otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_timestamp: Option<DateTime<Utc>>,
    /// Caller idempotency key; resubmitting the same key never double-applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_id: Option<Uuid>,
}

/// Outcome of a committed grade call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeReceipt {
    pub card_id: CardId,
    pub stability: f64,
    pub difficulty: f64,
    pub status: ProgressStatus,
    pub next_due_at: Option<DateTime<Utc>>,
    pub repetitions: u32,
    pub lapses: u32,
}

impl From<&Progress> for GradeReceipt {
    fn from(progress: &Progress) -> Self {
        Self {
            card_id: progress.card_id,
            stability: progress.stability,
            difficulty: progress.difficulty,
            status: progress.status,
            next_due_at: progress.next_due_at,
            repetitions: progress.repetitions,
            lapses: progress.lapses,
        }
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// Boundary adapter over the store: read-only due queries plus transactional
/// grading.
///
/// `get_due` calls run fully in parallel with each other and with `grade`
/// calls; the store's atomic upserts guarantee a reader never observes a
/// partially written record.
pub struct ReviewSession {
    store: Store,
}

impl ReviewSession {
    /// Wrap a store
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Direct access to the underlying store
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Ordered due queue for a learner at `now`.
    ///
    /// No side effects. Unknown learners get a queue of nothing but new
    /// cards; identity validity is the caller's concern.
    pub fn get_due(
        &self,
        learner_id: LearnerId,
        now: DateTime<Utc>,
        scope: Option<&str>,
        limit: Option<usize>,
    ) -> Result<DueQueue> {
        let (reviews, fresh) = self.store.due_rows(learner_id, now, scope)?;
        Ok(DueQueue::new(
            reviews,
            fresh,
            self.store.scheduler().config().new_per_reviews,
            limit,
        ))
    }

    /// Grade one review, all-or-nothing.
    ///
    /// Validates the raw grade before any I/O, resolves the effective review
    /// time, and delegates to the store's transactional read-modify-write. A
    /// failed call leaves repetitions, lapses, and the due date untouched.
    pub fn grade(&self, request: GradeRequest) -> Result<GradeReceipt> {
        let grade =
            Grade::from_i32(request.grade).ok_or(StoreError::InvalidGrade(request.grade))?;
        let now = self.effective_now(request.client_timestamp, Utc::now());

        let progress = self.store.apply_review(
            request.learner_id,
            request.card_id,
            grade,
            now,
            request.review_id,
        )?;
        Ok(GradeReceipt::from(&progress))
    }

    /// Schedule counts for a learner
    pub fn stats(&self, learner_id: LearnerId, now: DateTime<Utc>) -> Result<LearnerStats> {
        self.store.learner_stats(learner_id, now)
    }

    /// Server time is authoritative unless a skew tolerance is configured
    /// and the client timestamp falls within it.
    fn effective_now(
        &self,
        client: Option<DateTime<Utc>>,
        server_now: DateTime<Utc>,
    ) -> DateTime<Utc> {
        let tolerance = self.store.scheduler().config().clock_skew_tolerance_secs;
        match (client, tolerance) {
            (Some(ts), Some(tolerance))
                if (ts - server_now).num_seconds().abs() <= tolerance =>
            {
                ts
            }
            _ => server_now,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

//! Progress - per-learner, per-card memory state
//!
//! One record per (learner, card) pair, created lazily on the first graded
//! review and mutated only by the scheduling engine. An absent record means
//! the card is new and immediately due.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::card::{CardId, LearnerId};

// ============================================================================
// STATUS
// ============================================================================

/// Lifecycle status of a (learner, card) pair.
///
/// `New` is only the implicit state of an absent record; a stored row is
/// always `Learning`, `Reviewing`, or `Mastered`. A lapse (grade Again)
/// forces the status back to `Learning` from anywhere; otherwise status
/// only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    /// Never reviewed (absent record)
    #[default]
    New,
    /// Recently lapsed or still being acquired
    Learning,
    /// In the regular review cycle
    Reviewing,
    /// Stability has crossed the mastery threshold
    Mastered,
}

impl ProgressStatus {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStatus::New => "new",
            ProgressStatus::Learning => "learning",
            ProgressStatus::Reviewing => "reviewing",
            ProgressStatus::Mastered => "mastered",
        }
    }

    /// Parse from string name
    pub fn parse_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "learning" => ProgressStatus::Learning,
            "reviewing" => ProgressStatus::Reviewing,
            "mastered" => ProgressStatus::Mastered,
            _ => ProgressStatus::New,
        }
    }
}

impl std::fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// PROGRESS
// ============================================================================

/// Memory-model state driving the schedule for one (learner, card) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// The learner half of the key
    pub learner_id: LearnerId,
    /// The card half of the key
    pub card_id: CardId,
    /// Estimated retention in days; always > 0
    pub stability: f64,
    /// Intrinsic hardness estimate; always within [1.0, 10.0]
    pub difficulty: f64,
    /// When the pair was last graded; None until the first review
    pub last_review_at: Option<DateTime<Utc>>,
    /// When the card resurfaces: last_review_at + ceil(stability) days
    pub next_due_at: Option<DateTime<Utc>>,
    /// Successful update count; advances by exactly 1 per committed review
    pub repetitions: u32,
    /// Reviews graded Again
    pub lapses: u32,
    /// Lifecycle status
    pub status: ProgressStatus,
    /// Optimistic-concurrency counter, bumped on every committed review
    pub version: i64,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When the record was last written
    pub updated_at: DateTime<Utc>,
}

impl Progress {
    /// Check whether this record is due at the given instant.
    ///
    /// A record without a due date has never completed scheduling and is
    /// treated as immediately due.
    pub fn is_due_at(&self, now: DateTime<Utc>) -> bool {
        self.next_due_at.map(|t| t <= now).unwrap_or(true)
    }

    /// Compact view for the serving layer
    pub fn summary(&self) -> ProgressSummary {
        ProgressSummary {
            stability: self.stability,
            difficulty: self.difficulty,
            status: self.status,
            repetitions: self.repetitions,
            lapses: self.lapses,
            next_due_at: self.next_due_at,
        }
    }
}

// ============================================================================
// SUMMARY
// ============================================================================

/// Scheduling state exposed alongside a due card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub stability: f64,
    pub difficulty: f64,
    pub status: ProgressStatus,
    pub repetitions: u32,
    pub lapses: u32,
    pub next_due_at: Option<DateTime<Utc>>,
}

// ============================================================================
// TESTS
// ============================================================================

//! The pure scheduling update

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::SchedulerConfig;
use crate::card::{CardId, LearnerId};
use crate::progress::{Progress, ProgressStatus};

/// Minimum difficulty (easiest)
pub const MIN_DIFFICULTY: f64 = 1.0;

/// Maximum difficulty (hardest)
pub const MAX_DIFFICULTY: f64 = 10.0;

// ============================================================================
// GRADE
// ============================================================================

/// Self-reported recall quality for one review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    /// Forgot the card entirely (lapse)
    Again = 1,
    /// Recalled with significant effort
    Hard = 2,
    /// Recalled correctly
    Good = 3,
    /// Recalled instantly
    Easy = 4,
}

impl Grade {
    /// Parse the canonical 1-4 wire value
    pub fn from_i32(value: i32) -> Option<Grade> {
        match value {
            1 => Some(Grade::Again),
            2 => Some(Grade::Hard),
            3 => Some(Grade::Good),
            4 => Some(Grade::Easy),
            _ => None,
        }
    }

    /// The canonical 1-4 wire value
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Convert to string representation
    pub fn as_str(self) -> &'static str {
        match self {
            Grade::Again => "again",
            Grade::Hard => "hard",
            Grade::Good => "good",
            Grade::Easy => "easy",
        }
    }

    /// A review graded Again means the material was forgotten
    pub fn is_lapse(self) -> bool {
        matches!(self, Grade::Again)
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// SCHEDULER
// ============================================================================

/// The scheduling engine: pure, deterministic, total.
///
/// Every arithmetic path is clamped (stability floored, difficulty bounded),
/// so no input can produce a negative stability, an out-of-range difficulty,
/// or a due date before the review itself. Counters advance on every call,
/// which is why replaying the same grading event against live state needs the
/// storage layer's deduplication.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    /// Create a scheduler with the given parameters
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// The active parameters
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Days until the next review implied by a stability value.
    ///
    /// Ceiling, not rounding: a card must never resurface a full day early.
    pub fn interval_days(&self, stability: f64) -> i64 {
        stability.ceil() as i64
    }

    /// Compute the successor Progress for one graded review.
    ///
    /// `prev` is None on the learner's first review of the card; the record
    /// is then seeded with stability 1.0 and the card's `base_difficulty`
    /// (`seed_difficulty`, falling back to the configured default).
    ///
    /// The returned record satisfies every schedule invariant: stability is
    /// positive, difficulty bounded, `next_due_at` equals
    /// `now + ceil(stability)` days, repetitions advance by exactly 1, and
    /// lapses advance iff the grade was Again. `version` is carried over
    /// unchanged; the store bumps it when the row commits.
    pub fn review(
        &self,
        learner_id: LearnerId,
        card_id: CardId,
        prev: Option<&Progress>,
        seed_difficulty: Option<f64>,
        grade: Grade,
        now: DateTime<Utc>,
    ) -> Progress {
        let cfg = &self.config;

        let (old_stability, old_difficulty, repetitions, lapses, version, created_at) = match prev
        {
            Some(p) => (
                p.stability,
                p.difficulty,
                p.repetitions,
                p.lapses,
                p.version,
                p.created_at,
            ),
            None => (
                1.0,
                seed_difficulty
                    .unwrap_or(cfg.default_difficulty)
                    .clamp(MIN_DIFFICULTY, MAX_DIFFICULTY),
                0,
                0,
                0,
                now,
            ),
        };

        // The floor keeps stability strictly positive no matter how many
        // consecutive lapses occur.
        let stability = (old_stability * cfg.factor(grade)).max(cfg.stability_floor);

        let difficulty = match grade {
            Grade::Again | Grade::Hard => {
                (old_difficulty + cfg.difficulty_step_up).min(MAX_DIFFICULTY)
            }
            Grade::Good | Grade::Easy => {
                (old_difficulty - cfg.difficulty_step_down).max(MIN_DIFFICULTY)
            }
        };

        let repetitions = repetitions + 1;
        let lapses = if grade.is_lapse() { lapses + 1 } else { lapses };

        // A lapse always drops back to Learning; otherwise status only moves
        // forward. Non-lapse factors are all > 1, so a mastered card can only
        // leave Mastered through Again.
        let status = if grade.is_lapse() {
            ProgressStatus::Learning
        } else if stability > cfg.mastery_threshold {
            ProgressStatus::Mastered
        } else {
            ProgressStatus::Reviewing
        };

        Progress {
            learner_id,
            card_id,
            stability,
            difficulty,
            last_review_at: Some(now),
            next_due_at: Some(now + Duration::days(self.interval_days(stability))),
            repetitions,
            lapses,
            status,
            version,
            created_at,
            updated_at: now,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

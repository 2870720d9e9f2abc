//! Tunable scheduling parameters

use serde::{Deserialize, Serialize};

use super::engine::Grade;

/// Scheduling parameters.
///
/// Defaults follow common spaced-repetition practice. The stability floor and
/// mastery threshold in particular are plausible conventions rather than
/// derived constants; deployments tune them here instead of patching the
/// engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Stability multiplier for Again (lapse)
    pub again_factor: f64,
    /// Stability multiplier for Hard
    pub hard_factor: f64,
    /// Stability multiplier for Good
    pub good_factor: f64,
    /// Stability multiplier for Easy
    pub easy_factor: f64,
    /// Lower bound on stability after any update, in days
    pub stability_floor: f64,
    /// Stability above which a card counts as mastered, in days
    pub mastery_threshold: f64,
    /// Difficulty increase applied on Again/Hard
    pub difficulty_step_up: f64,
    /// Difficulty decrease applied on Good/Easy
    pub difficulty_step_down: f64,
    /// Seed difficulty for a first review when the card carries none
    pub default_difficulty: f64,
    /// At most one new card per this many due reviews in a queue
    pub new_per_reviews: usize,
    /// Accept client-reported review timestamps within this many seconds of
    /// server time; None means server time is always authoritative
    pub clock_skew_tolerance_secs: Option<i64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            again_factor: 0.25,
            hard_factor: 1.2,
            good_factor: 1.5,
            easy_factor: 2.2,
            stability_floor: 0.25,
            mastery_threshold: 21.0,
            difficulty_step_up: 0.5,
            difficulty_step_down: 0.2,
            default_difficulty: 5.0,
            new_per_reviews: 4,
            clock_skew_tolerance_secs: None,
        }
    }
}

impl SchedulerConfig {
    /// Stability multiplier for a grade
    pub fn factor(&self, grade: Grade) -> f64 {
        match grade {
            Grade::Again => self.again_factor,
            Grade::Hard => self.hard_factor,
            Grade::Good => self.good_factor,
            Grade::Easy => self.easy_factor,
        }
    }
}

//! Scheduling Engine - multiplicative stability model
//!
//! A deliberately small cousin of FSRS: each graded review scales the memory
//! stability by a per-grade factor and nudges difficulty toward the observed
//! recall quality. The next due date is `now + ceil(stability)` days, so the
//! schedule is fully determined by (stability, last_review_at).
//!
//! The engine is a pure function over (Progress, Grade, now) and performs no
//! I/O; persistence, atomicity, and per-key serialization live in `storage`.
//!
//! ## Core update:
//! - stability' = max(floor, stability * factor(grade))
//! - difficulty' = clamp(difficulty ± step, 1.0, 10.0)
//! - next_due = now + ceil(stability') days

mod config;
mod engine;

pub use config::SchedulerConfig;
pub use engine::{Grade, Scheduler, MAX_DIFFICULTY, MIN_DIFFICULTY};

//! SQLite Storage Implementation
//!
//! Card repository and progress store over rusqlite. Grading is a single
//! IMMEDIATE transaction (read progress, compute update, upsert, append to
//! the review log) so a failed call never leaves a partial write behind.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

use crate::card::{Card, CardId, CardInput, CardSource, LearnerId};
use crate::progress::{Progress, ProgressStatus};
use crate::scheduler::{Grade, Scheduler, SchedulerConfig, MAX_DIFFICULTY, MIN_DIFFICULTY};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backing persistence failed; surfaced as-is, never retried internally
    #[error("Store unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),
    /// Grade outside the four canonical values; not retried
    #[error("Invalid grade {0}: expected 1 (again), 2 (hard), 3 (good), or 4 (easy)")]
    InvalidGrade(i32),
    /// Referenced card does not exist; not retried
    #[error("Unknown card: {0}")]
    UnknownCard(CardId),
    /// Another writer got to the same (learner, card) row first; the caller
    /// retries the single grade call
    #[error("Concurrent grade conflict for learner {learner}, card {card}")]
    GradeConflict {
        /// The learner half of the contended key
        learner: LearnerId,
        /// The card half of the contended key
        card: CardId,
    },
    /// Invalid timestamp
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StoreError>;

// ============================================================================
// RECORD TYPES
// ============================================================================

/// One committed review from the append-only log
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLogEntry {
    /// Caller-supplied idempotency key, if any
    pub review_id: Option<Uuid>,
    pub learner_id: LearnerId,
    pub card_id: CardId,
    pub grade: Grade,
    pub stability: f64,
    pub difficulty: f64,
    pub status: ProgressStatus,
    pub repetitions: u32,
    pub lapses: u32,
    pub next_due_at: DateTime<Utc>,
    pub reviewed_at: DateTime<Utc>,
}

/// Per-learner schedule counts
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerStats {
    /// Cards in the repository (scope-independent)
    pub total_cards: i64,
    /// Cards the learner has reviewed at least once
    pub seen_cards: i64,
    /// Reviews currently due
    pub due_reviews: i64,
    /// Cards never reviewed
    pub new_cards: i64,
    /// Cards whose stability crossed the mastery threshold
    pub mastered: i64,
    /// Committed reviews across all cards
    pub total_reviews: i64,
    /// Committed lapses across all cards
    pub total_lapses: i64,
}

// ============================================================================
// STORE
// ============================================================================

/// Durable store for cards and per-learner progress.
///
/// Uses separate reader/writer connections for interior mutability. All
/// methods take `&self` (not `&mut self`), making Store `Send + Sync` so the
/// serving layer can share an `Arc<Store>` instead of `Arc<Mutex<Store>>`.
/// The writer mutex serializes all mutations; the version guard in
/// [`Store::apply_review`] additionally protects against a second process on
/// the same database file.
pub struct Store {
    writer: Mutex<Connection>,
    reader: Mutex<Connection>,
    scheduler: Scheduler,
}

impl Store {
    /// Apply PRAGMAs to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        // Configure SQLite for performance
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -64000;
             PRAGMA temp_store = MEMORY;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;

        Ok(())
    }

    /// Create a store with default scheduling parameters
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        Self::with_config(db_path, SchedulerConfig::default())
    }

    /// Create a store with explicit scheduling parameters
    pub fn with_config(db_path: Option<PathBuf>, config: SchedulerConfig) -> Result<Self> {
        let path = match db_path {
            Some(p) => p,
            None => {
                let proj_dirs = ProjectDirs::from("dev", "retain", "core").ok_or_else(|| {
                    StoreError::Init("Could not determine project directories".to_string())
                })?;

                let data_dir = proj_dirs.data_dir();
                std::fs::create_dir_all(data_dir)
                    .map_err(|e| StoreError::Init(format!("Could not create data dir: {}", e)))?;
                // Restrict directory permissions to owner-only on Unix
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    let perms = std::fs::Permissions::from_mode(0o700);
                    let _ = std::fs::set_permissions(data_dir, perms);
                }
                data_dir.join("retain.db")
            }
        };

        // Open writer connection
        let writer_conn = Connection::open(&path)?;

        // Restrict database file permissions to owner-only on Unix
        #[cfg(unix)]
        if path.exists() {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&path, perms);
        }

        Self::configure_connection(&writer_conn)?;

        // Apply migrations on writer only
        super::migrations::apply_migrations(&writer_conn)?;

        // Open reader connection to same path
        let reader_conn = Connection::open(&path)?;
        Self::configure_connection(&reader_conn)?;

        Ok(Self {
            writer: Mutex::new(writer_conn),
            reader: Mutex::new(reader_conn),
            scheduler: Scheduler::new(config),
        })
    }

    /// The scheduling engine this store persists for
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    // ========================================================================
    // CARDS
    // ========================================================================

    /// Create a card - the consumed content-pipeline interface.
    ///
    /// The engine itself never calls this; it exists for the external
    /// producer and for tests.
    pub fn create_card(&self, input: CardInput) -> Result<Card> {
        let now = Utc::now();
        let base_difficulty = input.base_difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);

        let id = {
            let writer = self
                .writer
                .lock()
                .map_err(|_| StoreError::Init("Writer lock poisoned".into()))?;
            writer.execute(
                "INSERT INTO cards (prompt, answer, explanation, scope, base_difficulty, source, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    input.prompt,
                    input.answer,
                    input.explanation,
                    input.scope,
                    base_difficulty,
                    input.source.as_str(),
                    now.to_rfc3339(),
                ],
            )?;
            CardId(writer.last_insert_rowid())
        };

        self.get_card(id)?
            .ok_or(StoreError::UnknownCard(id))
    }

    /// Get a card by ID
    pub fn get_card(&self, id: CardId) -> Result<Option<Card>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StoreError::Init("Reader lock poisoned".into()))?;
        let mut stmt = reader.prepare("SELECT * FROM cards WHERE id = ?1")?;

        let card = stmt
            .query_row(params![id.0], |row| Self::row_to_card(row, "created_at"))
            .optional()?;
        Ok(card)
    }

    // ========================================================================
    // PROGRESS
    // ========================================================================

    /// Point lookup of one (learner, card) progress record
    pub fn get_progress(&self, learner_id: LearnerId, card_id: CardId) -> Result<Option<Progress>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StoreError::Init("Reader lock poisoned".into()))?;
        let mut stmt =
            reader.prepare("SELECT * FROM progress WHERE learner_id = ?1 AND card_id = ?2")?;

        let progress = stmt
            .query_row(params![learner_id.0, card_id.0], Self::row_to_progress)
            .optional()?;
        Ok(progress)
    }

    // ========================================================================
    // DUE QUERY
    // ========================================================================

    /// Snapshot of a learner's schedule at `now`: due reviews (most overdue
    /// first, card id breaking ties) and never-reviewed cards (creation
    /// order).
    ///
    /// An unknown learner simply owns no progress rows, so every card comes
    /// back in the second vector; identity validity is the caller's concern.
    #[allow(clippy::type_complexity)]
    pub fn due_rows(
        &self,
        learner_id: LearnerId,
        now: DateTime<Utc>,
        scope: Option<&str>,
    ) -> Result<(Vec<(Card, Progress)>, Vec<(Card, Option<Progress>)>)> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StoreError::Init("Reader lock poisoned".into()))?;

        let mut stmt = reader.prepare(
            "SELECT c.id, c.prompt, c.answer, c.explanation, c.scope, c.base_difficulty,
                    c.source, c.created_at AS card_created_at,
                    p.learner_id, p.card_id, p.stability, p.difficulty, p.last_review_at,
                    p.next_due_at, p.repetitions, p.lapses, p.status, p.version,
                    p.created_at, p.updated_at
             FROM cards c
             JOIN progress p ON p.card_id = c.id
             WHERE p.learner_id = ?1
               AND p.next_due_at IS NOT NULL
               AND p.next_due_at <= ?2
               AND (?3 IS NULL OR c.scope = ?3)
             ORDER BY p.next_due_at ASC, c.id ASC",
        )?;

        let rows = stmt.query_map(params![learner_id.0, now.to_rfc3339(), scope], |row| {
            let card = Self::row_to_card(row, "card_created_at")?;
            let progress = Self::row_to_progress(row)?;
            Ok((card, progress))
        })?;

        let mut reviews = Vec::new();
        for row in rows {
            reviews.push(row?);
        }

        let mut stmt = reader.prepare(
            "SELECT c.id, c.prompt, c.answer, c.explanation, c.scope, c.base_difficulty,
                    c.source, c.created_at AS card_created_at,
                    p.learner_id, p.card_id, p.stability, p.difficulty, p.last_review_at,
                    p.next_due_at, p.repetitions, p.lapses, p.status, p.version,
                    p.created_at, p.updated_at
             FROM cards c
             LEFT JOIN progress p ON p.card_id = c.id AND p.learner_id = ?1
             WHERE (p.card_id IS NULL OR p.next_due_at IS NULL)
               AND (?2 IS NULL OR c.scope = ?2)
             ORDER BY c.created_at ASC, c.id ASC",
        )?;

        let rows = stmt.query_map(params![learner_id.0, scope], |row| {
            let card = Self::row_to_card(row, "card_created_at")?;
            let seen: Option<i64> = row.get("learner_id")?;
            let progress = match seen {
                Some(_) => Some(Self::row_to_progress(row)?),
                None => None,
            };
            Ok((card, progress))
        })?;

        let mut fresh = Vec::new();
        for row in rows {
            fresh.push(row?);
        }

        Ok((reviews, fresh))
    }

    // ========================================================================
    // REVIEWS
    // ========================================================================

    /// Apply one graded review atomically.
    ///
    /// Read progress, run the scheduling engine, upsert the row, and append
    /// to the review log - all inside one IMMEDIATE transaction. Either the
    /// whole update commits or nothing does.
    ///
    /// A `review_id` that was already committed is answered from the log
    /// without advancing any counter, which makes retries safe.
    pub fn apply_review(
        &self,
        learner_id: LearnerId,
        card_id: CardId,
        grade: Grade,
        now: DateTime<Utc>,
        review_id: Option<Uuid>,
    ) -> Result<Progress> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| StoreError::Init("Writer lock poisoned".into()))?;
        let tx = writer.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(review_id) = review_id {
            if let Some(replayed) = Self::logged_review(&tx, learner_id, card_id, review_id)? {
                tracing::debug!(
                    learner = learner_id.0,
                    card = card_id.0,
                    %review_id,
                    "duplicate review answered from log"
                );
                return Ok(replayed);
            }
        }

        let base_difficulty: Option<f64> = tx
            .query_row(
                "SELECT base_difficulty FROM cards WHERE id = ?1",
                params![card_id.0],
                |row| row.get(0),
            )
            .optional()?;
        let Some(base_difficulty) = base_difficulty else {
            return Err(StoreError::UnknownCard(card_id));
        };

        let prev = tx
            .query_row(
                "SELECT * FROM progress WHERE learner_id = ?1 AND card_id = ?2",
                params![learner_id.0, card_id.0],
                Self::row_to_progress,
            )
            .optional()?;

        let next = self.scheduler.review(
            learner_id,
            card_id,
            prev.as_ref(),
            Some(base_difficulty),
            grade,
            now,
        );

        let committed_version = match &prev {
            Some(p) => {
                // The version guard catches a second writer on the same
                // database file; in-process writes are already serialized by
                // the writer mutex. Zero rows changed means our read is
                // stale - roll back and let the caller retry.
                let changed = tx.execute(
                    "UPDATE progress SET
                        stability = ?1,
                        difficulty = ?2,
                        last_review_at = ?3,
                        next_due_at = ?4,
                        repetitions = ?5,
                        lapses = ?6,
                        status = ?7,
                        version = version + 1,
                        updated_at = ?8
                     WHERE learner_id = ?9 AND card_id = ?10 AND version = ?11",
                    params![
                        next.stability,
                        next.difficulty,
                        next.last_review_at.map(|t| t.to_rfc3339()),
                        next.next_due_at.map(|t| t.to_rfc3339()),
                        next.repetitions,
                        next.lapses,
                        next.status.as_str(),
                        next.updated_at.to_rfc3339(),
                        learner_id.0,
                        card_id.0,
                        p.version,
                    ],
                )?;
                if changed == 0 {
                    return Err(StoreError::GradeConflict {
                        learner: learner_id,
                        card: card_id,
                    });
                }
                p.version + 1
            }
            None => {
                let inserted = tx.execute(
                    "INSERT INTO progress (
                        learner_id, card_id, stability, difficulty, last_review_at,
                        next_due_at, repetitions, lapses, status, version,
                        created_at, updated_at
                     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 1, ?10, ?11)
                     ON CONFLICT(learner_id, card_id) DO NOTHING",
                    params![
                        learner_id.0,
                        card_id.0,
                        next.stability,
                        next.difficulty,
                        next.last_review_at.map(|t| t.to_rfc3339()),
                        next.next_due_at.map(|t| t.to_rfc3339()),
                        next.repetitions,
                        next.lapses,
                        next.status.as_str(),
                        next.created_at.to_rfc3339(),
                        next.updated_at.to_rfc3339(),
                    ],
                )?;
                if inserted == 0 {
                    return Err(StoreError::GradeConflict {
                        learner: learner_id,
                        card: card_id,
                    });
                }
                1
            }
        };

        tx.execute(
            "INSERT INTO review_log (
                review_id, learner_id, card_id, grade, stability, difficulty,
                status, repetitions, lapses, next_due_at, reviewed_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                review_id.map(|r| r.to_string()),
                learner_id.0,
                card_id.0,
                grade.as_i32(),
                next.stability,
                next.difficulty,
                next.status.as_str(),
                next.repetitions,
                next.lapses,
                next.next_due_at.map(|t| t.to_rfc3339()),
                now.to_rfc3339(),
            ],
        )?;

        tx.commit()?;

        tracing::debug!(
            learner = learner_id.0,
            card = card_id.0,
            grade = grade.as_i32(),
            stability = next.stability,
            status = next.status.as_str(),
            "review committed"
        );

        Ok(Progress {
            version: committed_version,
            ..next
        })
    }

    /// Committed reviews for one (learner, card) pair, newest first
    pub fn review_history(
        &self,
        learner_id: LearnerId,
        card_id: CardId,
        limit: usize,
    ) -> Result<Vec<ReviewLogEntry>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StoreError::Init("Reader lock poisoned".into()))?;
        let mut stmt = reader.prepare(
            "SELECT review_id, learner_id, card_id, grade, stability, difficulty,
                    status, repetitions, lapses, next_due_at, reviewed_at
             FROM review_log
             WHERE learner_id = ?1 AND card_id = ?2
             ORDER BY id DESC
             LIMIT ?3",
        )?;

        let rows = stmt.query_map(
            params![learner_id.0, card_id.0, limit as i64],
            Self::row_to_log_entry,
        )?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    // ========================================================================
    // STATS
    // ========================================================================

    /// Schedule counts for one learner at `now`
    pub fn learner_stats(&self, learner_id: LearnerId, now: DateTime<Utc>) -> Result<LearnerStats> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StoreError::Init("Reader lock poisoned".into()))?;

        let total_cards: i64 =
            reader.query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;
        let seen_cards: i64 = reader.query_row(
            "SELECT COUNT(*) FROM progress WHERE learner_id = ?1",
            params![learner_id.0],
            |row| row.get(0),
        )?;
        let due_reviews: i64 = reader.query_row(
            "SELECT COUNT(*) FROM progress
             WHERE learner_id = ?1 AND next_due_at IS NOT NULL AND next_due_at <= ?2",
            params![learner_id.0, now.to_rfc3339()],
            |row| row.get(0),
        )?;
        let mastered: i64 = reader.query_row(
            "SELECT COUNT(*) FROM progress WHERE learner_id = ?1 AND status = 'mastered'",
            params![learner_id.0],
            |row| row.get(0),
        )?;
        let (total_reviews, total_lapses): (i64, i64) = reader.query_row(
            "SELECT COALESCE(SUM(repetitions), 0), COALESCE(SUM(lapses), 0)
             FROM progress WHERE learner_id = ?1",
            params![learner_id.0],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(LearnerStats {
            total_cards,
            seen_cards,
            due_reviews,
            new_cards: total_cards - seen_cards,
            mastered,
            total_reviews,
            total_lapses,
        })
    }

    // ========================================================================
    // ROW MAPPING
    // ========================================================================

    /// Look up an already-committed review by idempotency key.
    ///
    /// The returned record reflects the row as that review left it, with the
    /// live row's version and creation time.
    fn logged_review(
        tx: &Transaction<'_>,
        learner_id: LearnerId,
        card_id: CardId,
        review_id: Uuid,
    ) -> Result<Option<Progress>> {
        let logged = tx
            .query_row(
                "SELECT stability, difficulty, status, repetitions, lapses,
                        next_due_at, reviewed_at
                 FROM review_log
                 WHERE review_id = ?1 AND learner_id = ?2 AND card_id = ?3",
                params![review_id.to_string(), learner_id.0, card_id.0],
                |row| {
                    let status: String = row.get("status")?;
                    let next_due_at: String = row.get("next_due_at")?;
                    let reviewed_at: String = row.get("reviewed_at")?;
                    Ok((
                        row.get::<_, f64>("stability")?,
                        row.get::<_, f64>("difficulty")?,
                        ProgressStatus::parse_name(&status),
                        row.get::<_, u32>("repetitions")?,
                        row.get::<_, u32>("lapses")?,
                        Self::parse_timestamp(&next_due_at, "next_due_at")?,
                        Self::parse_timestamp(&reviewed_at, "reviewed_at")?,
                    ))
                },
            )
            .optional()?;

        let Some((stability, difficulty, status, repetitions, lapses, next_due_at, reviewed_at)) =
            logged
        else {
            return Ok(None);
        };

        let (version, created_at): (i64, DateTime<Utc>) = tx
            .query_row(
                "SELECT version, created_at FROM progress WHERE learner_id = ?1 AND card_id = ?2",
                params![learner_id.0, card_id.0],
                |row| {
                    let created_at: String = row.get("created_at")?;
                    Ok((
                        row.get::<_, i64>("version")?,
                        Self::parse_timestamp(&created_at, "created_at")?,
                    ))
                },
            )
            .optional()?
            .unwrap_or((1, reviewed_at));

        Ok(Some(Progress {
            learner_id,
            card_id,
            stability,
            difficulty,
            last_review_at: Some(reviewed_at),
            next_due_at: Some(next_due_at),
            repetitions,
            lapses,
            status,
            version,
            created_at,
            updated_at: reviewed_at,
        }))
    }

    /// Parse RFC3339 timestamp
    fn parse_timestamp(value: &str, field_name: &str) -> rusqlite::Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("Invalid {} timestamp '{}': {}", field_name, value, e),
                    )),
                )
            })
    }

    /// Convert a row to Card; `created_at_column` names the (possibly
    /// aliased) creation-time column so joined queries can disambiguate
    fn row_to_card(row: &rusqlite::Row, created_at_column: &str) -> rusqlite::Result<Card> {
        let source: String = row.get("source")?;
        let created_at: String = row.get(created_at_column)?;

        Ok(Card {
            id: CardId(row.get("id")?),
            prompt: row.get("prompt")?,
            answer: row.get("answer")?,
            explanation: row.get("explanation")?,
            scope: row.get("scope")?,
            base_difficulty: row.get("base_difficulty")?,
            source: CardSource::parse_name(&source),
            created_at: Self::parse_timestamp(&created_at, created_at_column)?,
        })
    }

    /// Convert a row to Progress
    fn row_to_progress(row: &rusqlite::Row) -> rusqlite::Result<Progress> {
        let status: String = row.get("status")?;
        let created_at: String = row.get("created_at")?;
        let updated_at: String = row.get("updated_at")?;
        let last_review_at: Option<String> = row.get("last_review_at")?;
        let next_due_at: Option<String> = row.get("next_due_at")?;

        let last_review_at = match last_review_at {
            Some(s) => Some(Self::parse_timestamp(&s, "last_review_at")?),
            None => None,
        };
        let next_due_at = match next_due_at {
            Some(s) => Some(Self::parse_timestamp(&s, "next_due_at")?),
            None => None,
        };

        Ok(Progress {
            learner_id: LearnerId(row.get("learner_id")?),
            card_id: CardId(row.get("card_id")?),
            stability: row.get("stability")?,
            difficulty: row.get("difficulty")?,
            last_review_at,
            next_due_at,
            repetitions: row.get("repetitions")?,
            lapses: row.get("lapses")?,
            status: ProgressStatus::parse_name(&status),
            version: row.get("version")?,
            created_at: Self::parse_timestamp(&created_at, "created_at")?,
            updated_at: Self::parse_timestamp(&updated_at, "updated_at")?,
        })
    }

    /// Convert a row to ReviewLogEntry
    fn row_to_log_entry(row: &rusqlite::Row) -> rusqlite::Result<ReviewLogEntry> {
        let review_id: Option<String> = row.get("review_id")?;
        let status: String = row.get("status")?;
        let next_due_at: String = row.get("next_due_at")?;
        let reviewed_at: String = row.get("reviewed_at")?;
        let grade: i32 = row.get("grade")?;

        let grade = Grade::from_i32(grade).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Integer,
                Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("Invalid grade value in review log: {}", grade),
                )),
            )
        })?;

        Ok(ReviewLogEntry {
            review_id: review_id.and_then(|s| Uuid::parse_str(&s).ok()),
            learner_id: LearnerId(row.get("learner_id")?),
            card_id: CardId(row.get("card_id")?),
            grade,
            stability: row.get("stability")?,
            difficulty: row.get("difficulty")?,
            status: ProgressStatus::parse_name(&status),
            repetitions: row.get("repetitions")?,
            lapses: row.get("lapses")?,
            next_due_at: Self::parse_timestamp(&next_due_at, "next_due_at")?,
            reviewed_at: Self::parse_timestamp(&reviewed_at, "reviewed_at")?,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

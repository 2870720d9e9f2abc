//! Database Migrations
//!
//! Schema migration definitions for the storage layer.

/// Migration definitions
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "Cards, per-learner progress, and the review log",
    up: MIGRATION_V1_UP,
}];

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Version number
    pub version: u32,
    /// Description
    pub description: &'static str,
    /// SQL to apply
    pub up: &'static str,
}

/// V1: Initial schema
const MIGRATION_V1_UP: &str = r#"
-- Cards are owned by the content pipeline; the engine only reads them
CREATE TABLE IF NOT EXISTS cards (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    prompt TEXT NOT NULL,
    answer TEXT NOT NULL,
    explanation TEXT,
    scope TEXT,
    base_difficulty REAL NOT NULL DEFAULT 5.0,
    source TEXT NOT NULL DEFAULT 'generated',
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_cards_scope ON cards(scope);
CREATE INDEX IF NOT EXISTS idx_cards_created ON cards(created_at);

-- One row per (learner, card), created lazily on the first graded review
-- and written only by the scheduling engine
CREATE TABLE IF NOT EXISTS progress (
    learner_id INTEGER NOT NULL,
    card_id INTEGER NOT NULL REFERENCES cards(id) ON DELETE CASCADE,
    stability REAL NOT NULL,
    difficulty REAL NOT NULL,
    last_review_at TEXT,
    next_due_at TEXT,
    repetitions INTEGER NOT NULL DEFAULT 0,
    lapses INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL DEFAULT 'learning',
    -- Optimistic-concurrency counter; every committed review bumps it
    version INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (learner_id, card_id)
);

-- Due-range scans per learner
CREATE INDEX IF NOT EXISTS idx_progress_due ON progress(learner_id, next_due_at);

-- Append-only audit of committed reviews; review_id is the caller's
-- idempotency key
CREATE TABLE IF NOT EXISTS review_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    review_id TEXT UNIQUE,
    learner_id INTEGER NOT NULL,
    card_id INTEGER NOT NULL,
    grade INTEGER NOT NULL,
    stability REAL NOT NULL,
    difficulty REAL NOT NULL,
    status TEXT NOT NULL,
    repetitions INTEGER NOT NULL,
    lapses INTEGER NOT NULL,
    next_due_at TEXT NOT NULL,
    reviewed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_review_log_pair ON review_log(learner_id, card_id);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Get current schema version from database
pub fn get_current_version(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .or(Ok(0))
}

/// Apply pending migrations
pub fn apply_migrations(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    let current_version = get_current_version(conn)?;
    let mut applied = 0;

    for migration in MIGRATIONS {
        if migration.version > current_version {
            tracing::info!(
                "Applying migration v{}: {}",
                migration.version,
                migration.description
            );

            // Use execute_batch to handle multi-statement SQL
            conn.execute_batch(migration.up)?;
            conn.execute(
                "INSERT OR REPLACE INTO schema_version (version, applied_at)
                 VALUES (?1, datetime('now'))",
                rusqlite::params![migration.version],
            )?;

            applied += 1;
        }
    }

    Ok(applied)
}

//! Card - the learning item being scheduled
//!
//! Cards are produced by the content pipeline (hand-authored or generated
//! from lesson material) and are immutable once created apart from metadata
//! edits. The scheduling engine never writes them; it only reads `scope` and
//! `base_difficulty` when a learner reviews a card for the first time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// IDENTIFIERS
// ============================================================================

/// Typed learner identifier.
///
/// Progress is keyed by the (learner, card) pair; keeping both halves as
/// distinct newtypes rules out swapped-argument and string-concatenation
/// key bugs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct LearnerId(pub i64);

/// Typed card identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct CardId(pub i64);

impl std::fmt::Display for LearnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CARD SOURCE
// ============================================================================

/// Where a card came from
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardSource {
    /// Written by a course author
    Authored,
    /// Produced by the AI content pipeline
    #[default]
    Generated,
}

impl CardSource {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            CardSource::Authored => "authored",
            CardSource::Generated => "generated",
        }
    }

    /// Parse from string name
    pub fn parse_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "authored" => CardSource::Authored,
            _ => CardSource::Generated,
        }
    }
}

impl std::fmt::Display for CardSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CARD
// ============================================================================

/// A flashcard: prompt/answer pair plus the metadata scheduling reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique identifier (SQLite rowid)
    pub id: CardId,
    /// The question shown to the learner
    pub prompt: String,
    /// The expected answer
    pub answer: String,
    /// Optional elaboration shown after answering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// Scope tag restricting due queries (lesson key, syllabus unit, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Intrinsic difficulty seed (1.0 = easy, 10.0 = hard) for the first review
    pub base_difficulty: f64,
    /// Provenance of the card
    pub source: CardSource,
    /// When the card was created; new cards surface in creation order
    pub created_at: DateTime<Utc>,
}

impl Card {
    /// Check whether this card belongs to the given scope tag
    pub fn in_scope(&self, scope: &str) -> bool {
        self.scope.as_deref() == Some(scope)
    }
}

// ============================================================================
// INPUT TYPES
// ============================================================================

/// Input for creating a card - the interface the content pipeline calls.
///
/// Uses `deny_unknown_fields` to prevent field injection from untrusted
/// producers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CardInput {
    /// The question shown to the learner
    pub prompt: String,
    /// The expected answer
    pub answer: String,
    /// Optional elaboration shown after answering
    pub explanation: Option<String>,
    /// Scope tag for due-query filtering
    #[serde(default)]
    pub scope: Option<String>,
    /// Intrinsic difficulty seed, clamped to [1.0, 10.0] on insert
    #[serde(default = "default_base_difficulty")]
    pub base_difficulty: f64,
    /// Provenance of the card
    #[serde(default)]
    pub source: CardSource,
}

fn default_base_difficulty() -> f64 {
    5.0
}

impl Default for CardInput {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            answer: String::new(),
            explanation: None,
            scope: None,
            base_difficulty: default_base_difficulty(),
            source: CardSource::default(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

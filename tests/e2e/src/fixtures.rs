//! Test Data Factory
//!
//! Builds sessions backed by throwaway databases and seeds them with cards
//! in bulk, so journey tests stay focused on behavior.

use retain_core::{Card, CardInput, ReviewSession, SchedulerConfig, Store};
use tempfile::TempDir;

/// A review session over a temp-dir database.
///
/// Keep the `TempDir` alive for as long as the session is used.
pub fn session() -> (ReviewSession, TempDir) {
    session_with_config(SchedulerConfig::default())
}

/// A review session with explicit scheduling parameters
pub fn session_with_config(config: SchedulerConfig) -> (ReviewSession, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let store =
        Store::with_config(Some(dir.path().join("retain-test.db")), config).expect("open store");
    (ReviewSession::new(store), dir)
}

/// Seed `count` cards in one scope; returns them in creation order
pub fn seed_cards(session: &ReviewSession, scope: Option<&str>, count: usize) -> Vec<Card> {
    (0..count)
        .map(|i| {
            session
                .store()
                .create_card(CardInput {
                    prompt: format!("Prompt {i}"),
                    answer: format!("Answer {i}"),
                    scope: scope.map(String::from),
                    ..Default::default()
                })
                .expect("create card")
        })
        .collect()
}

//! Journey: retried grade submissions with idempotency keys
//!
//! A client that times out and resubmits the same `review_id` must get the
//! original outcome back, with no second application anywhere: counters,
//! schedule, and audit log all stay put.

use std::sync::Arc;
use std::thread;

use retain_core::{GradeRequest, LearnerId, ProgressStatus};
use retain_e2e_tests::fixtures;
use uuid::Uuid;

#[test]
fn resubmitted_review_id_is_applied_once() {
    let (session, _dir) = fixtures::session();
    let cards = fixtures::seed_cards(&session, None, 1);
    let card = cards[0].id;
    let review_id = Uuid::new_v4();

    let request = GradeRequest {
        learner_id: LearnerId(1),
        card_id: card,
        grade: 3,
        client_timestamp: None,
        review_id: Some(review_id),
    };

    let first = session.grade(request.clone()).unwrap();
    let replay = session.grade(request).unwrap();

    // Same outcome, not a second review
    assert_eq!(replay, first);
    assert_eq!(replay.repetitions, 1);

    let progress = session
        .store()
        .get_progress(LearnerId(1), card)
        .unwrap()
        .unwrap();
    assert_eq!(progress.repetitions, 1);
    assert_eq!(progress.stability, 1.5);

    let history = session.store().review_history(LearnerId(1), card, 10).unwrap();
    assert_eq!(history.len(), 1);
}

#[test]
fn replay_returns_original_outcome_even_after_later_reviews() {
    let (session, _dir) = fixtures::session();
    let cards = fixtures::seed_cards(&session, None, 1);
    let card = cards[0].id;
    let review_id = Uuid::new_v4();

    let base = GradeRequest {
        learner_id: LearnerId(1),
        card_id: card,
        grade: 3,
        client_timestamp: None,
        review_id: Some(review_id),
    };
    let original = session.grade(base.clone()).unwrap();

    // Fresh reviews with distinct keys advance the schedule
    for _ in 0..3 {
        session
            .grade(GradeRequest {
                review_id: Some(Uuid::new_v4()),
                ..base.clone()
            })
            .unwrap();
    }

    // A very late retry of the first submission still answers from the log
    let replay = session.grade(base).unwrap();
    assert_eq!(replay.stability, original.stability);
    assert_eq!(replay.status, original.status);
    assert_eq!(replay.repetitions, original.repetitions);
    assert_eq!(replay.next_due_at, original.next_due_at);

    let progress = session
        .store()
        .get_progress(LearnerId(1), card)
        .unwrap()
        .unwrap();
    assert_eq!(progress.repetitions, 4);
}

#[test]
fn review_ids_are_scoped_per_submission_not_per_card() {
    let (session, _dir) = fixtures::session();
    let cards = fixtures::seed_cards(&session, None, 2);

    let id_a = Uuid::new_v4();
    let id_b = Uuid::new_v4();

    // Distinct keys on the same card: two real reviews
    for id in [id_a, id_b] {
        session
            .grade(GradeRequest {
                learner_id: LearnerId(1),
                card_id: cards[0].id,
                grade: 3,
                client_timestamp: None,
                review_id: Some(id),
            })
            .unwrap();
    }
    let progress = session
        .store()
        .get_progress(LearnerId(1), cards[0].id)
        .unwrap()
        .unwrap();
    assert_eq!(progress.repetitions, 2);
}

#[test]
fn concurrent_retries_with_one_key_commit_once() {
    let (session, _dir) = fixtures::session();
    let cards = fixtures::seed_cards(&session, None, 1);
    let card = cards[0].id;
    let review_id = Uuid::new_v4();
    let session = Arc::new(session);

    // A stampede of identical retries, as a flaky client would produce
    let handles: Vec<_> = (0..6)
        .map(|_| {
            let session = Arc::clone(&session);
            thread::spawn(move || {
                session.grade(GradeRequest {
                    learner_id: LearnerId(1),
                    card_id: card,
                    grade: 4,
                    client_timestamp: None,
                    review_id: Some(review_id),
                })
            })
        })
        .collect();

    for handle in handles {
        let receipt = handle.join().unwrap().unwrap();
        assert_eq!(receipt.repetitions, 1);
        assert_eq!(receipt.status, ProgressStatus::Reviewing);
    }

    let progress = session
        .store()
        .get_progress(LearnerId(1), card)
        .unwrap()
        .unwrap();
    assert_eq!(progress.repetitions, 1);
    assert_eq!(progress.stability, 2.2);

    let history = session.store().review_history(LearnerId(1), card, 10).unwrap();
    assert_eq!(history.len(), 1);
}

#[test]
fn requests_without_keys_always_apply() {
    let (session, _dir) = fixtures::session();
    let cards = fixtures::seed_cards(&session, None, 1);

    let request = GradeRequest {
        learner_id: LearnerId(1),
        card_id: cards[0].id,
        grade: 3,
        client_timestamp: None,
        review_id: None,
    };
    session.grade(request.clone()).unwrap();
    let second = session.grade(request).unwrap();
    assert_eq!(second.repetitions, 2);
}

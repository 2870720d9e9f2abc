//! Journey: a learner studies a card from first sight to mastery
//!
//! Walks the full loop the serving layer drives: fetch the due queue, grade
//! the card, watch stability and status evolve, and confirm the schedule
//! invariants hold after every step.

use chrono::{Duration, Utc};
use retain_core::{GradeRequest, LearnerId, ProgressStatus, StoreError};
use retain_e2e_tests::fixtures;

fn grade(learner: i64, card: retain_core::CardId, grade: i32) -> GradeRequest {
    GradeRequest {
        learner_id: LearnerId(learner),
        card_id: card,
        grade,
        client_timestamp: None,
        review_id: None,
    }
}

#[test]
fn first_review_moves_card_out_of_new() {
    let (session, _dir) = fixtures::session();
    let cards = fixtures::seed_cards(&session, None, 1);
    let learner = LearnerId(1);
    let now = Utc::now();

    let queue = session.get_due(learner, now, None, None).unwrap();
    assert_eq!(queue.len(), 1);
    assert!(queue.iter().next().unwrap().is_new());

    let receipt = session.grade(grade(1, cards[0].id, 3)).unwrap();
    assert_eq!(receipt.repetitions, 1);
    assert_eq!(receipt.status, ProgressStatus::Reviewing);
    assert_eq!(receipt.stability, 1.5);
    // ceil(1.5) = 2 days out; the card is no longer due today
    assert!(session.get_due(learner, now, None, None).unwrap().is_empty());
}

#[test]
fn repeated_good_reviews_reach_mastery() {
    let (session, _dir) = fixtures::session();
    let cards = fixtures::seed_cards(&session, None, 1);
    let card = cards[0].id;

    // 1.0 * 1.5^n crosses the 21-day mastery threshold at n = 8
    let mut receipt = session.grade(grade(1, card, 3)).unwrap();
    for _ in 0..7 {
        receipt = session.grade(grade(1, card, 3)).unwrap();
    }
    assert!(receipt.stability > 21.0);
    assert_eq!(receipt.status, ProgressStatus::Mastered);
    assert_eq!(receipt.repetitions, 8);
    assert_eq!(receipt.lapses, 0);

    // A lapse drags even a mastered card back to learning
    let lapsed = session.grade(grade(1, card, 1)).unwrap();
    assert_eq!(lapsed.status, ProgressStatus::Learning);
    assert_eq!(lapsed.lapses, 1);
    assert!(lapsed.stability < receipt.stability);
}

#[test]
fn schedule_invariants_hold_across_mixed_grades() {
    let (session, _dir) = fixtures::session();
    let cards = fixtures::seed_cards(&session, None, 1);
    let card = cards[0].id;
    let learner = LearnerId(1);

    let grades = [3, 1, 2, 4, 1, 3, 3, 2, 1, 4];
    let mut last_repetitions = 0;
    let mut last_lapses = 0;

    for g in grades {
        let receipt = session.grade(grade(1, card, g)).unwrap();
        let progress = session.store().get_progress(learner, card).unwrap().unwrap();

        assert!(progress.stability > 0.0);
        assert!((1.0..=10.0).contains(&progress.difficulty));
        assert_eq!(progress.repetitions, last_repetitions + 1);
        if g == 1 {
            assert_eq!(progress.lapses, last_lapses + 1);
        } else {
            assert_eq!(progress.lapses, last_lapses);
        }

        // next_due_at == last_review_at + ceil(stability) days
        let expected_due = progress.last_review_at.unwrap()
            + Duration::days(progress.stability.ceil() as i64);
        assert_eq!(progress.next_due_at, Some(expected_due));
        assert_eq!(receipt.next_due_at, progress.next_due_at);

        last_repetitions = progress.repetitions;
        last_lapses = progress.lapses;
    }
}

#[test]
fn failed_grade_leaves_progress_untouched() {
    let (session, _dir) = fixtures::session();
    let cards = fixtures::seed_cards(&session, None, 1);
    let card = cards[0].id;
    let learner = LearnerId(1);

    session.grade(grade(1, card, 3)).unwrap();
    let before = session.store().get_progress(learner, card).unwrap().unwrap();

    let err = session.grade(grade(1, card, 9)).unwrap_err();
    assert!(matches!(err, StoreError::InvalidGrade(9)));

    let after = session.store().get_progress(learner, card).unwrap().unwrap();
    assert_eq!(after, before);
}

#[test]
fn stats_track_the_journey() {
    let (session, _dir) = fixtures::session();
    let cards = fixtures::seed_cards(&session, None, 3);
    let learner = LearnerId(1);
    let now = Utc::now();

    let fresh = session.stats(learner, now).unwrap();
    assert_eq!(fresh.total_cards, 3);
    assert_eq!(fresh.new_cards, 3);
    assert_eq!(fresh.seen_cards, 0);

    session.grade(grade(1, cards[0].id, 3)).unwrap();
    session.grade(grade(1, cards[1].id, 1)).unwrap();

    let after = session.stats(learner, now).unwrap();
    assert_eq!(after.seen_cards, 2);
    assert_eq!(after.new_cards, 1);
    assert_eq!(after.total_reviews, 2);
    assert_eq!(after.total_lapses, 1);
}

//! Journey: concurrent grades on one (learner, card) pair
//!
//! Grading must be effectively-once: simultaneous calls are serialized, a
//! conflict is surfaced to exactly one caller rather than silently dropped,
//! and the final counters account for every committed call.

use std::sync::Arc;
use std::thread;

use chrono::Utc;
use retain_core::{GradeRequest, LearnerId, StoreError};
use retain_e2e_tests::fixtures;

#[test]
fn two_simultaneous_grades_both_land() {
    let (session, _dir) = fixtures::session();
    let cards = fixtures::seed_cards(&session, None, 1);
    let card_id = cards[0].id;
    let session = Arc::new(session);

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let session = Arc::clone(&session);
            thread::spawn(move || {
                session.grade(GradeRequest {
                    learner_id: LearnerId(1),
                    card_id,
                    grade: 3,
                    client_timestamp: None,
                    review_id: None,
                })
            })
        })
        .collect();

    let mut committed = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(_) => committed += 1,
            // A conflict is an acceptable outcome, but it must be explicit
            Err(StoreError::GradeConflict { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    let progress = session
        .store()
        .get_progress(LearnerId(1), card_id)
        .unwrap()
        .unwrap();
    // Never a lost update: every committed call is visible in the counter
    assert_eq!(progress.repetitions as usize, committed);
    assert_eq!(committed, 2);
}

#[test]
fn hammering_one_pair_from_many_threads_loses_nothing() {
    let (session, _dir) = fixtures::session();
    let cards = fixtures::seed_cards(&session, None, 1);
    let card_id = cards[0].id;
    let session = Arc::new(session);

    let threads = 8;
    let grades_per_thread = 5;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let session = Arc::clone(&session);
            thread::spawn(move || {
                let mut committed = 0usize;
                for i in 0..grades_per_thread {
                    // Mix of grades, deterministic per slot
                    let grade = 1 + ((t + i) % 4) as i32;
                    match session.grade(GradeRequest {
                        learner_id: LearnerId(1),
                        card_id,
                        grade,
                        client_timestamp: None,
                        review_id: None,
                    }) {
                        Ok(_) => committed += 1,
                        Err(StoreError::GradeConflict { .. }) => {}
                        Err(other) => panic!("unexpected error: {other}"),
                    }
                }
                committed
            })
        })
        .collect();

    let committed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    let progress = session
        .store()
        .get_progress(LearnerId(1), card_id)
        .unwrap()
        .unwrap();
    assert_eq!(progress.repetitions as usize, committed);
    // The version counter moves in lockstep with committed reviews
    assert_eq!(progress.version as usize, committed);

    // The audit log saw every commit too
    let history = session
        .store()
        .review_history(LearnerId(1), card_id, 100)
        .unwrap();
    assert_eq!(history.len(), committed);

    // Invariants survived the contention
    assert!(progress.stability > 0.0);
    assert!((1.0..=10.0).contains(&progress.difficulty));
}

#[test]
fn readers_run_in_parallel_with_writers() {
    let (session, _dir) = fixtures::session();
    let cards = fixtures::seed_cards(&session, None, 20);
    let session = Arc::new(session);

    let writer = {
        let session = Arc::clone(&session);
        let card_id = cards[0].id;
        thread::spawn(move || {
            for grade in [3, 1, 2, 4, 3] {
                session
                    .grade(GradeRequest {
                        learner_id: LearnerId(1),
                        card_id,
                        grade,
                        client_timestamp: None,
                        review_id: None,
                    })
                    .unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let session = Arc::clone(&session);
            thread::spawn(move || {
                for _ in 0..10 {
                    // A reader may see pre- or post-update state, never a
                    // torn one: every observed row satisfies the invariants
                    let queue = session
                        .get_due(LearnerId(1), Utc::now(), None, None)
                        .unwrap();
                    for entry in &queue {
                        if let Some(summary) = entry.summary() {
                            assert!(summary.stability > 0.0);
                            assert!((1.0..=10.0).contains(&summary.difficulty));
                        }
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}

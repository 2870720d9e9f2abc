//! Due queue - ordered selection of what a learner studies next
//!
//! A queue is a point-in-time snapshot, not a live stream: it is built from
//! one storage read and can be iterated any number of times with the same
//! result. Re-querying at a later `now` may produce a different, equally
//! well-defined queue.
//!
//! Ordering:
//! 1. Due reviews come most-overdue-first, card id breaking ties.
//! 2. New cards are interleaved at a bounded ratio (at most one new card per
//!    `new_per_reviews` due reviews) to cap cognitive load, in creation
//!    order.
//! 3. Once reviews run out, remaining new cards fill the queue.

use serde::Serialize;

use crate::card::Card;
use crate::progress::{Progress, ProgressSummary};

// ============================================================================
// ENTRIES
// ============================================================================

/// One card handed to the learner, with its scheduling state.
///
/// `progress` is None for a never-reviewed card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueEntry {
    pub card: Card,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
}

impl DueEntry {
    /// Whether this entry is a never-reviewed card
    pub fn is_new(&self) -> bool {
        match &self.progress {
            Some(p) => p.next_due_at.is_none(),
            None => true,
        }
    }

    /// Compact scheduling state for the serving layer
    pub fn summary(&self) -> Option<ProgressSummary> {
        self.progress.as_ref().map(Progress::summary)
    }
}

// ============================================================================
// QUEUE
// ============================================================================

/// Snapshot of a learner's due set with deterministic interleaving.
///
/// `iter()` is restartable; two iterations of the same queue yield the same
/// sequence.
#[derive(Debug, Clone)]
pub struct DueQueue {
    reviews: Vec<DueEntry>,
    fresh: Vec<DueEntry>,
    new_per_reviews: usize,
    limit: Option<usize>,
}

impl DueQueue {
    /// Build a queue from storage snapshot rows.
    ///
    /// `reviews` must already be ordered most-overdue-first and `fresh` in
    /// card creation order; the queue only interleaves.
    pub fn new(
        reviews: Vec<(Card, Progress)>,
        fresh: Vec<(Card, Option<Progress>)>,
        new_per_reviews: usize,
        limit: Option<usize>,
    ) -> Self {
        Self {
            reviews: reviews
                .into_iter()
                .map(|(card, progress)| DueEntry {
                    card,
                    progress: Some(progress),
                })
                .collect(),
            fresh: fresh
                .into_iter()
                .map(|(card, progress)| DueEntry { card, progress })
                .collect(),
            new_per_reviews,
            limit,
        }
    }

    /// Number of entries the queue will yield
    pub fn len(&self) -> usize {
        let available = self.reviews.len() + self.fresh.len();
        match self.limit {
            Some(limit) => available.min(limit),
            None => available,
        }
    }

    /// Whether the queue yields nothing
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate the interleaved queue without consuming it
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            queue: self,
            review_idx: 0,
            fresh_idx: 0,
            emitted: 0,
            reviews_since_new: 0,
        }
    }

    /// Collect the interleaved queue into a vector
    pub fn entries(&self) -> Vec<DueEntry> {
        self.iter().cloned().collect()
    }
}

/// Restartable iterator over a [`DueQueue`]
#[derive(Debug)]
pub struct Iter<'a> {
    queue: &'a DueQueue,
    review_idx: usize,
    fresh_idx: usize,
    emitted: usize,
    reviews_since_new: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a DueEntry;

    fn next(&mut self) -> Option<&'a DueEntry> {
        if let Some(limit) = self.queue.limit {
            if self.emitted >= limit {
                return None;
            }
        }

        let review = self.queue.reviews.get(self.review_idx);
        let fresh = self.queue.fresh.get(self.fresh_idx);

        // A new card is inserted once enough reviews have been emitted since
        // the last one, or when no reviews remain.
        let take_fresh = match (review, fresh) {
            (Some(_), Some(_)) => self.reviews_since_new >= self.queue.new_per_reviews,
            (None, Some(_)) => true,
            _ => false,
        };

        let entry = if take_fresh {
            self.fresh_idx += 1;
            self.reviews_since_new = 0;
            fresh
        } else {
            review?;
            self.review_idx += 1;
            self.reviews_since_new += 1;
            review
        };

        self.emitted += 1;
        entry
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.queue.len().saturating_sub(self.emitted);
        (remaining, Some(remaining))
    }
}

impl<'a> IntoIterator for &'a DueQueue {
    type Item = &'a DueEntry;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

// ============================================================================
// TESTS
// ============================================================================

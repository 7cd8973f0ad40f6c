//! Review coordinator: executes one review transaction end-to-end and
//! serves due-card queries.
//!
//! The coordinator loads a card, derives elapsed time from the injected
//! clock, runs the scheduler, and hands the updated card plus its log
//! entry to the store as one atomic commit. Ratings are validated here,
//! before anything reaches the scheduler.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::algorithm::{preview_intervals, schedule, MemoryState, SchedulerParams};
use super::models::{Card, CardState, Rating, ReviewLog};
use super::storage::{CardStore, CardStoreError};

const MS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Card not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid rating {0}: must be 1 (Again), 2 (Hard), 3 (Good) or 4 (Easy)")]
    InvalidRating(i32),

    #[error("Card {id} has out-of-contract fields: {reason}")]
    InvalidCardState { id: Uuid, reason: String },

    #[error("Storage failure: {0}")]
    Storage(CardStoreError),
}

impl From<CardStoreError> for ReviewError {
    fn from(err: CardStoreError) -> Self {
        match err {
            CardStoreError::CardNotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReviewError>;

/// Time source for review transactions, injectable for deterministic tests
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// What a completed review reports back to the caller
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub due_date: DateTime<Utc>,
    pub state: CardState,
    pub stability: f64,
}

/// Orchestrates review transactions over a card store and a clock
pub struct ReviewCoordinator<S, C> {
    store: S,
    clock: C,
    params: SchedulerParams,
}

impl<S: CardStore, C: Clock> ReviewCoordinator<S, C> {
    pub fn new(store: S, clock: C, params: SchedulerParams) -> Self {
        Self {
            store,
            clock,
            params,
        }
    }

    /// Record one review of a card.
    ///
    /// Loads the card, computes elapsed days since its last review,
    /// schedules the next interval, and commits the updated card together
    /// with an immutable log entry. A storage failure leaves the card
    /// exactly as it was; the caller may retry the whole call.
    pub fn submit_review(&mut self, card_id: Uuid, rating: i32) -> Result<ReviewOutcome> {
        let rating = Rating::from_value(rating).ok_or(ReviewError::InvalidRating(rating))?;

        let card = self.store.get(card_id)?;
        validate_card(&card)?;

        let now = self.clock.now();
        let elapsed_days = elapsed_days(&card, now);

        let result = schedule(&self.params, &MemoryState::of_card(&card, elapsed_days), rating);

        let due_date = if result.scheduled_days > 0.0 {
            now + Duration::days(result.scheduled_days as i64)
        } else {
            // Interval 0 means due now, used to re-queue learning and
            // relearning cards within the same session
            now
        };

        let mut updated = card.clone();
        updated.state = result.state;
        updated.stability = result.stability;
        updated.difficulty = result.difficulty;
        updated.elapsed_days = elapsed_days;
        updated.scheduled_days = result.scheduled_days;
        updated.reps = result.reps;
        updated.lapses = result.lapses;
        updated.due_date = Some(due_date);
        updated.last_review = Some(now);
        updated.updated_at = now;

        // The log captures the state the card was in before this review
        let log = ReviewLog::new(
            card.id,
            rating,
            card.state,
            result.scheduled_days,
            elapsed_days,
            now,
        );

        self.store.commit_review(&updated, &log)?;

        log::debug!(
            "Reviewed card {}: {:?} -> {:?}, next interval {} days",
            card.id,
            card.state,
            updated.state,
            result.scheduled_days
        );

        Ok(ReviewOutcome {
            due_date,
            state: result.state,
            stability: result.stability,
        })
    }

    /// Cards ready for review now: never-scheduled cards plus cards whose
    /// due date has passed, deduplicated by id and truncated to `limit`
    pub fn due_queue(&self, limit: usize) -> Result<Vec<Card>> {
        let now = self.clock.now();
        let cards = self.store.query_new_or_due(now, limit)?;

        let mut seen = HashSet::new();
        let mut queue: Vec<Card> = cards
            .into_iter()
            .filter(|card| seen.insert(card.id))
            .collect();
        queue.truncate(limit);
        Ok(queue)
    }

    /// The interval each rating would give for a card, without reviewing it
    pub fn preview(&self, card_id: Uuid) -> Result<[f64; 4]> {
        let card = self.store.get(card_id)?;
        validate_card(&card)?;
        let elapsed = elapsed_days(&card, self.clock.now());
        Ok(preview_intervals(&self.params, &MemoryState::of_card(&card, elapsed)))
    }
}

/// Days since the card's last review, 0 before the first review.
///
/// A last review in the future means the wall clock moved backwards;
/// elapsed time is clamped to 0 rather than fed to the model negative.
fn elapsed_days(card: &Card, now: DateTime<Utc>) -> f64 {
    let last = match card.last_review {
        Some(last) => last,
        None => return 0.0,
    };
    let days = (now - last).num_milliseconds() as f64 / MS_PER_DAY;
    if days < 0.0 {
        log::warn!(
            "Card {} has last_review {} ahead of now {}; clamping elapsed time to 0",
            card.id,
            last,
            now
        );
        return 0.0;
    }
    days
}

/// Reject persisted cards whose numbers are out of contract.
///
/// Corrupt rows surface as errors instead of being silently repaired;
/// clamping inside the scheduler is a designed part of the model, not
/// error recovery.
fn validate_card(card: &Card) -> Result<()> {
    let fail = |reason: String| {
        Err(ReviewError::InvalidCardState {
            id: card.id,
            reason,
        })
    };

    if !card.stability.is_finite() || !card.difficulty.is_finite() {
        return fail(format!(
            "non-finite stability {} or difficulty {}",
            card.stability, card.difficulty
        ));
    }
    if card.reps < 0 || card.lapses < 0 {
        return fail(format!(
            "negative reps {} or lapses {}",
            card.reps, card.lapses
        ));
    }
    if card.state != CardState::New {
        if card.stability < 0.0 {
            return fail(format!("negative stability {}", card.stability));
        }
        if !(1.0..=10.0).contains(&card.difficulty) {
            return fail(format!("difficulty {} outside [1, 10]", card.difficulty));
        }
    }
    Ok(())
}

//! FSRS-lite Spaced Repetition Algorithm
//!
//! Scheduler for calculating review intervals from a continuous memory
//! model (stability, difficulty, elapsed time) and the user's rating.
//!
//! Ratings (1-4):
//! - 1: Again, failed to recall
//! - 2: Hard, recalled with serious difficulty
//! - 3: Good, recalled correctly
//! - 4: Easy, recalled effortlessly
//!
//! The scheduler is a pure function: no I/O, no clock reads. Elapsed time
//! is passed in by the caller, and all tunable weights arrive through
//! [`SchedulerParams`] so alternate parameterizations can be tested.

use serde::Deserialize;

use super::models::{CardState, Rating};

/// Default weight vector for the memory model
const DEFAULT_WEIGHTS: [f64; 17] = [
    0.4, 0.6, 2.4, 5.8, 4.93, 0.94, 0.86, 0.01, 1.49, 0.14, 0.94, 2.18, 0.05,
    0.34, 1.26, 0.29, 2.61,
];

/// Exponent of the forgetting curve
const DEFAULT_DECAY: f64 = -0.5;

/// Scale factor of the forgetting curve
const DEFAULT_FACTOR: f64 = 19.0 / 81.0;

/// Lower bound applied to stability and elapsed days in the
/// retrievability formula, and to post-lapse stability
const MIN_STABILITY: f64 = 0.01;

/// Tunable parameters of the memory model.
///
/// `w[0..3]` are the initial stabilities per rating; the remaining
/// weights drive difficulty updates, stability growth, and lapse decay.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchedulerParams {
    pub w: [f64; 17],
    pub decay: f64,
    pub factor: f64,
}

impl Default for SchedulerParams {
    fn default() -> Self {
        Self {
            w: DEFAULT_WEIGHTS,
            decay: DEFAULT_DECAY,
            factor: DEFAULT_FACTOR,
        }
    }
}

/// Memory fields of a card at the moment of review.
///
/// `elapsed_days` is the time since the previous review, computed by the
/// caller; pass 0 for a card that has never been reviewed.
#[derive(Debug, Clone)]
pub struct MemoryState {
    pub state: CardState,
    pub stability: f64,
    pub difficulty: f64,
    pub elapsed_days: f64,
    pub reps: i32,
    pub lapses: i32,
}

impl MemoryState {
    /// Snapshot a card's memory fields, with elapsed time supplied by
    /// the caller
    pub fn of_card(card: &super::models::Card, elapsed_days: f64) -> Self {
        Self {
            state: card.state,
            stability: card.stability,
            difficulty: card.difficulty,
            elapsed_days,
            reps: card.reps,
            lapses: card.lapses,
        }
    }
}

/// Result of one scheduling decision
#[derive(Debug, Clone)]
pub struct ScheduleResult {
    pub stability: f64,
    pub difficulty: f64,
    /// Next interval in days; 0 means due immediately
    pub scheduled_days: f64,
    pub state: CardState,
    pub reps: i32,
    pub lapses: i32,
}

/// Compute the next memory state and interval for one review.
///
/// Deterministic given its inputs. `scheduled_days` is integer-valued
/// and is 0 exactly when the next state is learning/relearning;
/// difficulty stays in [1, 10] and stability never drops below 0.01
/// once the card has left the new state.
pub fn schedule(
    params: &SchedulerParams,
    memory: &MemoryState,
    rating: Rating,
) -> ScheduleResult {
    let w = &params.w;
    let r = rating.value();

    if memory.state == CardState::New {
        // Initial stability and difficulty come straight from the weights
        let stability = w[(r - 1) as usize];
        let difficulty =
            (w[4] - (w[5] * (r - 1) as f64).exp() + 1.0).clamp(1.0, 10.0);

        if rating == Rating::Again {
            return ScheduleResult {
                stability,
                difficulty,
                scheduled_days: 0.0,
                state: CardState::Learning,
                reps: 1,
                lapses: memory.lapses + 1,
            };
        }
        return ScheduleResult {
            stability,
            difficulty,
            scheduled_days: interval_from(stability),
            state: CardState::Review,
            reps: 1,
            lapses: memory.lapses,
        };
    }

    let stability = memory.stability;
    let retrievability = retrievability(params, stability, memory.elapsed_days);

    let difficulty = (w[7] * (w[4] - memory.difficulty)
        + memory.difficulty
        + w[6] * (r - 3) as f64)
        .clamp(1.0, 10.0);

    let reps = memory.reps + 1;

    if rating == Rating::Again {
        // Lapse: stability can only shrink or stay flat, floored at 0.01
        let new_stability = (w[11]
            * difficulty.powf(-w[12])
            * ((stability + 1.0).powf(w[13]) - 1.0)
            * (w[14] * (1.0 - retrievability)).exp())
        .clamp(MIN_STABILITY, stability.max(MIN_STABILITY));
        return ScheduleResult {
            stability: new_stability,
            difficulty,
            scheduled_days: 0.0,
            state: CardState::Relearning,
            reps,
            lapses: memory.lapses + 1,
        };
    }

    let hard_penalty = if rating == Rating::Hard { w[15] } else { 1.0 };
    let easy_bonus = if rating == Rating::Easy { w[16] } else { 1.0 };
    let new_stability = stability
        * (1.0
            + w[8].exp()
                * (11.0 - difficulty)
                * stability.powf(-w[9])
                * ((w[10] * (1.0 - retrievability)).exp() - 1.0)
                * hard_penalty
                * easy_bonus);

    ScheduleResult {
        stability: new_stability,
        difficulty,
        scheduled_days: interval_from(new_stability),
        state: CardState::Review,
        reps,
        lapses: memory.lapses,
    }
}

/// Estimated current recall probability from stability and elapsed time
fn retrievability(params: &SchedulerParams, stability: f64, elapsed_days: f64) -> f64 {
    let elapsed = elapsed_days.max(MIN_STABILITY);
    (1.0 + params.factor * elapsed / stability.max(MIN_STABILITY)).powf(params.decay)
}

/// Round a stability to a whole-day interval, at least one day
fn interval_from(stability: f64) -> f64 {
    stability.round().max(1.0)
}

/// Calculate the interval each rating would produce for a card.
///
/// Returns intervals in days for Again, Hard, Good, Easy; used by
/// review front-ends to label the rating buttons.
pub fn preview_intervals(params: &SchedulerParams, memory: &MemoryState) -> [f64; 4] {
    let again = schedule(params, memory, Rating::Again).scheduled_days;
    let hard = schedule(params, memory, Rating::Hard).scheduled_days;
    let good = schedule(params, memory, Rating::Good).scheduled_days;
    let easy = schedule(params, memory, Rating::Easy).scheduled_days;

    [again, hard, good, easy]
}

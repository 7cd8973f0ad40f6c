//! Data models for the spaced repetition system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A question/answer pair, the unit of content a card is attached to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaPair {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QaPair {
    pub fn new(question: String, answer: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            question,
            answer,
            position: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Scheduling state of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardState {
    /// Never reviewed
    New,
    /// In initial learning phase
    Learning,
    /// Regular spaced review
    Review,
    /// Failed and re-learning
    Relearning,
}

impl Default for CardState {
    fn default() -> Self {
        Self::New
    }
}

impl CardState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardState::New => "new",
            CardState::Learning => "learning",
            CardState::Review => "review",
            CardState::Relearning => "relearning",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(CardState::New),
            "learning" => Some(CardState::Learning),
            "review" => Some(CardState::Review),
            "relearning" => Some(CardState::Relearning),
            _ => None,
        }
    }
}

/// User-reported recall quality for one review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    /// Numeric value on the 1-4 scale (1=Again, 2=Hard, 3=Good, 4=Easy)
    pub fn value(&self) -> i32 {
        match self {
            Rating::Again => 1,
            Rating::Hard => 2,
            Rating::Good => 3,
            Rating::Easy => 4,
        }
    }

    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            1 => Some(Rating::Again),
            2 => Some(Rating::Hard),
            3 => Some(Rating::Good),
            4 => Some(Rating::Easy),
            _ => None,
        }
    }
}

/// The scheduling record attached to one question/answer pair (1:1)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub qa_pair_id: Uuid,
    #[serde(default)]
    pub state: CardState,
    /// Days until recall probability decays to ~90%
    #[serde(default)]
    pub stability: f64,
    /// Intrinsic item hardness in [1, 10] once the card has been reviewed
    #[serde(default)]
    pub difficulty: f64,
    /// Time since the previous review, recomputed at each review event
    #[serde(default)]
    pub elapsed_days: f64,
    /// Interval chosen at the last scheduling decision
    #[serde(default)]
    pub scheduled_days: f64,
    /// Completed reviews (excludes creation)
    #[serde(default)]
    pub reps: i32,
    /// Reviews rated Again outside the new state
    #[serde(default)]
    pub lapses: i32,
    /// Absent means never scheduled, treated as immediately due
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Absent only before the first review
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    pub fn new(qa_pair_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            qa_pair_id,
            state: CardState::New,
            stability: 0.0,
            difficulty: 0.0,
            elapsed_days: 0.0,
            scheduled_days: 0.0,
            reps: 0,
            lapses: 0,
            due_date: None,
            last_review: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the card is due at `now` (never-scheduled cards are always due)
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) => due <= now,
            None => true,
        }
    }
}

/// Immutable record of one review event, appended after every review.
///
/// Captures the card's state *before* the update, together with the
/// rating and the days computed for that event. Logs are never mutated;
/// they only disappear when their card is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLog {
    pub id: Uuid,
    pub card_id: Uuid,
    pub rating: Rating,
    /// Card state at review time, before the update was applied
    pub state: CardState,
    pub scheduled_days: f64,
    pub elapsed_days: f64,
    pub reviewed_at: DateTime<Utc>,
}

impl ReviewLog {
    pub fn new(
        card_id: Uuid,
        rating: Rating,
        state: CardState,
        scheduled_days: f64,
        elapsed_days: f64,
        reviewed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            card_id,
            rating,
            state,
            scheduled_days,
            elapsed_days,
            reviewed_at,
        }
    }
}

/// Aggregate review statistics across all cards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_cards: usize,
    pub new_cards: usize,
    pub learning_cards: usize,
    pub review_cards: usize,
    pub relearning_cards: usize,
    pub due_cards: usize,
    pub reviews_today: usize,
}

impl Default for ReviewStats {
    fn default() -> Self {
        Self {
            total_cards: 0,
            new_cards: 0,
            learning_cards: 0,
            review_cards: 0,
            relearning_cards: 0,
            due_cards: 0,
            reviews_today: 0,
        }
    }
}

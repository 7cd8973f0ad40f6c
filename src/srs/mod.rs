//! Spaced repetition system for Engram
//!
//! This module provides:
//! - The FSRS-lite scheduling algorithm (pure, parameterized)
//! - Card / QA pair / review log models
//! - SQLite-backed storage with atomic review commits
//! - The review coordinator that ties them together

pub mod algorithm;
pub mod models;
pub mod review;
pub mod storage;

pub use algorithm::{preview_intervals, schedule, MemoryState, SchedulerParams};
pub use models::*;
pub use review::{Clock, ReviewCoordinator, ReviewError, ReviewOutcome, SystemClock};
pub use storage::{CardStore, CardStoreError, SqliteCardStore};

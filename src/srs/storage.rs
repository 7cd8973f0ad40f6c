//! SQLite-backed storage for cards, QA pairs, and review logs.
//!
//! Schema:
//! - `qa_pair`: question/answer content rows
//! - `card`: one scheduling record per QA pair (unique FK, cascade)
//! - `review_log`: append-only review history (FK to card, cascade)
//!
//! Creating a QA pair creates its card in the same transaction, and a
//! review commit writes the card update and its log row in the same
//! transaction, so neither is ever observable half-applied.

use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use thiserror::Error;
use uuid::Uuid;

use super::models::{Card, CardState, QaPair, Rating, ReviewLog, ReviewStats};

#[derive(Error, Debug)]
pub enum CardStoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),

    #[error("QA pair not found: {0}")]
    QaPairNotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, CardStoreError>;

/// The narrow store contract the review coordinator depends on.
///
/// `commit_review` applies the card update and the log insertion as one
/// atomic commit; a failure leaves the previously persisted state intact.
pub trait CardStore {
    fn get(&self, card_id: Uuid) -> Result<Card>;
    fn query_new_or_due(&self, now: DateTime<Utc>, limit: usize) -> Result<Vec<Card>>;
    fn commit_review(&mut self, card: &Card, log: &ReviewLog) -> Result<()>;
}

impl<S: CardStore + ?Sized> CardStore for &mut S {
    fn get(&self, card_id: Uuid) -> Result<Card> {
        (**self).get(card_id)
    }

    fn query_new_or_due(&self, now: DateTime<Utc>, limit: usize) -> Result<Vec<Card>> {
        (**self).query_new_or_due(now, limit)
    }

    fn commit_review(&mut self, card: &Card, log: &ReviewLog) -> Result<()> {
        (**self).commit_review(card, log)
    }
}

/// SQLite store for QA pairs, cards, and review logs
pub struct SqliteCardStore {
    conn: Connection,
}

impl SqliteCardStore {
    /// Open (or create) the store at the given path
    pub fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&db_path)?;
        Self::init_schema(conn)
    }

    fn init_schema(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS qa_pair (
                id TEXT PRIMARY KEY,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                position INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS card (
                id TEXT PRIMARY KEY,
                qa_pair_id TEXT NOT NULL UNIQUE
                    REFERENCES qa_pair(id) ON DELETE CASCADE,
                state TEXT NOT NULL DEFAULT 'new',
                stability REAL NOT NULL DEFAULT 0,
                difficulty REAL NOT NULL DEFAULT 0,
                elapsed_days REAL NOT NULL DEFAULT 0,
                scheduled_days REAL NOT NULL DEFAULT 0,
                reps INTEGER NOT NULL DEFAULT 0,
                lapses INTEGER NOT NULL DEFAULT 0,
                due_date TEXT,
                last_review TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS review_log (
                id TEXT PRIMARY KEY,
                card_id TEXT NOT NULL
                    REFERENCES card(id) ON DELETE CASCADE,
                rating INTEGER NOT NULL,
                state TEXT NOT NULL,
                scheduled_days REAL NOT NULL,
                elapsed_days REAL NOT NULL,
                reviewed_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_card_qa_pair ON card(qa_pair_id);
            CREATE INDEX IF NOT EXISTS idx_card_due_date ON card(due_date);
            CREATE INDEX IF NOT EXISTS idx_review_log_card ON review_log(card_id);
            "#,
        )?;

        Ok(Self { conn })
    }

    // ==================== QA Pair Operations ====================

    /// Create a QA pair together with its card.
    ///
    /// The card starts in `new` state and is inserted in the same
    /// transaction as the pair, so a pair without a card never exists.
    pub fn create_qa_pair(
        &mut self,
        question: String,
        answer: String,
        position: i32,
    ) -> Result<(QaPair, Card)> {
        let mut pair = QaPair::new(question, answer);
        pair.position = position;
        let card = Card::new(pair.id);

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO qa_pair (id, question, answer, position, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                pair.id.to_string(),
                pair.question,
                pair.answer,
                pair.position,
                ts(pair.created_at),
                ts(pair.updated_at),
            ],
        )?;
        tx.execute(
            "INSERT INTO card (id, qa_pair_id, state, stability, difficulty,
                 elapsed_days, scheduled_days, reps, lapses, due_date, last_review,
                 created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, NULL, NULL, ?10, ?11)",
            params![
                card.id.to_string(),
                card.qa_pair_id.to_string(),
                card.state.as_str(),
                card.stability,
                card.difficulty,
                card.elapsed_days,
                card.scheduled_days,
                card.reps,
                card.lapses,
                ts(card.created_at),
                ts(card.updated_at),
            ],
        )?;
        tx.commit()?;

        Ok((pair, card))
    }

    /// Get a specific QA pair
    pub fn get_qa_pair(&self, pair_id: Uuid) -> Result<QaPair> {
        self.conn
            .query_row(
                "SELECT id, question, answer, position, created_at, updated_at
                 FROM qa_pair WHERE id = ?1",
                params![pair_id.to_string()],
                qa_pair_from_row,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    CardStoreError::QaPairNotFound(pair_id)
                }
                other => other.into(),
            })
    }

    /// List all QA pairs in position order
    pub fn list_qa_pairs(&self) -> Result<Vec<QaPair>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, question, answer, position, created_at, updated_at
             FROM qa_pair ORDER BY position ASC, created_at ASC",
        )?;
        let pairs = stmt
            .query_map([], qa_pair_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(pairs)
    }

    /// Update a QA pair's content or position
    pub fn update_qa_pair(
        &mut self,
        pair_id: Uuid,
        question: Option<String>,
        answer: Option<String>,
        position: Option<i32>,
    ) -> Result<QaPair> {
        let mut pair = self.get_qa_pair(pair_id)?;

        if let Some(q) = question {
            pair.question = q;
        }
        if let Some(a) = answer {
            pair.answer = a;
        }
        if let Some(p) = position {
            pair.position = p;
        }
        pair.updated_at = Utc::now();

        self.conn.execute(
            "UPDATE qa_pair SET question = ?2, answer = ?3, position = ?4, updated_at = ?5
             WHERE id = ?1",
            params![
                pair.id.to_string(),
                pair.question,
                pair.answer,
                pair.position,
                ts(pair.updated_at),
            ],
        )?;

        Ok(pair)
    }

    /// Delete a QA pair; its card and review logs cascade away with it
    pub fn delete_qa_pair(&mut self, pair_id: Uuid) -> Result<()> {
        let deleted = self.conn.execute(
            "DELETE FROM qa_pair WHERE id = ?1",
            params![pair_id.to_string()],
        )?;
        if deleted == 0 {
            return Err(CardStoreError::QaPairNotFound(pair_id));
        }
        Ok(())
    }

    // ==================== Card Operations ====================

    /// Get the card attached to a QA pair
    pub fn card_for_pair(&self, pair_id: Uuid) -> Result<Card> {
        self.conn
            .query_row(
                &format!("{CARD_SELECT} WHERE qa_pair_id = ?1"),
                params![pair_id.to_string()],
                card_from_row,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    CardStoreError::QaPairNotFound(pair_id)
                }
                other => other.into(),
            })
    }

    // ==================== Review Log Operations ====================

    /// List the review history of a card, newest first
    pub fn list_logs(&self, card_id: Uuid) -> Result<Vec<ReviewLog>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, card_id, rating, state, scheduled_days, elapsed_days, reviewed_at
             FROM review_log WHERE card_id = ?1 ORDER BY reviewed_at DESC",
        )?;
        let logs = stmt
            .query_map(params![card_id.to_string()], review_log_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(logs)
    }

    // ==================== Statistics ====================

    /// Aggregate counts across all cards, relative to `now`
    pub fn stats(&self, now: DateTime<Utc>) -> Result<ReviewStats> {
        let mut stats = ReviewStats::default();

        let mut stmt = self
            .conn
            .prepare("SELECT state, COUNT(*) FROM card GROUP BY state")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        for row in rows {
            let (state, count) = row?;
            let count = count as usize;
            stats.total_cards += count;
            match CardState::parse(&state) {
                Some(CardState::New) => stats.new_cards = count,
                Some(CardState::Learning) => stats.learning_cards = count,
                Some(CardState::Review) => stats.review_cards = count,
                Some(CardState::Relearning) => stats.relearning_cards = count,
                None => log::warn!("Ignoring card rows with unknown state {:?}", state),
            }
        }

        stats.due_cards = self.conn.query_row(
            "SELECT COUNT(*) FROM card
             WHERE state = 'new' OR (due_date IS NOT NULL AND due_date <= ?1)",
            params![ts(now)],
            |row| row.get::<_, i64>(0),
        )? as usize;

        let day_start = now
            .date_naive()
            .and_time(chrono::NaiveTime::MIN)
            .and_utc();
        stats.reviews_today = self.conn.query_row(
            "SELECT COUNT(*) FROM review_log WHERE reviewed_at >= ?1",
            params![ts(day_start)],
            |row| row.get::<_, i64>(0),
        )? as usize;

        Ok(stats)
    }
}

impl CardStore for SqliteCardStore {
    fn get(&self, card_id: Uuid) -> Result<Card> {
        self.conn
            .query_row(
                &format!("{CARD_SELECT} WHERE id = ?1"),
                params![card_id.to_string()],
                card_from_row,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    CardStoreError::CardNotFound(card_id)
                }
                other => other.into(),
            })
    }

    fn query_new_or_due(&self, now: DateTime<Utc>, limit: usize) -> Result<Vec<Card>> {
        // Never-scheduled cards sort first, then oldest due date, then id
        // so repeated calls return the same set in the same order.
        let mut stmt = self.conn.prepare(&format!(
            "{CARD_SELECT}
             WHERE state = 'new' OR (due_date IS NOT NULL AND due_date <= ?1)
             ORDER BY (due_date IS NULL) DESC, due_date ASC, id ASC
             LIMIT ?2"
        ))?;
        let cards = stmt
            .query_map(params![ts(now), limit as i64], card_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cards)
    }

    fn commit_review(&mut self, card: &Card, log: &ReviewLog) -> Result<()> {
        let tx = self.conn.transaction()?;

        let updated = tx.execute(
            "UPDATE card SET state = ?2, stability = ?3, difficulty = ?4,
                 elapsed_days = ?5, scheduled_days = ?6, reps = ?7, lapses = ?8,
                 due_date = ?9, last_review = ?10, updated_at = ?11
             WHERE id = ?1",
            params![
                card.id.to_string(),
                card.state.as_str(),
                card.stability,
                card.difficulty,
                card.elapsed_days,
                card.scheduled_days,
                card.reps,
                card.lapses,
                card.due_date.map(ts),
                card.last_review.map(ts),
                ts(card.updated_at),
            ],
        )?;
        if updated == 0 {
            return Err(CardStoreError::CardNotFound(card.id));
        }

        tx.execute(
            "INSERT INTO review_log (id, card_id, rating, state, scheduled_days,
                 elapsed_days, reviewed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                log.id.to_string(),
                log.card_id.to_string(),
                log.rating.value(),
                log.state.as_str(),
                log.scheduled_days,
                log.elapsed_days,
                ts(log.reviewed_at),
            ],
        )?;

        tx.commit()?;
        Ok(())
    }
}

const CARD_SELECT: &str = "SELECT id, qa_pair_id, state, stability, difficulty,
     elapsed_days, scheduled_days, reps, lapses, due_date, last_review,
     created_at, updated_at FROM card";

/// Fixed-width RFC 3339 UTC, so lexicographic order matches time order
fn ts(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn uuid_col(row: &Row, idx: usize) -> rusqlite::Result<Uuid> {
    let text: String = row.get(idx)?;
    Uuid::parse_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn datetime_col(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn opt_datetime_col(row: &Row, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let text: Option<String> = row.get(idx)?;
    match text {
        None => Ok(None),
        Some(text) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
            }),
    }
}

fn state_col(row: &Row, idx: usize) -> rusqlite::Result<CardState> {
    let text: String = row.get(idx)?;
    CardState::parse(&text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown card state: {}", text).into(),
        )
    })
}

fn qa_pair_from_row(row: &Row) -> rusqlite::Result<QaPair> {
    Ok(QaPair {
        id: uuid_col(row, 0)?,
        question: row.get(1)?,
        answer: row.get(2)?,
        position: row.get(3)?,
        created_at: datetime_col(row, 4)?,
        updated_at: datetime_col(row, 5)?,
    })
}

fn card_from_row(row: &Row) -> rusqlite::Result<Card> {
    Ok(Card {
        id: uuid_col(row, 0)?,
        qa_pair_id: uuid_col(row, 1)?,
        state: state_col(row, 2)?,
        stability: row.get(3)?,
        difficulty: row.get(4)?,
        elapsed_days: row.get(5)?,
        scheduled_days: row.get(6)?,
        reps: row.get(7)?,
        lapses: row.get(8)?,
        due_date: opt_datetime_col(row, 9)?,
        last_review: opt_datetime_col(row, 10)?,
        created_at: datetime_col(row, 11)?,
        updated_at: datetime_col(row, 12)?,
    })
}

fn review_log_from_row(row: &Row) -> rusqlite::Result<ReviewLog> {
    let rating: i32 = row.get(2)?;
    Ok(ReviewLog {
        id: uuid_col(row, 0)?,
        card_id: uuid_col(row, 1)?,
        rating: Rating::from_value(rating).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                Type::Integer,
                format!("rating out of range: {}", rating).into(),
            )
        })?,
        state: state_col(row, 3)?,
        scheduled_days: row.get(4)?,
        elapsed_days: row.get(5)?,
        reviewed_at: datetime_col(row, 6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn create_test_store() -> (SqliteCardStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteCardStore::new(temp_dir.path().join("srs.db")).unwrap();
        (store, temp_dir)
    }

    fn reviewed(card: &Card, due: DateTime<Utc>, reviewed_at: DateTime<Utc>) -> Card {
        let mut updated = card.clone();
        updated.state = CardState::Review;
        updated.stability = 2.4;
        updated.difficulty = 5.0;
        updated.scheduled_days = 2.0;
        updated.reps = 1;
        updated.due_date = Some(due);
        updated.last_review = Some(reviewed_at);
        updated.updated_at = reviewed_at;
        updated
    }

    #[test]
    fn test_create_qa_pair_creates_card() {
        let (mut store, _temp) = create_test_store();

        let (pair, card) = store
            .create_qa_pair("What is FSRS?".to_string(), "A memory model".to_string(), 0)
            .unwrap();

        assert_eq!(card.qa_pair_id, pair.id);
        assert_eq!(card.state, CardState::New);
        assert_eq!(card.stability, 0.0);
        assert!(card.due_date.is_none());

        let loaded = store.get(card.id).unwrap();
        assert_eq!(loaded.id, card.id);
        assert_eq!(loaded.state, CardState::New);

        let by_pair = store.card_for_pair(pair.id).unwrap();
        assert_eq!(by_pair.id, card.id);
    }

    #[test]
    fn test_update_qa_pair() {
        let (mut store, _temp) = create_test_store();
        let (pair, _) = store
            .create_qa_pair("Q".to_string(), "A".to_string(), 0)
            .unwrap();

        let updated = store
            .update_qa_pair(pair.id, Some("Q2".to_string()), None, Some(3))
            .unwrap();
        assert_eq!(updated.question, "Q2");
        assert_eq!(updated.answer, "A");
        assert_eq!(updated.position, 3);

        let reloaded = store.get_qa_pair(pair.id).unwrap();
        assert_eq!(reloaded.question, "Q2");
    }

    #[test]
    fn test_delete_qa_pair_cascades() {
        let (mut store, _temp) = create_test_store();
        let (pair, card) = store
            .create_qa_pair("Q".to_string(), "A".to_string(), 0)
            .unwrap();

        let now = Utc::now();
        let updated = reviewed(&card, now + Duration::days(2), now);
        let log = ReviewLog::new(card.id, Rating::Good, CardState::New, 2.0, 0.0, now);
        store.commit_review(&updated, &log).unwrap();
        assert_eq!(store.list_logs(card.id).unwrap().len(), 1);

        store.delete_qa_pair(pair.id).unwrap();

        assert!(matches!(
            store.get(card.id),
            Err(CardStoreError::CardNotFound(_))
        ));
        assert!(store.list_logs(card.id).unwrap().is_empty());
        assert!(matches!(
            store.delete_qa_pair(pair.id),
            Err(CardStoreError::QaPairNotFound(_))
        ));
    }

    #[test]
    fn test_commit_review_persists_card_and_log() {
        let (mut store, _temp) = create_test_store();
        let (_, card) = store
            .create_qa_pair("Q".to_string(), "A".to_string(), 0)
            .unwrap();

        let now = Utc::now();
        let updated = reviewed(&card, now + Duration::days(2), now);
        let log = ReviewLog::new(card.id, Rating::Good, CardState::New, 2.0, 0.0, now);
        store.commit_review(&updated, &log).unwrap();

        let loaded = store.get(card.id).unwrap();
        assert_eq!(loaded.state, CardState::Review);
        assert_eq!(loaded.stability, 2.4);
        assert_eq!(loaded.reps, 1);
        assert!(loaded.due_date.is_some());
        assert!(loaded.last_review.is_some());

        let logs = store.list_logs(card.id).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].rating, Rating::Good);
        assert_eq!(logs[0].state, CardState::New);
    }

    #[test]
    fn test_commit_review_rolls_back_on_log_failure() {
        let (mut store, _temp) = create_test_store();
        let (_, card) = store
            .create_qa_pair("Q".to_string(), "A".to_string(), 0)
            .unwrap();

        let now = Utc::now();
        let updated = reviewed(&card, now + Duration::days(2), now);
        // The log references a card that does not exist, so the insert
        // violates the foreign key and the whole transaction fails.
        let bad_log =
            ReviewLog::new(Uuid::new_v4(), Rating::Good, CardState::New, 2.0, 0.0, now);
        assert!(store.commit_review(&updated, &bad_log).is_err());

        let loaded = store.get(card.id).unwrap();
        assert_eq!(loaded.state, CardState::New);
        assert_eq!(loaded.reps, 0);
        assert!(loaded.due_date.is_none());
        assert!(store.list_logs(card.id).unwrap().is_empty());
    }

    #[test]
    fn test_commit_review_unknown_card() {
        let (mut store, _temp) = create_test_store();

        let card = Card::new(Uuid::new_v4());
        let log = ReviewLog::new(card.id, Rating::Good, CardState::New, 2.0, 0.0, Utc::now());
        assert!(matches!(
            store.commit_review(&card, &log),
            Err(CardStoreError::CardNotFound(_))
        ));
    }

    #[test]
    fn test_query_new_or_due_union_and_limit() {
        let (mut store, _temp) = create_test_store();
        let now = Utc::now();

        // One new card plus three due cards and one scheduled in the future
        let (_, _new_card) = store
            .create_qa_pair("new".to_string(), "a".to_string(), 0)
            .unwrap();
        for i in 0..3 {
            let (_, card) = store
                .create_qa_pair(format!("due {}", i), "a".to_string(), i + 1)
                .unwrap();
            let past = now - Duration::days(i as i64 + 1);
            let updated = reviewed(&card, past, past - Duration::days(2));
            let log =
                ReviewLog::new(card.id, Rating::Good, CardState::New, 2.0, 0.0, past);
            store.commit_review(&updated, &log).unwrap();
        }
        let (_, future_card) = store
            .create_qa_pair("future".to_string(), "a".to_string(), 5)
            .unwrap();
        let updated = reviewed(&future_card, now + Duration::days(30), now);
        let log =
            ReviewLog::new(future_card.id, Rating::Good, CardState::New, 30.0, 0.0, now);
        store.commit_review(&updated, &log).unwrap();

        let limited = store.query_new_or_due(now, 2).unwrap();
        assert_eq!(limited.len(), 2);

        let all = store.query_new_or_due(now, 20).unwrap();
        assert_eq!(all.len(), 4);
        // Never-scheduled first, then oldest due date
        assert_eq!(all[0].state, CardState::New);
        assert!(all[1].due_date.unwrap() <= all[2].due_date.unwrap());
        assert!(all[2].due_date.unwrap() <= all[3].due_date.unwrap());
        assert!(!all.iter().any(|c| c.id == future_card.id));
    }

    #[test]
    fn test_list_logs_newest_first() {
        let (mut store, _temp) = create_test_store();
        let (_, card) = store
            .create_qa_pair("Q".to_string(), "A".to_string(), 0)
            .unwrap();

        let now = Utc::now();
        for i in 0..3 {
            let at = now + Duration::days(i);
            let updated = reviewed(&card, at + Duration::days(2), at);
            let log = ReviewLog::new(
                card.id,
                Rating::Good,
                CardState::Review,
                2.0,
                i as f64,
                at,
            );
            store.commit_review(&updated, &log).unwrap();
        }

        let logs = store.list_logs(card.id).unwrap();
        assert_eq!(logs.len(), 3);
        assert!(logs[0].reviewed_at >= logs[1].reviewed_at);
        assert!(logs[1].reviewed_at >= logs[2].reviewed_at);
        assert_eq!(logs[0].elapsed_days, 2.0);
    }

    #[test]
    fn test_stats() {
        let (mut store, _temp) = create_test_store();
        let now = Utc::now();

        let (_, _new_card) = store
            .create_qa_pair("new".to_string(), "a".to_string(), 0)
            .unwrap();
        let (_, due_card) = store
            .create_qa_pair("due".to_string(), "a".to_string(), 1)
            .unwrap();
        let updated = reviewed(&due_card, now - Duration::hours(1), now - Duration::days(2));
        let log = ReviewLog::new(due_card.id, Rating::Good, CardState::New, 2.0, 0.0, now);
        store.commit_review(&updated, &log).unwrap();

        let stats = store.stats(now).unwrap();
        assert_eq!(stats.total_cards, 2);
        assert_eq!(stats.new_cards, 1);
        assert_eq!(stats.review_cards, 1);
        assert_eq!(stats.due_cards, 2);
        assert_eq!(stats.reviews_today, 1);
    }
}

//! crates/mindreflect_core/src/history.rs
//!
//! Derives the mood history table and chart from a session's entries.

use crate::domain::{JournalEntry, Mood};
use crate::scoring::MoodScoreCache;
use chrono::{DateTime, Utc};

pub const SCALE_NOTE: &str =
    "Scoring goes from 0-5, where 0 is really negative and 5 is really positive.";
pub const NO_HISTORY_MESSAGE: &str =
    "No mood history yet. Start journaling to build your mood history.";

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub created_at: DateTime<Utc>,
    pub timestamp: String,
    pub mood: Mood,
    pub score: u8,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoodHistory {
    /// One row per entry, in store order.
    pub rows: Vec<HistoryRow>,
}

impl MoodHistory {
    pub fn build(entries: &[JournalEntry], cache: &MoodScoreCache) -> Self {
        let rows = entries
            .iter()
            .map(|entry| HistoryRow {
                created_at: entry.created_at,
                timestamp: entry.timestamp.clone(),
                mood: entry.mood,
                score: cache.score(entry),
            })
            .collect();
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows sorted by timestamp, newest first. Ties keep store order.
    pub fn table(&self) -> Vec<HistoryRow> {
        let mut table = self.rows.clone();
        table.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        table
    }

    /// Chart series in store order, not re-sorted.
    pub fn chart(&self) -> impl Iterator<Item = &HistoryRow> {
        self.rows.iter()
    }
}

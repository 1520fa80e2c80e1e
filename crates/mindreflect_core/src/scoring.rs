//! crates/mindreflect_core/src/scoring.rs
//!
//! Maps journal entries onto the 0-5 mood scale used for charting.

use crate::domain::{JournalEntry, Mood, SentimentLabel};
use std::collections::HashMap;
use std::sync::Mutex;

/// Lowest and highest possible mood score.
pub const MIN_SCORE: u8 = 0;
pub const MAX_SCORE: u8 = 5;

/// Score used when an `Other` entry carries a label we cannot interpret.
pub const NEUTRAL_SCORE: u8 = 3;

/// Fixed score for an explicit mood, or `None` for `Mood::Other`.
pub fn fixed_mood_score(mood: Mood) -> Option<u8> {
    match mood {
        Mood::Happy => Some(5),
        Mood::Okay => Some(4),
        Mood::Bored => Some(3),
        Mood::Worried => Some(2),
        Mood::Sad | Mood::Angry => Some(1),
        Mood::Other => None,
    }
}

/// Derives the mood score of an entry.
///
/// Explicit moods use the fixed table. `Other` falls back to the classifier:
/// a positive verdict scores `round(score * 5)`, a negative one
/// `round((1 - score) * 5)`, anything else is neutral.
pub fn mood_score(entry: &JournalEntry) -> u8 {
    if let Some(score) = fixed_mood_score(entry.mood) {
        return score;
    }
    match entry.sentiment {
        SentimentLabel::Positive => scale(entry.score),
        SentimentLabel::Negative => scale(1.0 - entry.score),
        SentimentLabel::Other(_) => NEUTRAL_SCORE,
    }
}

fn scale(confidence: f64) -> u8 {
    let scaled = (confidence * f64::from(MAX_SCORE)).round();
    scaled.clamp(f64::from(MIN_SCORE), f64::from(MAX_SCORE)) as u8
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ScoreKey {
    mood: Mood,
    sentiment: SentimentLabel,
    score_bits: u64,
}

impl From<&JournalEntry> for ScoreKey {
    fn from(entry: &JournalEntry) -> Self {
        Self {
            mood: entry.mood,
            sentiment: entry.sentiment.clone(),
            score_bits: entry.score.to_bits(),
        }
    }
}

/// Memoizes [`mood_score`] keyed on the fields it reads.
#[derive(Debug, Default)]
pub struct MoodScoreCache {
    scores: Mutex<HashMap<ScoreKey, u8>>,
}

impl MoodScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self, entry: &JournalEntry) -> u8 {
        let key = ScoreKey::from(entry);
        // A poisoned lock only means another caller panicked mid-insert; the map is still valid.
        let mut scores = self
            .scores
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *scores.entry(key).or_insert_with(|| mood_score(entry))
    }

    pub fn len(&self) -> usize {
        self.scores
            .lock()
            .map(|scores| scores.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sentiment;
    use chrono::Utc;

    fn entry(mood: Mood, label: SentimentLabel, score: f64) -> JournalEntry {
        JournalEntry::new(Utc::now(), mood, &Sentiment { label, score })
    }

    #[test]
    fn explicit_moods_ignore_sentiment() {
        let expected = [
            (Mood::Happy, 5),
            (Mood::Okay, 4),
            (Mood::Bored, 3),
            (Mood::Worried, 2),
            (Mood::Sad, 1),
            (Mood::Angry, 1),
        ];
        for (mood, score) in expected {
            for label in [SentimentLabel::Positive, SentimentLabel::Negative] {
                for confidence in [0.0, 0.42, 1.0] {
                    assert_eq!(mood_score(&entry(mood, label.clone(), confidence)), score);
                }
            }
        }
    }

    #[test]
    fn other_positive_scales_confidence() {
        assert_eq!(mood_score(&entry(Mood::Other, SentimentLabel::Positive, 0.8)), 4);
        assert_eq!(mood_score(&entry(Mood::Other, SentimentLabel::Positive, 1.0)), 5);
    }

    #[test]
    fn other_negative_inverts_confidence() {
        assert_eq!(mood_score(&entry(Mood::Other, SentimentLabel::Negative, 0.8)), 1);
        assert_eq!(mood_score(&entry(Mood::Other, SentimentLabel::Negative, 1.0)), 0);
    }

    #[test]
    fn halfway_confidence_rounds_up() {
        assert_eq!(mood_score(&entry(Mood::Other, SentimentLabel::Positive, 0.5)), 3);
        assert_eq!(mood_score(&entry(Mood::Other, SentimentLabel::Negative, 0.5)), 3);
    }

    #[test]
    fn other_with_unknown_label_is_neutral() {
        let label = SentimentLabel::Other("NEUTRAL".to_string());
        assert_eq!(mood_score(&entry(Mood::Other, label, 0.99)), NEUTRAL_SCORE);
    }

    #[test]
    fn cache_reuses_identical_inputs() {
        let cache = MoodScoreCache::new();
        let first = entry(Mood::Other, SentimentLabel::Positive, 0.8);
        let same = entry(Mood::Other, SentimentLabel::Positive, 0.8);
        let different = entry(Mood::Happy, SentimentLabel::Positive, 0.8);

        assert_eq!(cache.score(&first), 4);
        assert_eq!(cache.score(&same), 4);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.score(&different), 5);
        assert_eq!(cache.len(), 2);
    }
}

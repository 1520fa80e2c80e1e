//! crates/mindreflect_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any transport or serialization format.

use chrono::{DateTime, Local, Utc};
use std::fmt;
use std::str::FromStr;

/// Display format used for entry timestamps, e.g. `Mar 04, 2025 21:07:33`.
pub const TIMESTAMP_FORMAT: &str = "%b %d, %Y %H:%M:%S";

/// The self-reported mood a user picks when submitting an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mood {
    Happy,
    #[default]
    Okay,
    Sad,
    Angry,
    Worried,
    Bored,
    Other,
}

impl Mood {
    /// All moods in the order they are offered to the user.
    pub const ALL: [Mood; 7] = [
        Mood::Happy,
        Mood::Okay,
        Mood::Sad,
        Mood::Angry,
        Mood::Worried,
        Mood::Bored,
        Mood::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Okay => "Okay",
            Mood::Sad => "Sad",
            Mood::Angry => "Angry",
            Mood::Worried => "Worried",
            Mood::Bored => "Bored",
            Mood::Other => "Other",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown mood: {0}")]
pub struct UnknownMood(pub String);

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownMood(s.to_string()))
    }
}

/// The label a sentiment classifier attached to a block of text.
///
/// Binary classifiers only produce `POSITIVE` / `NEGATIVE`, but any other
/// classifier-defined label is carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Other(String),
}

impl SentimentLabel {
    pub fn as_str(&self) -> &str {
        match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Negative => "NEGATIVE",
            SentimentLabel::Other(label) => label,
        }
    }
}

impl From<&str> for SentimentLabel {
    fn from(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" => SentimentLabel::Positive,
            "NEGATIVE" => SentimentLabel::Negative,
            _ => SentimentLabel::Other(label.trim().to_string()),
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classifier verdict: a label and its confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub score: f64,
}

impl Sentiment {
    /// The confidence rounded to two decimals, as stored on entries.
    pub fn rounded_score(&self) -> f64 {
        (self.score * 100.0).round() / 100.0
    }
}

/// A single journaling submission. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub created_at: DateTime<Utc>,
    /// `created_at` rendered in local time with [`TIMESTAMP_FORMAT`].
    pub timestamp: String,
    pub mood: Mood,
    pub sentiment: SentimentLabel,
    pub score: f64,
}

impl JournalEntry {
    pub fn new(created_at: DateTime<Utc>, mood: Mood, sentiment: &Sentiment) -> Self {
        Self {
            created_at,
            timestamp: format_timestamp(created_at),
            mood,
            sentiment: sentiment.label.clone(),
            score: sentiment.rounded_score(),
        }
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn mood_parses_case_insensitively() {
        assert_eq!("worried".parse::<Mood>(), Ok(Mood::Worried));
        assert_eq!(" Other ".parse::<Mood>(), Ok(Mood::Other));
        assert!("Ecstatic".parse::<Mood>().is_err());
    }

    #[test]
    fn default_mood_is_okay() {
        assert_eq!(Mood::default(), Mood::Okay);
    }

    #[test]
    fn unknown_labels_are_kept_verbatim() {
        assert_eq!(SentimentLabel::from("positive"), SentimentLabel::Positive);
        assert_eq!(
            SentimentLabel::from("NEUTRAL"),
            SentimentLabel::Other("NEUTRAL".to_string())
        );
        assert_eq!(SentimentLabel::from("NEUTRAL").as_str(), "NEUTRAL");
    }

    #[test]
    fn entry_rounds_score_to_two_decimals() {
        let at = Utc.with_ymd_and_hms(2025, 3, 4, 21, 7, 33).unwrap();
        let sentiment = Sentiment {
            label: SentimentLabel::Negative,
            score: 0.98765,
        };
        let entry = JournalEntry::new(at, Mood::Sad, &sentiment);

        assert_eq!(entry.score, 0.99);
        assert_eq!(entry.sentiment, SentimentLabel::Negative);
        assert_eq!(entry.timestamp, format_timestamp(at));
    }
}

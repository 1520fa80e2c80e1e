//! crates/mindreflect_core/src/journal.rs
//!
//! The per-session entry store and the entry submission workflow.

use crate::domain::{JournalEntry, Mood, Sentiment};
use crate::ports::{CoachingService, PortError, SentimentAnalysisService};
use chrono::{DateTime, Utc};

pub const EMPTY_ENTRY_WARNING: &str = "Please write something before submitting.";
pub const SUBMITTED_NOTICE: &str = "Entry submitted.";
pub const NO_ENTRIES_MESSAGE: &str = "No past entries yet. Your journey starts today.";

const COACHING_PROMPT_PREAMBLE: &str = "You are a calm, supportive mental health journaling coach. \
Given the following journal entry, write a short, empathetic message to encourage the user. \
Do not summarize the text; reflect on it like a coach would.";

/// Embeds the raw journal text into the fixed coaching prompt.
pub fn coaching_prompt(journal_text: &str) -> String {
    format!("{COACHING_PROMPT_PREAMBLE}\n\nJournal Entry:\n{journal_text}")
}

#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("{}", EMPTY_ENTRY_WARNING)]
    EmptyEntry,
    #[error("Sentiment analysis failed: {0}")]
    Sentiment(#[source] PortError),
}

/// Append-only, insertion-ordered entries for one session.
#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    entries: Vec<JournalEntry>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: JournalEntry) {
        self.entries.push(entry);
    }

    /// Entries in submission order.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Entries newest first, as the journal page lists them.
    pub fn newest_first(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything the journal page shows after a successful submission.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub entry: JournalEntry,
    pub sentiment: Sentiment,
    /// `None` when the coaching call failed; the entry is stored regardless.
    pub coaching_message: Option<String>,
}

/// Validates and stores one journal entry.
///
/// Whitespace-only text is rejected before any external call. The classifier
/// runs first and its failure aborts the submission; a coaching failure is
/// logged by the caller through the returned `coaching_error`, and the entry
/// is still appended.
pub async fn submit_entry(
    store: &mut EntryStore,
    text: &str,
    mood: Mood,
    now: DateTime<Utc>,
    sentiment_service: &dyn SentimentAnalysisService,
    coaching_service: &dyn CoachingService,
) -> Result<(SubmissionOutcome, Option<PortError>), JournalError> {
    if text.trim().is_empty() {
        return Err(JournalError::EmptyEntry);
    }

    let sentiment = sentiment_service
        .analyze(text)
        .await
        .map_err(JournalError::Sentiment)?;

    let (coaching_message, coaching_error) =
        match coaching_service.generate(&coaching_prompt(text)).await {
            Ok(message) => (Some(message), None),
            Err(e) => (None, Some(e)),
        };

    let entry = JournalEntry::new(now, mood, &sentiment);
    store.append(entry.clone());

    Ok((
        SubmissionOutcome {
            entry,
            sentiment,
            coaching_message,
        },
        coaching_error,
    ))
}

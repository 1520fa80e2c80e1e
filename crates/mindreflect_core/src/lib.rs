pub mod domain;
pub mod history;
pub mod journal;
pub mod ports;
pub mod scoring;
pub mod session;
pub mod timer;

pub use domain::{JournalEntry, Mood, Sentiment, SentimentLabel};
pub use history::{HistoryRow, MoodHistory};
pub use journal::{submit_entry, EntryStore, JournalError, SubmissionOutcome};
pub use ports::{CoachingService, PortError, PortResult, SentimentAnalysisService};
pub use scoring::{mood_score, MoodScoreCache};
pub use session::SessionContext;
pub use timer::{FocusTimer, Tick, TimerError, TimerStatus};

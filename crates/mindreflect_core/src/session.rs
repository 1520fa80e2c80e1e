//! crates/mindreflect_core/src/session.rs
//!
//! The state owned by one user session.

use crate::journal::EntryStore;
use crate::timer::FocusTimer;
use chrono::{DateTime, Utc};

/// Entries and timer for a single session. Created on first access and
/// dropped when the session ends; nothing here outlives the process.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub entries: EntryStore,
    pub timer: FocusTimer,
    pub created_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            entries: EntryStore::new(),
            timer: FocusTimer::new(),
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerStatus;

    #[test]
    fn fresh_session_is_empty_with_idle_timer() {
        let session = SessionContext::new(Utc::now());
        assert!(session.entries.is_empty());
        assert_eq!(session.timer.status(), TimerStatus::Idle);
        assert_eq!(session.timer.remaining_seconds(), 1500);
    }
}

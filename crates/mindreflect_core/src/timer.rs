//! crates/mindreflect_core/src/timer.rs
//!
//! The countdown focus timer. All transitions take the current instant as an
//! argument; callers drive `tick` from a periodic refresh, so precision is only
//! as good as the polling cadence.

use chrono::{DateTime, Utc};
use std::ops::RangeInclusive;

pub const DEFAULT_FOCUS_MINUTES: u32 = 25;
pub const FOCUS_MINUTES_RANGE: RangeInclusive<u32> = 1..=240;

/// Suggested client refresh cadence for the timer view.
pub const REFRESH_INTERVAL_MS: u64 = 1000;

pub const COMPLETION_NOTICE: &str = "Time's up! Time to take a break.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimerError {
    #[error("Focus time must be between 1 and 240 minutes, got {0}")]
    InvalidFocusMinutes(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Expired,
}

impl TimerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
            TimerStatus::Expired => "expired",
        }
    }
}

/// Result of a periodic refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub status: TimerStatus,
    /// Set only on the tick that moved Running to Expired.
    pub completed: bool,
}

impl Tick {
    fn settled(status: TimerStatus) -> Self {
        Self {
            status,
            completed: false,
        }
    }

    /// The notice to show for this tick, if any.
    pub fn notice(&self) -> Option<&'static str> {
        self.completed.then_some(COMPLETION_NOTICE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTimer {
    start_time: Option<DateTime<Utc>>,
    paused: bool,
    pause_time: Option<DateTime<Utc>>,
    remaining_seconds: u32,
    focus_minutes: u32,
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self {
            start_time: None,
            paused: false,
            pause_time: None,
            remaining_seconds: DEFAULT_FOCUS_MINUTES * 60,
            focus_minutes: DEFAULT_FOCUS_MINUTES,
        }
    }
}

impl FocusTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus_minutes(&self) -> u32 {
        self.focus_minutes
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    /// Expired is the resting state after a countdown hits zero, until the
    /// next Start or Reset refills `remaining_seconds`.
    pub fn status(&self) -> TimerStatus {
        match (self.start_time, self.paused) {
            (Some(_), true) => TimerStatus::Paused,
            (Some(_), false) => TimerStatus::Running,
            (None, _) if self.remaining_seconds == 0 => TimerStatus::Expired,
            (None, _) => TimerStatus::Idle,
        }
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_seconds / 60,
            self.remaining_seconds % 60
        )
    }

    /// Changes the configured duration. Only takes effect on the next Start or Reset.
    pub fn set_focus_minutes(&mut self, minutes: u32) -> Result<(), TimerError> {
        if !FOCUS_MINUTES_RANGE.contains(&minutes) {
            return Err(TimerError::InvalidFocusMinutes(minutes));
        }
        self.focus_minutes = minutes;
        Ok(())
    }

    pub fn start(&mut self, now: DateTime<Utc>) {
        self.start_time = Some(now);
        self.paused = false;
        self.pause_time = None;
        self.remaining_seconds = self.total_seconds();
    }

    /// Returns whether the timer actually paused.
    pub fn pause(&mut self, now: DateTime<Utc>) -> bool {
        if self.status() != TimerStatus::Running {
            return false;
        }
        self.paused = true;
        self.pause_time = Some(now);
        true
    }

    /// Shifts `start_time` forward by the paused duration so it is excluded
    /// from elapsed time. Returns whether the timer actually resumed.
    pub fn resume(&mut self, now: DateTime<Utc>) -> bool {
        if self.status() != TimerStatus::Paused {
            return false;
        }
        if let (Some(start), Some(paused_at)) = (self.start_time, self.pause_time) {
            let paused_for = (now - paused_at).max(chrono::Duration::zero());
            self.start_time = Some(start + paused_for);
        }
        self.paused = false;
        self.pause_time = None;
        true
    }

    pub fn reset(&mut self) {
        self.start_time = None;
        self.paused = false;
        self.pause_time = None;
        self.remaining_seconds = self.total_seconds();
    }

    /// Recomputes the remaining time. The tick that reaches zero reports
    /// `completed`; the timer then rests as Expired with no start time.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Tick {
        let Some(start) = self.start_time else {
            return Tick::settled(self.status());
        };
        if self.paused {
            return Tick::settled(TimerStatus::Paused);
        }

        let elapsed = (now - start).num_seconds().max(0);
        let remaining = (i64::from(self.total_seconds()) - elapsed).max(0);
        self.remaining_seconds = u32::try_from(remaining).unwrap_or(0);

        if self.remaining_seconds == 0 {
            self.start_time = None;
            return Tick {
                status: TimerStatus::Expired,
                completed: true,
            };
        }
        Tick::settled(TimerStatus::Running)
    }

    fn total_seconds(&self) -> u32 {
        self.focus_minutes * 60
    }
}

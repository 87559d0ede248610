//! Cooking timer state machine
//!
//! [`CountdownTimer`] holds no clock of its own. Whoever owns it calls
//! [`CountdownTimer::tick`] once per elapsed second while it is running; see
//! `tasks::timer_ticker` for the scheduler used by the server.

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::ValidationError,
    services::{notify_best_effort, LogNotifier, Notifier, TimerAlert},
};

/// Callback fired once when the countdown reaches zero
pub type CompletionCallback = Box<dyn FnOnce(&TimerAlert) + Send>;

/// Callback fired once when the user closes the timer
pub type DismissCallback = Box<dyn FnOnce() + Send>;

/// Remaining time below which the timer is shown as urgent
pub const URGENT_BELOW_SECONDS: u64 = 60;

/// Lifecycle phase of a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Running,
    Paused,
    Completed,
}

/// Result of delivering one tick to a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer is paused, completed or dismissed; nothing changed
    Idle,
    /// One second elapsed; this many remain
    Counting(u64),
    /// This tick brought the countdown to zero
    Completed,
}

/// Format seconds as zero-padded `MM:SS`
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Countdown for a single recipe step
pub struct CountdownTimer {
    step_index: usize,
    minutes: u32,
    remaining_seconds: u64,
    phase: TimerPhase,
    dismissed: bool,
    notifier: Arc<dyn Notifier>,
    on_complete: Option<CompletionCallback>,
    on_dismiss: Option<DismissCallback>,
}

impl fmt::Debug for CountdownTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountdownTimer")
            .field("step_index", &self.step_index)
            .field("minutes", &self.minutes)
            .field("remaining_seconds", &self.remaining_seconds)
            .field("phase", &self.phase)
            .field("dismissed", &self.dismissed)
            .finish_non_exhaustive()
    }
}

impl CountdownTimer {
    /// Create a running timer of `minutes` for the step at `step_index`
    pub fn new(step_index: usize, minutes: u32) -> Result<Self, ValidationError> {
        if minutes == 0 {
            return Err(ValidationError::TimerMinutes);
        }
        Ok(Self {
            step_index,
            minutes,
            remaining_seconds: u64::from(minutes) * 60,
            phase: TimerPhase::Running,
            dismissed: false,
            notifier: Arc::new(LogNotifier),
            on_complete: None,
            on_dismiss: None,
        })
    }

    pub fn on_complete(mut self, callback: impl FnOnce(&TimerAlert) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn on_dismiss(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_dismiss = Some(Box::new(callback));
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.minutes) * 60
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        !self.dismissed && self.phase == TimerPhase::Running
    }

    pub fn is_completed(&self) -> bool {
        self.phase == TimerPhase::Completed
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    /// Less than a minute left on a countdown that has not finished
    pub fn is_urgent(&self) -> bool {
        !self.is_completed() && self.remaining_seconds < URGENT_BELOW_SECONDS
    }

    /// Fraction of the duration that has elapsed, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        let total = self.total_seconds();
        (total - self.remaining_seconds) as f64 / total as f64
    }

    pub fn format_remaining(&self) -> String {
        format_clock(self.remaining_seconds)
    }

    /// Advance the countdown by one second
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Idle;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return TickOutcome::Counting(self.remaining_seconds);
        }

        self.phase = TimerPhase::Completed;
        let alert = TimerAlert::completed(self.step_index, self.minutes);
        info!("Timer for step {} completed", self.step_index + 1);
        notify_best_effort(self.notifier.as_ref(), &alert);
        if let Some(callback) = self.on_complete.take() {
            callback(&alert);
        }
        TickOutcome::Completed
    }

    /// Switch between running and paused. Completed or dismissed timers
    /// stay as they are.
    pub fn toggle(&mut self) -> TimerPhase {
        if self.dismissed {
            return self.phase;
        }
        self.phase = match self.phase {
            TimerPhase::Running => TimerPhase::Paused,
            TimerPhase::Paused => TimerPhase::Running,
            TimerPhase::Completed => TimerPhase::Completed,
        };
        debug!("Timer for step {} is now {:?}", self.step_index + 1, self.phase);
        self.phase
    }

    /// Restore the full duration and pause. Returns false when the timer has
    /// already completed or been dismissed.
    pub fn reset(&mut self) -> bool {
        if self.dismissed || self.is_completed() {
            return false;
        }
        self.remaining_seconds = self.total_seconds();
        self.phase = TimerPhase::Paused;
        debug!("Timer for step {} reset to {}", self.step_index + 1, self.format_remaining());
        true
    }

    /// Close the timer. Fires the dismissal callback the first time only.
    pub fn dismiss(&mut self) {
        if self.dismissed {
            return;
        }
        self.dismissed = true;
        debug!("Timer for step {} dismissed", self.step_index + 1);
        if let Some(callback) = self.on_dismiss.take() {
            callback();
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            step_index: self.step_index,
            minutes: self.minutes,
            remaining_seconds: self.remaining_seconds,
            display: self.format_remaining(),
            phase: self.phase,
            running: self.is_running(),
            completed: self.is_completed(),
            progress: self.progress(),
            urgent: self.is_urgent(),
        }
    }
}

/// Serializable view of a timer for clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub step_index: usize,
    pub minutes: u32,
    pub remaining_seconds: u64,
    pub display: String,
    pub phase: TimerPhase,
    pub running: bool,
    pub completed: bool,
    pub progress: f64,
    pub urgent: bool,
}

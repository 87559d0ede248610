//! Timer completion notifications
//!
//! Notifications are best-effort: a failing notifier is logged and ignored,
//! it never interrupts the countdown.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Alert raised when a cooking timer reaches zero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerAlert {
    pub title: String,
    pub description: String,
    pub step_index: usize,
    pub minutes: u32,
    pub completed_at: DateTime<Utc>,
}

impl TimerAlert {
    pub fn completed(step_index: usize, minutes: u32) -> Self {
        Self {
            title: "Timer Complete!".to_string(),
            description: format!("Your {}-minute timer has finished.", minutes),
            step_index,
            minutes,
            completed_at: Utc::now(),
        }
    }
}

/// Something that can tell the cook a timer finished
pub trait Notifier: Send + Sync {
    fn notify(&self, alert: &TimerAlert) -> anyhow::Result<()>;
}

/// Writes the alert to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, alert: &TimerAlert) -> anyhow::Result<()> {
        info!("{} {} (step {})", alert.title, alert.description, alert.step_index + 1);
        Ok(())
    }
}

/// Rings the terminal bell and logs the alert
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl Notifier for TerminalBell {
    fn notify(&self, alert: &TimerAlert) -> anyhow::Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(b"\x07")?;
        stdout.flush()?;
        LogNotifier.notify(alert)
    }
}

/// Deliver an alert, swallowing any failure
pub fn notify_best_effort(notifier: &dyn Notifier, alert: &TimerAlert) {
    if let Err(e) = notifier.notify(alert) {
        warn!("Timer notification failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl Notifier for Broken {
        fn notify(&self, _alert: &TimerAlert) -> anyhow::Result<()> {
            anyhow::bail!("no audio device")
        }
    }

    #[test]
    fn alert_mentions_duration() {
        let alert = TimerAlert::completed(2, 3);
        assert_eq!(alert.title, "Timer Complete!");
        assert_eq!(alert.description, "Your 3-minute timer has finished.");
        assert_eq!(alert.step_index, 2);
    }

    #[test]
    fn failing_notifier_is_swallowed() {
        notify_best_effort(&Broken, &TimerAlert::completed(0, 1));
        notify_best_effort(&LogNotifier, &TimerAlert::completed(0, 1));
    }
}

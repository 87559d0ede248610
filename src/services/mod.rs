//! Side-effect services module
//!
//! This module contains the notifiers used when a cooking timer finishes.

pub mod notifier;

// Re-export main types
pub use notifier::{notify_best_effort, LogNotifier, Notifier, TerminalBell, TimerAlert};

//! Background tasks module
//!
//! This module contains the timer tick scheduler and the alert listener that
//! run alongside the HTTP server.

pub mod alert_listener;
pub mod timer_ticker;

// Re-export main items
pub use alert_listener::alert_listener_task;
pub use timer_ticker::{timer_tick_task, TickScheduler};

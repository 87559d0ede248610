//! Process-level helpers
//!
//! Currently only graceful-shutdown signal handling.

pub mod signals;

pub use signals::shutdown_signal;

//! Recipe Timer - an in-memory recipe book served over HTTP
//!
//! This library provides the recipe model, the serving-size scaler, the
//! recipe editor draft and the per-step cooking timer state machine, plus
//! the HTTP API and background tasks that drive them.

pub mod api;
pub mod config;
pub mod error;
pub mod recipe;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{AppError, ValidationError};
pub use state::AppState;
pub use utils::signals::shutdown_signal;

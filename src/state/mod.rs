//! State management module
//!
//! This module contains the cooking timer state machine, the recipe view
//! that owns it, and the application state shared by the HTTP handlers.

pub mod app_state;
pub mod recipe_view;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, EditorSession, ScaledRecipe, Screen, Session, SessionStatus};
pub use recipe_view::{RecipeView, ViewSnapshot};
pub use timer_state::{format_clock, CountdownTimer, TickOutcome, TimerPhase, TimerSnapshot};

//! Error types shared by the recipe book, the editor and the timer

use thiserror::Error;

/// Input that was rejected before it could reach the recipe book or a timer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("serving count must be at least 1, got {0}")]
    Servings(u32),

    #[error("timer duration must be at least 1 minute")]
    TimerMinutes,

    #[error("ingredient '{name}' has invalid quantity {quantity}")]
    Quantity { name: String, quantity: f64 },

    #[error("recipe title must not be empty")]
    EmptyTitle,

    #[error("recipe description must not be empty")]
    EmptyDescription,
}

/// Errors surfaced by application state operations
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("recipe not found: {0}")]
    RecipeNotFound(String),

    #[error("no recipe is being viewed")]
    NotViewing,

    #[error("no timer is active")]
    NoActiveTimer,

    #[error("step {0} has no timer")]
    NoTimerForStep(usize),

    #[error("step {index} is out of range (recipe has {len} steps)")]
    StepOutOfRange { index: usize, len: usize },

    #[error("{kind} row {index} is out of range (draft has {len})")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    #[error("no recipe draft is open")]
    NoDraft,

    #[error("invalid request: {0}")]
    BadRequest(String),

    #[error("failed to lock {0}")]
    Lock(&'static str),
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

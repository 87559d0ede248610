//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod extract;
pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Recipe book
        .route("/recipes", get(list_recipes_handler))
        .route("/recipes/:id", get(get_recipe_handler))
        .route("/recipes/:id/scaled", get(scaled_recipe_handler))
        .route("/recipes/:id/view", post(open_view_handler))
        .route("/recipes/:id/edit", post(edit_draft_handler))
        // Recipe view and its timer
        .route("/view", get(view_handler).delete(close_view_handler))
        .route("/view/servings", post(servings_handler))
        .route("/view/steps/:step/timer", post(start_timer_handler))
        .route("/view/timer/toggle", post(toggle_timer_handler))
        .route("/view/timer/reset", post(reset_timer_handler))
        .route("/view/timer/close", post(close_timer_handler))
        .route("/view/timer/stream", get(timer_stream_handler))
        // Editor
        .route(
            "/editor",
            get(draft_handler).post(new_draft_handler).delete(discard_draft_handler),
        )
        .route("/editor/actions", post(editor_action_handler))
        .route("/editor/submit", post(submit_draft_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

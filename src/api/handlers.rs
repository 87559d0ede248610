//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::{stream, Stream};
use tracing::{info, warn};

use crate::{
    error::AppError,
    recipe::{EditorAction, Recipe, RecipeCard, RecipeId},
    state::{AppState, EditorSession, ScaledRecipe, ViewSnapshot},
};
use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::responses::{
    ApiResponse, HealthResponse, ScaleQuery, ServingsRequest, StatusResponse, TimerResponse,
};

type ApiResult<T> = Result<Json<T>, AppError>;

/// Handle GET /recipes - List recipe cards
pub async fn list_recipes_handler(State(state): State<Arc<AppState>>) -> ApiResult<Vec<RecipeCard>> {
    Ok(Json(state.list_recipes()?))
}

/// Handle GET /recipes/:id - Return one recipe
pub async fn get_recipe_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Recipe> {
    Ok(Json(state.get_recipe(&RecipeId(id))?))
}

/// Handle GET /recipes/:id/scaled?servings=N - Scale a recipe's ingredients
pub async fn scaled_recipe_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
    ApiQuery(query): ApiQuery<ScaleQuery>,
) -> ApiResult<ScaledRecipe> {
    Ok(Json(state.scaled_recipe(&RecipeId(id), query.servings)?))
}

/// Handle POST /recipes/:id/view - Open the recipe view
pub async fn open_view_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<ApiResponse<ViewSnapshot>> {
    let snapshot = state.open_view(&RecipeId(id))?;
    Ok(Json(ApiResponse::ok("Viewing recipe", snapshot)))
}

/// Handle GET /view - Current view with scaled ingredients and timer
pub async fn view_handler(State(state): State<Arc<AppState>>) -> ApiResult<ViewSnapshot> {
    Ok(Json(state.view_snapshot()?))
}

/// Handle DELETE /view - Back to the recipe list
pub async fn close_view_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse<()>> {
    state.close_view()?;
    Ok(Json(ApiResponse::done("Returned to recipe list")))
}

/// Handle POST /view/servings - Change the target serving count
pub async fn servings_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<ServingsRequest>,
) -> ApiResult<ApiResponse<ViewSnapshot>> {
    let snapshot = state.set_servings(request.servings)?;
    info!("Servings set to {}", request.servings);
    Ok(Json(ApiResponse::ok("Servings updated", snapshot)))
}

/// Handle POST /view/steps/:step/timer - Start the timer of a step
pub async fn start_timer_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(step): ApiPath<usize>,
) -> ApiResult<TimerResponse> {
    let snapshot = state.start_timer(step)?;
    Ok(Json(ApiResponse::ok("Timer started", snapshot)))
}

/// Handle POST /view/timer/toggle - Pause or resume the active timer
pub async fn toggle_timer_handler(State(state): State<Arc<AppState>>) -> ApiResult<TimerResponse> {
    let snapshot = state.toggle_timer()?;
    let message = if snapshot.running { "Timer resumed" } else { "Timer paused" };
    Ok(Json(ApiResponse::ok(message, snapshot)))
}

/// Handle POST /view/timer/reset - Reset the active timer (paused)
pub async fn reset_timer_handler(State(state): State<Arc<AppState>>) -> ApiResult<TimerResponse> {
    let snapshot = state.reset_timer()?;
    Ok(Json(ApiResponse::ok("Timer reset", snapshot)))
}

/// Handle POST /view/timer/close - Dismiss the active timer
pub async fn close_timer_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse<()>> {
    state.close_timer()?;
    Ok(Json(ApiResponse::done("Timer closed")))
}

/// Handle POST /editor - Open a blank draft
pub async fn new_draft_handler(State(state): State<Arc<AppState>>) -> ApiResult<EditorSession> {
    Ok(Json(state.open_editor(None)?))
}

/// Handle POST /recipes/:id/edit - Open a draft of an existing recipe
pub async fn edit_draft_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<EditorSession> {
    Ok(Json(state.open_editor(Some(&RecipeId(id)))?))
}

/// Handle GET /editor - Current draft
pub async fn draft_handler(State(state): State<Arc<AppState>>) -> ApiResult<EditorSession> {
    Ok(Json(state.editor()?))
}

/// Handle POST /editor/actions - Apply one edit to the draft
pub async fn editor_action_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(action): ApiJson<EditorAction>,
) -> ApiResult<EditorSession> {
    Ok(Json(state.apply_editor_action(action)?))
}

/// Handle POST /editor/submit - Save the draft
pub async fn submit_draft_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse<Recipe>> {
    let recipe = state.submit_editor()?;
    Ok(Json(ApiResponse::ok("Recipe saved", recipe)))
}

/// Handle DELETE /editor - Discard the draft
pub async fn discard_draft_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse<()>> {
    state.discard_editor()?;
    Ok(Json(ApiResponse::done("Draft discarded")))
}

/// Handle GET /view/timer/stream - Server-sent events with every timer change
///
/// The first event carries the current snapshot; `null` means no timer is active.
pub async fn timer_stream_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let updates = state.subscribe_timer();
    let events = stream::unfold((updates, true), |(mut updates, first)| async move {
        if !first && updates.changed().await.is_err() {
            return None;
        }
        let snapshot = updates.borrow_and_update().clone();
        let event = Event::default()
            .event("timer")
            .json_data(&snapshot)
            .unwrap_or_else(|e| {
                warn!("Failed to encode timer snapshot: {}", e);
                Event::default().event("timer").data("null")
            });
        Some((Ok(event), (updates, false)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /status - Return current session status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> ApiResult<StatusResponse> {
    let session = state.status()?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        session,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

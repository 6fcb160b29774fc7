//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::{
    display::RenderedView,
    state::{AppState, Mode, SettingsForm, TimerSnapshot},
};
use super::responses::{ApiResponse, ErrorResponse, HealthResponse, StatusResponse};

fn respond(state: &AppState, message: String, timer: TimerSnapshot) -> Json<ApiResponse> {
    let display = state.presenter.present(&timer);
    Json(ApiResponse::ok(message, timer, display))
}

/// Handle POST /mode/:mode - Select an interval mode
pub async fn mode_handler(
    State(state): State<Arc<AppState>>,
    Path(mode_key): Path<String>,
) -> Result<Json<ApiResponse>, (StatusCode, Json<ErrorResponse>)> {
    let mode = mode_key.parse::<Mode>().map_err(|e| {
        // The UI only ever sends known mode ids; anything else is a host bug
        error!("Rejected mode selection: {}", e);
        (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string())))
    })?;

    let timer = state.select_mode(mode);
    Ok(respond(&state, format!("Switched to {} mode", mode), timer))
}

/// Handle POST /toggle - Start or pause the timer
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let timer = state.toggle_start_pause();
    let message = if timer.is_running { "Timer started" } else { "Timer paused" };
    info!("Toggle endpoint called - {}", message.to_lowercase());
    respond(&state, message.to_string(), timer)
}

/// Handle GET /settings - Current settings, as the form shows them
pub async fn settings_handler(State(state): State<Arc<AppState>>) -> Json<SettingsForm> {
    Json(state.settings_form())
}

/// Handle POST /settings - Validate and apply submitted settings
pub async fn submit_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SettingsForm>,
) -> Json<ApiResponse> {
    let timer = state.submit_settings(form);
    respond(&state, "Settings applied".to_string(), timer)
}

/// Handle POST /settings/open - Show the settings panel, pausing a running timer
pub async fn open_settings_handler(State(state): State<Arc<AppState>>) -> Json<SettingsForm> {
    let settings = state.open_settings_panel();
    Json(SettingsForm::from(&settings))
}

/// Handle POST /settings/close - Hide the settings panel, resuming if it paused the timer
pub async fn close_settings_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let timer = state.close_settings_panel();
    respond(&state, "Settings panel closed".to_string(), timer)
}

/// Handle GET /display - Latest frame produced by the render task
pub async fn display_handler(State(state): State<Arc<AppState>>) -> Json<RenderedView> {
    Json(state.frames.current())
}

/// Handle GET /status - Check current timer and panel state
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: state.engine.snapshot(),
        settings_panel: state.settings_panel(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

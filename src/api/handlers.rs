//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json,
    },
};
use tokio_stream::{wrappers::BroadcastStream, StreamExt as _};
use tracing::{error, info, warn};

use crate::{
    engine::{TimerConfig, TimerEvent, TimerSnapshot},
    error::AppError,
    state::AppState,
};
use super::responses::{
    format_mm_ss, ApiResponse, AvailableActions, ConfigureRequest, HealthResponse, StatusResponse,
};

type OperationResult = Result<(Option<TimerEvent>, TimerSnapshot), AppError>;

/// Turn the outcome of a timer operation into a response
fn respond(operation: &str, result: OperationResult) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok((Some(event), snapshot)) => {
            info!("{} endpoint called - {}", operation, event.name());
            Ok(Json(ApiResponse::applied(
                format!("Timer {}", event.name().replace('_', " ")),
                snapshot,
            )))
        }
        Ok((None, snapshot)) => {
            info!("{} endpoint called - ignored in {}", operation, snapshot.phase);
            Ok(Json(ApiResponse::ignored(
                format!("Cannot {} while {}", operation, describe(&snapshot)),
                snapshot,
            )))
        }
        Err(e) => {
            error!("Failed to {} timer: {}", operation, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn describe(snapshot: &TimerSnapshot) -> &'static str {
    if !snapshot.running {
        "idle"
    } else if snapshot.paused {
        "paused"
    } else {
        "running"
    }
}

/// Handle POST /start - Begin a sitting phase
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("start", state.start())
}

/// Handle POST /pause - Freeze the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("pause", state.pause())
}

/// Handle POST /resume - Continue a paused countdown
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("resume", state.resume())
}

/// Handle POST /stop - Return to idle
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("stop", state.stop())
}

/// Handle POST /restart - Start over from a full sitting phase
pub async fn restart_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    respond("restart", state.restart())
}

/// Handle GET /preferences - Current interval lengths
pub async fn get_preferences_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerConfig>, StatusCode> {
    state.config().map(Json).map_err(|e| {
        error!("Failed to get timer config: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle PUT /preferences - Change interval lengths
pub async fn put_preferences_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConfigureRequest>,
) -> Result<(StatusCode, Json<ApiResponse>), StatusCode> {
    let (current, snapshot) = match (state.config(), state.snapshot()) {
        (Ok(config), Ok(snapshot)) => (config, snapshot),
        (Err(e), _) | (_, Err(e)) => {
            error!("Failed to read timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let config = match request.apply_to(current) {
        Ok(config) => config,
        Err(message) => {
            warn!("Rejected preferences update: {}", message);
            return Ok((StatusCode::BAD_REQUEST, Json(ApiResponse::error(message, snapshot))));
        }
    };

    respond("configure", state.configure(config)).map(|json| (StatusCode::OK, json))
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let snapshot = match state.snapshot() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get timer snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let config = match state.config() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to get timer config: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        status: snapshot.phase.to_string(),
        remaining: format_mm_ss(snapshot.remaining_seconds),
        remaining_seconds: snapshot.remaining_seconds,
        running: snapshot.running,
        paused: snapshot.paused,
        config,
        actions: AvailableActions::for_snapshot(&snapshot),
        uptime: state.get_uptime(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - SSE stream of timer events
pub async fn events_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stream = BroadcastStream::new(state.subscribe()).filter_map(|msg| {
        let event = msg.ok()?;
        Event::default()
            .event(event.name())
            .json_data(&event)
            .ok()
            .map(Ok::<Event, Infallible>)
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

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
        .route("/start", post(start_handler))
        .route("/pause", post(pause_handler))
        .route("/resume", post(resume_handler))
        .route("/stop", post(stop_handler))
        .route("/restart", post(restart_handler))
        .route(
            "/preferences",
            get(get_preferences_handler).put(put_preferences_handler),
        )
        .route("/status", get(status_handler))
        .route("/events", get(events_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{
        engine::TimerConfig,
        state::EffectQueues,
    };

    fn app(sit: u32, stand: u32) -> (Router, Arc<AppState>, EffectQueues) {
        let (state, queues) = AppState::new(0, "127.0.0.1".to_string(), TimerConfig::new(sit, stand));
        let state = Arc::new(state);
        (create_router(Arc::clone(&state)), state, queues)
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn status_reports_idle_with_formatted_time() {
        let (router, _state, _queues) = app(25, 5);
        let (status, body) = send(&router, "GET", "/status", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "Idle");
        assert_eq!(body["remaining"], "00:00");
        assert_eq!(body["actions"]["start"], true);
        assert_eq!(body["actions"]["stop"], false);
        assert_eq!(body["config"]["sit_minutes"], 25);
    }

    #[tokio::test]
    async fn start_then_status_shows_sitting() {
        let (router, _state, mut queues) = app(25, 5);

        let (status, body) = send(&router, "POST", "/start", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "applied");
        assert_eq!(body["timer"]["phase"], "Sitting");

        let (_, body) = send(&router, "GET", "/status", None).await;
        assert_eq!(body["status"], "Sitting");
        assert_eq!(body["remaining"], "25:00");
        assert_eq!(body["actions"]["pause"], true);
        assert_eq!(body["last_action"], "start");

        assert_eq!(queues.persist_rx.try_recv().unwrap(), TimerConfig::new(25, 5));
    }

    #[tokio::test]
    async fn pause_while_idle_is_ignored() {
        let (router, state, _queues) = app(25, 5);
        let (status, body) = send(&router, "POST", "/pause", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ignored");
        assert!(!state.snapshot().unwrap().running);
    }

    #[tokio::test]
    async fn pause_resume_stop_cycle() {
        let (router, state, _queues) = app(25, 5);
        send(&router, "POST", "/start", None).await;

        let (_, body) = send(&router, "POST", "/pause", None).await;
        assert_eq!(body["timer"]["paused"], true);

        let (_, body) = send(&router, "GET", "/status", None).await;
        assert_eq!(body["actions"]["resume"], true);
        assert_eq!(body["actions"]["pause"], false);

        let (_, body) = send(&router, "POST", "/resume", None).await;
        assert_eq!(body["timer"]["paused"], false);

        let (_, body) = send(&router, "POST", "/stop", None).await;
        assert_eq!(body["timer"]["phase"], "Idle");
        assert!(!state.snapshot().unwrap().running);
    }

    #[tokio::test]
    async fn put_preferences_updates_config() {
        let (router, _state, mut queues) = app(25, 5);

        let (status, _) = send(&router, "PUT", "/preferences", Some(json!({"sit_minutes": 40}))).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&router, "GET", "/preferences", None).await;
        assert_eq!(body, json!({"sit_minutes": 40, "stand_minutes": 5}));

        // Configuring alone does not persist
        assert!(queues.persist_rx.try_recv().is_err());

        send(&router, "POST", "/restart", None).await;
        assert_eq!(queues.persist_rx.try_recv().unwrap(), TimerConfig::new(40, 5));
    }

    #[tokio::test]
    async fn put_preferences_rejects_negative_values() {
        let (router, state, _queues) = app(25, 5);

        let (status, body) =
            send(&router, "PUT", "/preferences", Some(json!({"stand_minutes": -5}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert_eq!(state.config().unwrap(), TimerConfig::new(25, 5));
    }

    #[tokio::test]
    async fn put_preferences_rejects_non_integers() {
        let (router, state, _queues) = app(25, 5);

        let (status, _) =
            send(&router, "PUT", "/preferences", Some(json!({"sit_minutes": "ten"}))).await;
        assert!(status.is_client_error());

        let (status, _) =
            send(&router, "PUT", "/preferences", Some(json!({"sit_minutes": 2.5}))).await;
        assert!(status.is_client_error());
        assert_eq!(state.config().unwrap(), TimerConfig::new(25, 5));
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (router, _state, _queues) = app(25, 5);
        let (status, body) = send(&router, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}

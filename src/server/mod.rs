//! Webhook boundary
//!
//! A small axum server exposing the game-event ingestion endpoint and a
//! health probe. The event handler always acks valid JSON with 200 even
//! when the event is unknown or its announcement fails downstream; only
//! a missing or non-object JSON body earns a 400.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::dispatch::EventDispatcher;
use crate::error::Result;

// ============================================================================
// State and response envelopes
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    dispatcher: Arc<EventDispatcher>,
    started_at: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(dispatcher: Arc<EventDispatcher>) -> Self {
        Self {
            dispatcher,
            started_at: Instant::now(),
        }
    }
}

#[derive(Debug, Serialize)]
struct EventAck {
    ok: bool,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_secs: u64,
}

// ============================================================================
// Router and handlers
// ============================================================================

/// Build the webhook router.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/event", post(handle_event))
        .route("/api/health", get(handle_health))
        .with_state(state);

    if config.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    if config.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

async fn handle_event(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(value)) if value.is_object() => value,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: String::from("Invalid request: JSON body required"),
                }),
            )
                .into_response();
        }
    };

    state.dispatcher.dispatch(&body).await;
    Json(EventAck { ok: true }).into_response()
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

/// Bind and serve until the shutdown future resolves.
pub async fn serve(
    config: &ServerConfig,
    dispatcher: Arc<EventDispatcher>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let router = build_router(AppState::new(dispatcher), config);
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    info!(addr = %config.bind_address, "Webhook server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Webhook server stopped");
    Ok(())
}

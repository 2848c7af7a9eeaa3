//! HTTP routes.
//!
//! | route | auth | purpose |
//! |-------|------|---------|
//! | `POST /api/update-data` | secret in body | action endpoint |
//! | `POST /` | secret in body | alias of the action endpoint |
//! | `GET /health` | none | store connectivity probe, 503 when not healthy |
//! | `GET /metrics` | none | request counters |

use crate::domain::config::GatewayConfig;
use crate::domain::error::ApiError;
use crate::middleware::{
    create_cors_layer, record_action, GatewayMetrics, RequestTimer, TimeoutLayer, TracingLayer,
};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use lg_03_dispatcher::{Action, ActionHandler, ActionRequest, DispatchError};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceBuilder;

/// Path of the action endpoint.
pub const ACTION_PATH: &str = "/api/update-data";

/// Shared state of every route.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<dyn ActionHandler>,
    pub metrics: Arc<GatewayMetrics>,
}

/// Build the gateway router with its middleware stack.
pub fn build_router(
    handler: Arc<dyn ActionHandler>,
    metrics: Arc<GatewayMetrics>,
    config: &GatewayConfig,
) -> Router {
    let state = AppState {
        handler,
        metrics: Arc::clone(&metrics),
    };

    let middleware = ServiceBuilder::new()
        .layer(create_cors_layer(&config.cors))
        .layer(TracingLayer::new())
        .layer(TimeoutLayer::new(&config.timeouts).with_metrics(metrics));

    Router::new()
        .route(ACTION_PATH, post(handle_action))
        .route("/", post(handle_action))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_snapshot))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
        .layer(middleware)
        .with_state(state)
}

/// Run one action from a JSON body.
async fn handle_action(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            state.metrics.record_request(false, false, 0);
            return ApiError::unreadable_body(rejection.status(), rejection.body_text())
                .into_response();
        }
    };
    let request: ActionRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            state.metrics.record_request(false, false, 0);
            return ApiError::malformed_body(e.to_string()).into_response();
        }
    };

    record_action(request.action.trim());
    let is_write = Action::lookup(request.action.trim()).is_some_and(|a| a.info().is_write);
    let timer = RequestTimer::new(Arc::clone(&state.metrics), is_write);

    match state.handler.dispatch(request).await {
        Ok(reply) => {
            timer.finish(true);
            success_response(StatusCode::OK, true, &reply)
        }
        Err(err) => {
            timer.finish(false);
            state.metrics.record_failure(&err);
            ApiError::from(err).into_response()
        }
    }
}

async fn health_check(State(state): State<AppState>) -> Response {
    let report = state.handler.health().await;
    let healthy = report.is_healthy();
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    success_response(status, healthy, &report)
}

async fn metrics_snapshot(State(state): State<AppState>) -> Json<Value> {
    Json(state.metrics.to_json())
}

async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "NotFound", "No such route")
}

/// Serialize `payload` and merge `"success"` into the top-level object.
fn success_response<T: Serialize>(status: StatusCode, success: bool, payload: &T) -> Response {
    match serde_json::to_value(payload) {
        Ok(Value::Object(mut fields)) => {
            fields.insert("success".into(), Value::Bool(success));
            (status, Json(Value::Object(fields))).into_response()
        }
        Ok(other) => (
            status,
            Json(serde_json::json!({ "success": success, "data": other })),
        )
            .into_response(),
        Err(e) => ApiError::from(DispatchError::Internal(format!(
            "failed to encode reply: {e}"
        )))
        .into_response(),
    }
}

//! HTTP surface: a single `POST /tv` endpoint served with axum.

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use tracing::{Instrument, debug, info, info_span, warn};
use tvgate_core::error::GatewayError;
use uuid::Uuid;

use crate::pipeline::Pipeline;

/// Error wrapper that renders a [`GatewayError`] as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub GatewayError);

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({"ok": false, "error": self.0.to_string()}))).into_response()
    }
}

/// Create the axum router.
pub fn create_router(pipeline: Arc<Pipeline>) -> Router {
    Router::new().route("/tv", post(tv_webhook)).layer(TraceLayer::new_for_http()).with_state(pipeline)
}

/// POST /tv
async fn tv_webhook(
    State(pipeline): State<Arc<Pipeline>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let span = info_span!("tv", request_id = %Uuid::new_v4());
    async move {
        let content_type = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()).unwrap_or("-");
        debug!(content_type, len = body.len(), "webhook received");

        match pipeline.handle(&body).await {
            Ok(outcome) => {
                let json = outcome.to_json();
                info!(mode = json["mode"].as_str().unwrap_or("-"), "webhook handled");
                Ok(Json(json))
            }
            Err(err) => {
                warn!(status = err.status_code(), "webhook failed: {err}");
                Err(ApiError(err))
            }
        }
    }
    .instrument(span)
    .await
}

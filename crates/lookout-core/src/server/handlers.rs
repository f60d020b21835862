//! HTTP handlers for the relay endpoints.
//!
//! Every model outcome, including failures, is answered with HTTP 200 and a
//! JSON string body. A body that cannot be read (400, or 413 over the size
//! limit) or is not a JSON object (400) is also answered with a JSON string.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::Json,
};
use serde::de::DeserializeOwned;

use super::routes::AppState;
use crate::types::{AnalysisRequest, ValidationRequest};

type Rejection = (StatusCode, Json<String>);

fn reject(status: StatusCode, detail: impl std::fmt::Display) -> Rejection {
    tracing::warn!("Rejected request body ({status}): {detail}");
    (status, Json(format!("Error: Invalid request body - {detail}")))
}

/// Parse the body as a JSON object whatever the `Content-Type` header says.
fn parse_body<T: DeserializeOwned>(body: Result<Bytes, BytesRejection>) -> Result<T, Rejection> {
    let body = body.map_err(|rejection| reject(rejection.status(), rejection.body_text()))?;

    let value: serde_json::Value =
        serde_json::from_slice(&body).map_err(|e| reject(StatusCode::BAD_REQUEST, e))?;
    if !value.is_object() {
        return Err(reject(StatusCode::BAD_REQUEST, "expected a JSON object"));
    }
    serde_json::from_value(value).map_err(|e| reject(StatusCode::BAD_REQUEST, e))
}

/// `POST /analyze_screenshot`
pub async fn analyze_screenshot(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<String>, Rejection> {
    let request: AnalysisRequest = parse_body(body)?;
    let reply = state.relay.analyze_screenshot(&request).await;
    Ok(Json(reply.into_text()))
}

/// `POST /validate_reason`
pub async fn validate_reason(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<String>, Rejection> {
    let request: ValidationRequest = parse_body(body)?;
    let reply = state.relay.validate_reason(&request).await;
    Ok(Json(reply.into_text()))
}

/// `GET /health`
pub async fn health() -> Json<&'static str> {
    Json("ok")
}

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use ab_domain::error::Error;

use crate::api::request;
use crate::pipeline;
use crate::state::AppState;

/// Single entry point for every path and method.
///
/// `OPTIONS` is answered immediately; anything else is treated as a turn
/// request.
pub async fn handle(State(state): State<AppState>, method: Method, body: Bytes) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    let req = match request::parse_body(&body).and_then(|b| request::to_turn_request(&b)) {
        Ok(req) => req,
        Err(e) => return error_response(&e),
    };

    match pipeline::execute(&state, req).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Validation problems echo their message with 400; everything else is
/// logged in full and flattened to a generic 500.
fn error_response(e: &Error) -> Response {
    match e {
        Error::Validation(msg) => {
            tracing::info!(error = %msg, "rejected request");
            (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
        }
        other => {
            tracing::error!(error = %other, detail = ?other, kind = other.kind(), "request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response()
        }
    }
}

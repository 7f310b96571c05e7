pub mod handler;
pub mod request;

use axum::http::{header, HeaderValue};
use axum::routing::any;
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_HEADERS: &str =
    "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token";
pub const ALLOW_METHODS: &str = "OPTIONS,POST";

/// Build the router: one handler on every path, CORS headers on every
/// response (including errors and preflights).
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", any(handler::handle))
        .fallback(handler::handle)
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

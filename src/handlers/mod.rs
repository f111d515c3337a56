//! HTTP request handlers for the meteoport API.
//!
//! This module contains all the endpoint handlers for the web server, the
//! router that wires them up, and the mapping from engine errors to HTTP
//! status codes.

pub mod airports;
pub mod heartbeat;
pub mod stats;
pub mod weather;

pub use airports::{
    add_airport_handler, create_airport_handler, delete_airport_handler, get_airport_handler,
    list_airports_handler, ping_handler,
};
pub use heartbeat::heartbeat_handler;
pub use stats::stats_handler;
pub use weather::{own_weather_handler, update_weather_handler, weather_around_handler};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::error::MeteoportError;
use crate::logging::{create_http_trace_layer, log_request_error};
use crate::state::AppState;

/// Build the application router over shared state
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/airports",
            get(list_airports_handler)
                .post(create_airport_handler)
                .head(ping_handler),
        )
        .route(
            "/airports/:iata",
            get(get_airport_handler).delete(delete_airport_handler),
        )
        .route(
            "/airports/:iata/weather",
            put(update_weather_handler).get(own_weather_handler),
        )
        .route("/airports/:iata/weather/:radius", get(weather_around_handler))
        .route("/airports/:iata/:lat/:long", post(add_airport_handler))
        .route("/airports/stats", get(stats_handler))
        .route("/heartbeat", get(heartbeat_handler))
        .layer(create_http_trace_layer())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// HTTP status for an engine error
pub fn error_status(error: &MeteoportError) -> StatusCode {
    match error {
        MeteoportError::Conflict { .. } => StatusCode::CONFLICT,
        MeteoportError::NotFound { .. } => StatusCode::NOT_FOUND,
        MeteoportError::OutOfRange { .. }
        | MeteoportError::InvalidInput { .. }
        | MeteoportError::Json(_) => StatusCode::BAD_REQUEST,
        MeteoportError::Config { .. }
        | MeteoportError::Io(_)
        | MeteoportError::Server { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Log a failed request and render it as a JSON error body
pub(crate) fn error_response(
    error: MeteoportError,
    endpoint: &str,
    request_id: &str,
    params: Option<&str>,
) -> Response {
    log_request_error(&error, endpoint, request_id, params);

    (
        error_status(&error),
        Json(serde_json::json!({
            "error": error.to_string(),
            "request_id": request_id
        })),
    )
        .into_response()
}

//! Weather reading and radius query endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::error_response;
use crate::error::{MeteoportError, Result};
use crate::logging::generate_request_id;
use crate::model::DataPoint;
use crate::state::AppState;

/// Handle PUT /airports/:iata/weather
pub async fn update_weather_handler(
    State(state): State<Arc<AppState>>,
    Path(iata): Path<String>,
    body: String,
) -> Response {
    let request_id = generate_request_id();

    debug!(
        endpoint = "/airports/:iata/weather",
        request_id = %request_id,
        iata = %iata,
        "Processing weather update"
    );

    match DataPoint::from_json(&body).and_then(|point| state.service.update_weather(&iata, point)) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => error_response(
            error,
            "/airports/:iata/weather",
            &request_id,
            Some(&format!("iata={}, body={}", iata, body)),
        ),
    }
}

/// Parse the radius path segment. A blank radius means 0.
fn parse_radius(radius: &str) -> Result<f64> {
    let radius = radius.trim();
    if radius.is_empty() {
        return Ok(0.0);
    }

    radius
        .parse::<f64>()
        .map_err(|_| MeteoportError::invalid(format!("Invalid radius: '{}'", radius)))
}

/// Handle GET /airports/:iata/weather/:radius
pub async fn weather_around_handler(
    State(state): State<Arc<AppState>>,
    Path((iata, radius)): Path<(String, String)>,
) -> Response {
    answer_weather_query(&state, &iata, &radius)
}

/// Handle GET /airports/:iata/weather, a query with the radius left out
pub async fn own_weather_handler(
    State(state): State<Arc<AppState>>,
    Path(iata): Path<String>,
) -> Response {
    answer_weather_query(&state, &iata, "")
}

fn answer_weather_query(state: &AppState, iata: &str, radius: &str) -> Response {
    let request_id = generate_request_id();
    let start_time = Instant::now();

    debug!(
        endpoint = "/airports/:iata/weather/:radius",
        request_id = %request_id,
        iata = %iata,
        radius = %radius,
        "Processing weather query"
    );

    let result =
        parse_radius(radius).and_then(|radius_km| state.service.weather_around(iata, radius_km));

    match result {
        Ok(records) => {
            info!(
                endpoint = "/airports/:iata/weather/:radius",
                request_id = %request_id,
                duration_us = start_time.elapsed().as_micros() as u64,
                record_count = records.len(),
                "Weather query successful"
            );
            Json(records).into_response()
        }
        Err(error) => error_response(
            error,
            "/airports/:iata/weather/:radius",
            &request_id,
            Some(&format!("iata={}, radius={}", iata, radius)),
        ),
    }
}

//! Airport registry endpoint handlers.
//!
//! Create, read, list and delete airports, plus the liveness ping used by
//! collection sites.

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
use crate::model::{Airport, NewAirport};
use crate::state::AppState;

/// Handle HEAD /airports
pub async fn ping_handler() -> StatusCode {
    StatusCode::OK
}

/// Handle GET /airports
pub async fn list_airports_handler(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    let codes = state.service.airport_codes();
    debug!(
        endpoint = "/airports",
        count = codes.len(),
        "Listed airports"
    );
    Json(codes)
}

/// Handle GET /airports/:iata
pub async fn get_airport_handler(
    State(state): State<Arc<AppState>>,
    Path(iata): Path<String>,
) -> Response {
    let request_id = generate_request_id();

    match state.service.airport(&iata) {
        Ok(airport) => Json(airport).into_response(),
        Err(error) => error_response(error, "/airports/:iata", &request_id, Some(&iata)),
    }
}

/// Decode an airport description submitted as JSON
fn parse_airport(body: &str) -> Result<Airport> {
    let draft: NewAirport =
        serde_json::from_str(body).map_err(|e| MeteoportError::invalid(e.to_string()))?;
    Airport::new(draft)
}

/// Handle POST /airports
pub async fn create_airport_handler(State(state): State<Arc<AppState>>, body: String) -> Response {
    let request_id = generate_request_id();
    let start_time = Instant::now();

    debug!(
        endpoint = "/airports",
        request_id = %request_id,
        "Processing airport creation"
    );

    match parse_airport(&body).and_then(|airport| state.service.create_airport(airport)) {
        Ok(()) => {
            info!(
                endpoint = "/airports",
                request_id = %request_id,
                duration_us = start_time.elapsed().as_micros() as u64,
                "Airport created"
            );
            StatusCode::CREATED.into_response()
        }
        Err(error) => error_response(error, "/airports", &request_id, Some(&body)),
    }
}

fn parse_coordinate(value: &str, name: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| MeteoportError::invalid(format!("Invalid {}: '{}'", name, value)))
}

/// Handle POST /airports/:iata/:lat/:long
///
/// Kept for collectors that register airports by position only.
pub async fn add_airport_handler(
    State(state): State<Arc<AppState>>,
    Path((iata, lat, long)): Path<(String, String, String)>,
) -> Response {
    let request_id = generate_request_id();
    let params = format!("iata={}, lat={}, long={}", iata, lat, long);

    let result = parse_coordinate(&lat, "latitude").and_then(|latitude| {
        let longitude = parse_coordinate(&long, "longitude")?;
        state.service.add_airport(&iata, latitude, longitude)
    });

    match result {
        Ok(()) => {
            info!(
                endpoint = "/airports/:iata/:lat/:long",
                request_id = %request_id,
                iata = %iata,
                "Airport added by coordinates"
            );
            StatusCode::CREATED.into_response()
        }
        Err(error) => error_response(
            error,
            "/airports/:iata/:lat/:long",
            &request_id,
            Some(&params),
        ),
    }
}

/// Handle DELETE /airports/:iata
pub async fn delete_airport_handler(
    State(state): State<Arc<AppState>>,
    Path(iata): Path<String>,
) -> Response {
    let request_id = generate_request_id();

    match state.service.delete_airport(&iata) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => error_response(error, "/airports/:iata", &request_id, Some(&iata)),
    }
}

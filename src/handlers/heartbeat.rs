//! Heartbeat endpoint handler.
//!
//! Returns server status information: instance id, uptime and the size of the
//! in-memory data set.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

/// Heartbeat response structure
#[derive(Debug, Serialize)]
pub struct HeartbeatResponse {
    /// Server ID (unique per instance)
    pub server_id: String,
    /// Current timestamp (ISO 8601 format)
    pub timestamp: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Data set information
    pub dataset: DatasetInfo,
    /// Server status
    pub status: String,
}

/// Data set information structure
#[derive(Debug, Serialize)]
pub struct DatasetInfo {
    /// Number of registered airports
    pub airport_count: usize,
    /// Number of atmospheric records, populated or not
    pub record_count: usize,
    /// Number of weather queries served
    pub query_count: u64,
}

/// Handle GET /heartbeat requests
pub async fn heartbeat_handler(State(state): State<Arc<AppState>>) -> Json<HeartbeatResponse> {
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

    let dataset = DatasetInfo {
        airport_count: state.service.registry().len(),
        record_count: state.service.atmosphere().len(),
        query_count: state.service.usage().snapshot().total_requests(),
    };

    Json(HeartbeatResponse {
        server_id: state.server_id.to_string(),
        timestamp,
        uptime_seconds: state.uptime_seconds(),
        dataset,
        status: "healthy".to_string(),
    })
}

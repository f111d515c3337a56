//! Usage statistics endpoint handler.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::logging::log_timed_operation;
use crate::service::StatsReport;
use crate::state::AppState;

/// Handle GET /airports/stats
pub async fn stats_handler(State(state): State<Arc<AppState>>) -> Json<StatsReport> {
    Json(log_timed_operation("stats", || state.service.stats()))
}

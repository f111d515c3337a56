//! # meteoport
//!
//! An in-memory airport weather query service.
//!
//! Collection sites submit atmospheric readings for airports; clients ask for
//! the weather around an airport within a radius and for usage statistics.
//!
//! ## Architecture
//!
//! - **Engine**: [`registry`], [`atmosphere`], [`geo`] and [`usage`], composed
//!   by [`service::WeatherQueryService`]. Volatile, rebuilt on every start.
//! - **API Layer**: axum handlers in [`handlers`] translating HTTP to engine calls
//! - **Bootstrap**: layered [`config`], [`logging`], and airport seeding via [`loader`]

pub mod atmosphere;
pub mod config;
pub mod error;
pub mod geo;
pub mod handlers;
pub mod loader;
pub mod logging;
pub mod model;
pub mod registry;
pub mod service;
pub mod state;
pub mod usage;

pub use config::Config;
pub use error::{MeteoportError, Result};
pub use logging::{
    create_http_trace_layer, generate_request_id, init_tracing, log_data_load_stats, log_error,
    log_operation_end, log_operation_start, log_request_error, log_timed_operation,
};
pub use model::{Airport, AtmosphericInformation, DataPoint, DataPointType, Dst, NewAirport};
pub use service::{ServiceOptions, StatsReport, WeatherQueryService};
pub use state::AppState;

//! Error types for the meteoport application.
//!
//! This module defines the error enum shared by the engine, the seed loader
//! and the HTTP layer. Mapping errors onto status codes is left to
//! [`crate::handlers`].

use thiserror::Error;

use crate::model::DataPointType;

/// The main error type for meteoport operations.
#[derive(Error, Debug)]
pub enum MeteoportError {
    /// An airport with this IATA code is already registered
    #[error("Airport already exists: {iata}")]
    Conflict { iata: String },

    /// No airport is registered under this IATA code
    #[error("Airport not found: {iata}")]
    NotFound { iata: String },

    /// A reading's mean lies outside the bounds of its type
    #[error("{kind} mean {value} is outside the allowed range [{min}, {max}]")]
    OutOfRange {
        kind: DataPointType,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Malformed or unrecognised input
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server errors
    #[error("Server error: {message}")]
    Server { message: String },
}

impl MeteoportError {
    /// Shorthand for an [`MeteoportError::InvalidInput`] with a formatted message
    pub fn invalid(message: impl Into<String>) -> Self {
        MeteoportError::InvalidInput {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results with MeteoportError
pub type Result<T> = std::result::Result<T, MeteoportError>;

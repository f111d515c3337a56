//! Data entities held by the engine.
//!
//! Airports are owned by [`crate::registry::AirportRegistry`]; atmospheric
//! records by [`crate::atmosphere::AtmosphericStore`].

pub mod airport;
pub mod reading;

pub use airport::{validate_iata, Airport, Dst, NewAirport};
pub use reading::{AtmosphericInformation, DataPoint, DataPointType};

//! The set of known airports, keyed by IATA code.

use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::error::{MeteoportError, Result};
use crate::model::Airport;

/// Owns every registered [`Airport`]. Each operation takes the lock once, so
/// readers never observe a half-applied write.
#[derive(Debug, Default)]
pub struct AirportRegistry {
    airports: RwLock<HashMap<String, Airport>>,
}

impl AirportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new airport, failing with `Conflict` if the code is taken
    pub fn create(&self, airport: Airport) -> Result<()> {
        let mut airports = self.airports.write();

        if airports.contains_key(airport.iata_code()) {
            warn!(iata = airport.iata_code(), "Rejected duplicate airport");
            return Err(MeteoportError::Conflict {
                iata: airport.iata_code().to_string(),
            });
        }

        info!(iata = airport.iata_code(), "Registered airport");
        airports.insert(airport.iata_code().to_string(), airport);
        Ok(())
    }

    /// Get an airport by code
    pub fn get(&self, iata: &str) -> Option<Airport> {
        self.airports.read().get(iata).cloned()
    }

    /// Get an airport by code with error handling
    pub fn get_checked(&self, iata: &str) -> Result<Airport> {
        self.get(iata).ok_or_else(|| MeteoportError::NotFound {
            iata: iata.to_string(),
        })
    }

    /// Check if an airport is registered
    pub fn exists(&self, iata: &str) -> bool {
        self.airports.read().contains_key(iata)
    }

    /// Remove an airport, failing with `NotFound` if it was never registered
    pub fn delete(&self, iata: &str) -> Result<Airport> {
        let removed = self.airports.write().remove(iata);

        match removed {
            Some(airport) => {
                info!(iata = iata, "Removed airport");
                Ok(airport)
            }
            None => {
                debug!(iata = iata, "Delete requested for unknown airport");
                Err(MeteoportError::NotFound {
                    iata: iata.to_string(),
                })
            }
        }
    }

    /// Copy of every registered airport, in no particular order
    pub fn list(&self) -> Vec<Airport> {
        self.airports.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.airports.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.read().is_empty()
    }
}

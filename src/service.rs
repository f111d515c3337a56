//! Query façade over the registry, the atmospheric store and the usage counters.
//!
//! Each step of a composite operation is atomic on its own structure; the
//! composition as a whole is a point-in-time read and holds no lock across
//! steps.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::atmosphere::AtmosphericStore;
use crate::error::{MeteoportError, Result};
use crate::geo;
use crate::model::{Airport, AtmosphericInformation, DataPoint, NewAirport};
use crate::registry::AirportRegistry;
use crate::usage::UsageAggregator;

/// Readings older than this are left out of `datasize`
pub const FRESHNESS_WINDOW_MS: i64 = 86_400_000;

/// Behavioural switches for [`WeatherQueryService`]
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceOptions {
    /// Also drop the atmospheric record and request counter of a deleted airport
    pub purge_on_delete: bool,
    /// Largest radius accepted by [`WeatherQueryService::weather_around`]
    pub max_radius_km: f64,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            purge_on_delete: false,
            max_radius_km: geo::EARTH_CIRCUMFERENCE_KM,
        }
    }
}

/// The `stats` report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    /// Populated records updated within the last day
    pub datasize: usize,
    /// Share of queries per known airport
    pub iata_freq: BTreeMap<String, f64>,
    /// Query counts folded by `radius mod 10`
    pub radius_freq: Vec<u64>,
}

/// Entry point used by the HTTP layer
#[derive(Debug, Default)]
pub struct WeatherQueryService {
    registry: AirportRegistry,
    atmosphere: AtmosphericStore,
    usage: UsageAggregator,
    options: ServiceOptions,
}

impl WeatherQueryService {
    pub fn new(options: ServiceOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &ServiceOptions {
        &self.options
    }

    pub fn registry(&self) -> &AirportRegistry {
        &self.registry
    }

    pub fn atmosphere(&self) -> &AtmosphericStore {
        &self.atmosphere
    }

    pub fn usage(&self) -> &UsageAggregator {
        &self.usage
    }

    /// Register a fully described airport
    pub fn create_airport(&self, airport: Airport) -> Result<()> {
        self.registry.create(airport)
    }

    /// Register an airport known only by code and position
    pub fn add_airport(&self, iata: &str, latitude: f64, longitude: f64) -> Result<()> {
        let airport = Airport::new(NewAirport::at(iata, latitude, longitude))?;
        self.registry.create(airport)
    }

    pub fn airport(&self, iata: &str) -> Result<Airport> {
        self.registry.get_checked(iata)
    }

    /// Every registered IATA code, sorted
    pub fn airport_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self
            .registry
            .list()
            .into_iter()
            .map(|a| a.iata_code().to_string())
            .collect();
        codes.sort();
        codes
    }

    /// Remove an airport. Its readings and usage counts survive unless
    /// `purge_on_delete` is set.
    pub fn delete_airport(&self, iata: &str) -> Result<()> {
        self.registry.delete(iata)?;

        if self.options.purge_on_delete {
            let had_record = self.atmosphere.remove(iata);
            let requests = self.usage.forget_airport(iata);
            info!(
                iata = iata,
                had_record = had_record,
                requests = requests.unwrap_or(0),
                "Purged data for deleted airport"
            );
        }

        Ok(())
    }

    /// Store a reading for an airport
    pub fn update_weather(&self, iata: &str, point: DataPoint) -> Result<()> {
        self.atmosphere.apply_reading(iata, point)
    }

    /// Store a reading stamped with an explicit time
    pub fn update_weather_at(&self, iata: &str, point: DataPoint, now_ms: i64) -> Result<()> {
        self.atmosphere.apply_reading_at(iata, point, now_ms)
    }

    /// Populated readings of every airport within `radius_km` of `iata`.
    ///
    /// A radius of 0 returns exactly the airport's own record, populated or
    /// not. An unknown reference airport yields no results but the query is
    /// still counted. Only a malformed radius is an error.
    pub fn weather_around(&self, iata: &str, radius_km: f64) -> Result<Vec<AtmosphericInformation>> {
        self.validate_radius(radius_km)?;
        self.usage.record_query(iata, radius_km);

        if radius_km == 0.0 {
            return Ok(vec![self.atmosphere.get_or_default(iata)]);
        }

        let Some(center) = self.registry.get(iata) else {
            debug!(iata = iata, "Weather requested around unknown airport");
            return Ok(Vec::new());
        };

        let airports = self.registry.list();
        let results: Vec<AtmosphericInformation> =
            geo::find_within_radius(&center, radius_km, &airports)
                .map(|airport| self.atmosphere.get_or_default(airport.iata_code()))
                .filter(AtmosphericInformation::is_populated)
                .collect();

        debug!(
            iata = iata,
            radius_km = radius_km,
            matches = results.len(),
            "Weather query answered"
        );
        Ok(results)
    }

    /// Build the stats report against the current time
    pub fn stats(&self) -> StatsReport {
        self.stats_at(chrono::Utc::now().timestamp_millis())
    }

    /// Build the stats report as seen at `now_ms`
    pub fn stats_at(&self, now_ms: i64) -> StatsReport {
        let datasize = self
            .atmosphere
            .all_records()
            .iter()
            .filter(|info| info.is_populated() && info.updated_within(now_ms, FRESHNESS_WINDOW_MS))
            .count();

        let airports = self.registry.list();
        let usage = self.usage.snapshot();

        StatsReport {
            datasize,
            iata_freq: usage.frequencies(airports.iter().map(Airport::iata_code)),
            radius_freq: usage.radius_histogram(),
        }
    }

    fn validate_radius(&self, radius_km: f64) -> Result<()> {
        if radius_km.is_finite() && (0.0..=self.options.max_radius_km).contains(&radius_km) {
            Ok(())
        } else {
            Err(MeteoportError::invalid(format!(
                "Radius must be between 0 and {} km, got {}",
                self.options.max_radius_km, radius_km
            )))
        }
    }
}

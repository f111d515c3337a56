//! Airport seed file loading.
//!
//! Two row shapes are understood, one airport per line:
//!
//! - `IATA,latitude,longitude`
//! - `id,name,city,country,IATA,ICAO,latitude,longitude,altitude,utcOffset,dst`,
//!   where each field may be wrapped in double quotes.
//!
//! Lines of any other shape, or with unparsable values, are skipped with a
//! warning rather than failing the whole load.

use std::path::Path;
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::{MeteoportError, Result};
use crate::logging::{log_data_load_stats, log_operation_end, log_operation_start};
use crate::model::{Airport, NewAirport};
use crate::service::WeatherQueryService;

const SHORT_ROW_FIELDS: usize = 3;
const FULL_ROW_FIELDS: usize = 11;

/// Outcome of inserting parsed airports into the registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Airports successfully parsed from the file
    pub parsed: usize,
    /// Airports inserted into the registry
    pub loaded: usize,
    /// Airports rejected by the registry, typically duplicates
    pub skipped: usize,
}

fn unquote(field: &str) -> &str {
    let field = field.trim();
    let field = field.strip_prefix('"').unwrap_or(field);
    field.strip_suffix('"').unwrap_or(field)
}

fn parse_number(field: &str, name: &str) -> Result<f64> {
    field
        .parse::<f64>()
        .map_err(|_| MeteoportError::invalid(format!("Invalid {}: '{}'", name, field)))
}

/// Parse one line of an airport file
pub fn parse_airport_line(line: &str) -> Result<Airport> {
    let fields: Vec<&str> = line.split(',').map(unquote).collect();

    let draft = match fields.len() {
        SHORT_ROW_FIELDS => NewAirport::at(
            fields[0],
            parse_number(fields[1], "latitude")?,
            parse_number(fields[2], "longitude")?,
        ),
        FULL_ROW_FIELDS => NewAirport {
            city: fields[2].to_string(),
            country: fields[3].to_string(),
            iata_code: fields[4].to_string(),
            icao_code: fields[5].to_string(),
            latitude: parse_number(fields[6], "latitude")?,
            longitude: parse_number(fields[7], "longitude")?,
            altitude: parse_number(fields[8], "altitude")?,
            utc_offset: fields[9].to_string(),
            dst: fields[10].parse()?,
        },
        n => {
            return Err(MeteoportError::invalid(format!(
                "Expected {} or {} fields, found {}",
                SHORT_ROW_FIELDS, FULL_ROW_FIELDS, n
            )))
        }
    };

    Airport::new(draft)
}

/// Parse every airport in `content`, skipping blank lines and malformed rows
pub fn parse_airports(content: &str) -> Vec<Airport> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match parse_airport_line(line) {
            Ok(airport) => Some(airport),
            Err(e) => {
                warn!(line = index + 1, error = %e, "Skipped airport line");
                None
            }
        })
        .collect()
}

/// Read and parse an airport file
pub fn load_airports(path: &Path) -> Result<Vec<Airport>> {
    if !path.exists() {
        return Err(MeteoportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )));
    }

    let content = std::fs::read_to_string(path)?;
    let airports = parse_airports(&content);
    debug!(
        path = %path.display(),
        count = airports.len(),
        "Parsed airport file"
    );
    Ok(airports)
}

/// Insert airports into the service. Duplicates are counted, not fatal.
pub fn seed_airports(service: &WeatherQueryService, airports: Vec<Airport>) -> LoadSummary {
    let mut summary = LoadSummary {
        parsed: airports.len(),
        ..LoadSummary::default()
    };

    for airport in airports {
        match service.create_airport(airport) {
            Ok(()) => summary.loaded += 1,
            Err(_) => summary.skipped += 1,
        }
    }

    summary
}

/// Load an airport file into the service
pub fn load_airports_into(service: &WeatherQueryService, path: &Path) -> Result<LoadSummary> {
    let start = Instant::now();
    let path_display = path.display().to_string();
    log_operation_start("airport_load", Some(&path_display));

    let airports = load_airports(path)?;
    let summary = seed_airports(service, airports);

    log_data_load_stats(
        &path_display,
        summary.parsed,
        summary.loaded,
        summary.skipped,
    );
    log_operation_end("airport_load", start, summary.skipped == 0);

    Ok(summary)
}

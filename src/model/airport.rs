//! Airport entity and its daylight-saving-time region tag.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{MeteoportError, Result};
use crate::geo::{validate_coordinates, Coordinates};

/// Daylight-saving-time region, serialized as its one-letter code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Dst {
    #[serde(rename = "E")]
    Europe,
    #[serde(rename = "A")]
    UsCanada,
    #[serde(rename = "S")]
    SouthAmerica,
    #[serde(rename = "O")]
    Australia,
    #[serde(rename = "Z")]
    NewZealand,
    #[serde(rename = "N")]
    None,
    #[default]
    #[serde(rename = "U")]
    Unknown,
}

impl Dst {
    /// One-letter code used in airport data files
    pub fn code(self) -> char {
        match self {
            Dst::Europe => 'E',
            Dst::UsCanada => 'A',
            Dst::SouthAmerica => 'S',
            Dst::Australia => 'O',
            Dst::NewZealand => 'Z',
            Dst::None => 'N',
            Dst::Unknown => 'U',
        }
    }

    /// Human readable region name
    pub fn region(self) -> &'static str {
        match self {
            Dst::Europe => "Europe",
            Dst::UsCanada => "US/Canada",
            Dst::SouthAmerica => "South America",
            Dst::Australia => "Australia",
            Dst::NewZealand => "New Zealand",
            Dst::None => "None",
            Dst::Unknown => "Unknown",
        }
    }
}

impl FromStr for Dst {
    type Err = MeteoportError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "E" => Ok(Dst::Europe),
            "A" => Ok(Dst::UsCanada),
            "S" => Ok(Dst::SouthAmerica),
            "O" => Ok(Dst::Australia),
            "Z" => Ok(Dst::NewZealand),
            "N" => Ok(Dst::None),
            "U" => Ok(Dst::Unknown),
            other => Err(MeteoportError::invalid(format!(
                "Unknown DST region code: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Dst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.region())
    }
}

/// Check that an IATA code is exactly three ASCII alphanumeric characters
pub fn validate_iata(code: &str) -> Result<()> {
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(MeteoportError::invalid(format!(
            "IATA code must be three alphanumeric characters, got '{}'",
            code
        )))
    }
}

/// Named-field description of an airport to be created.
///
/// Every field except `iata_code` may be omitted when decoding from JSON.
/// Defaults: empty ICAO code, city and country; zero latitude, longitude and
/// altitude; UTC offset `"0"`; DST region [`Dst::Unknown`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewAirport {
    pub iata_code: String,
    pub icao_code: String,
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub utc_offset: String,
    pub dst: Dst,
}

impl NewAirport {
    /// Airport description carrying only a code and a position
    pub fn at(iata_code: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            iata_code: iata_code.into(),
            latitude,
            longitude,
            ..Self::default()
        }
    }
}

impl Default for NewAirport {
    fn default() -> Self {
        Self {
            iata_code: String::new(),
            icao_code: String::new(),
            city: String::new(),
            country: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            altitude: 0.0,
            utc_offset: "0".to_string(),
            dst: Dst::Unknown,
        }
    }
}

/// A validated airport. Fields are read-only once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "NewAirport")]
pub struct Airport {
    iata_code: String,
    icao_code: String,
    city: String,
    country: String,
    latitude: f64,
    longitude: f64,
    altitude: f64,
    utc_offset: String,
    dst: Dst,
}

impl Airport {
    /// Validate a [`NewAirport`] and build the airport from it
    pub fn new(draft: NewAirport) -> Result<Self> {
        validate_iata(&draft.iata_code)?;
        validate_coordinates(draft.latitude, draft.longitude)?;

        Ok(Self {
            iata_code: draft.iata_code,
            icao_code: draft.icao_code,
            city: draft.city,
            country: draft.country,
            latitude: draft.latitude,
            longitude: draft.longitude,
            altitude: draft.altitude,
            utc_offset: draft.utc_offset,
            dst: draft.dst,
        })
    }

    pub fn iata_code(&self) -> &str {
        &self.iata_code
    }

    pub fn icao_code(&self) -> &str {
        &self.icao_code
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    pub fn utc_offset(&self) -> &str {
        &self.utc_offset
    }

    pub fn dst(&self) -> Dst {
        self.dst
    }

    /// Position of the airport in degrees
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

impl TryFrom<NewAirport> for Airport {
    type Error = MeteoportError;

    fn try_from(draft: NewAirport) -> Result<Self> {
        Airport::new(draft)
    }
}

impl fmt::Display for Airport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.4}, {:.4})",
            self.iata_code, self.latitude, self.longitude
        )
    }
}

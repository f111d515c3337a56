//! Great-circle distance and radius filtering.
//!
//! Distances use the haversine formula on a sphere of radius
//! [`EARTH_RADIUS_KM`]. Both latitudes are converted to radians before they
//! enter the cosine terms.

use serde::{Deserialize, Serialize};

use crate::error::{MeteoportError, Result};
use crate::model::Airport;

/// Mean Earth radius used for all distance computations
pub const EARTH_RADIUS_KM: f64 = 6372.8;

/// Equatorial circumference, the largest radius a query may ask for
pub const EARTH_CIRCUMFERENCE_KM: f64 = 40_075.0;

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Check latitude is within [-90, 90] and longitude within [-180, 180]
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(MeteoportError::invalid(format!(
            "Latitude {} must be in the range -90 to 90",
            latitude
        )));
    }

    if !(-180.0..=180.0).contains(&longitude) {
        return Err(MeteoportError::invalid(format!(
            "Longitude {} must be in the range -180 to 180",
            longitude
        )));
    }

    Ok(())
}

/// Haversine distance between two points in kilometres
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Distance between two airports in kilometres
pub fn distance_km(a: &Airport, b: &Airport) -> f64 {
    haversine_km(a.coordinates(), b.coordinates())
}

/// Lazily yield the candidates whose distance to `center` is at most
/// `radius_km`, preserving the order of `candidates`.
pub fn find_within_radius<'a, I>(
    center: &'a Airport,
    radius_km: f64,
    candidates: I,
) -> impl Iterator<Item = &'a Airport> + 'a
where
    I: IntoIterator<Item = &'a Airport>,
    I::IntoIter: 'a,
{
    candidates
        .into_iter()
        .filter(move |candidate| distance_km(center, candidate) <= radius_km)
}

//! Test data generation utilities.
//!
//! Writes airport seed files in both supported row shapes.

use std::io::Write;
use std::path::{Path, PathBuf};

/// A handful of real airports in `IATA,latitude,longitude` form
pub const SHORT_ROWS: &[(&str, f64, f64)] = &[
    ("BOS", 42.364347, -71.005181),
    ("EWR", 40.6925, -74.168667),
    ("JFK", 40.639751, -73.778925),
    ("LGA", 40.777245, -73.872608),
    ("MMU", 40.79935, -74.4148747),
];

/// Rows in the eleven-column airport database format, one of them malformed
pub const FULL_ROWS: &str = r#"1,"General Edward Lawrence Logan Intl","Boston","United States","BOS","KBOS",42.364347,-71.005181,19,-5,"A"
2,"John F Kennedy Intl","New York","United States","JFK","KJFK",40.639751,-73.778925,13,-5,"A"
3,"Heathrow","London","United Kingdom","LHR","EGLL",51.4775,-0.461389,83,0,"E"
4,"Broken","Nowhere","Nowhere","XXX","XXXX",north,west,0,0,"U"
"#;

/// Write `SHORT_ROWS` as a seed file into `dir`
pub fn write_short_airports(dir: &Path) -> std::io::Result<PathBuf> {
    let path = dir.join("airports.csv");
    let mut file = std::fs::File::create(&path)?;
    for (iata, latitude, longitude) in SHORT_ROWS {
        writeln!(file, "{},{},{}", iata, latitude, longitude)?;
    }
    Ok(path)
}

/// Write `FULL_ROWS` as a seed file into `dir`
pub fn write_full_airports(dir: &Path) -> std::io::Result<PathBuf> {
    let path = dir.join("airports.dat");
    std::fs::write(&path, FULL_ROWS)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_short_airports() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_short_airports(dir.path()).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().count(), SHORT_ROWS.len());
        assert!(content.starts_with("BOS,42.364347,-71.005181"));
    }
}

//! Sensor readings and the per-airport atmospheric record.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::{MeteoportError, Result};

/// The kinds of reading a collection site can submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataPointType {
    Wind,
    Temperature,
    Humidity,
    Pressure,
    CloudCover,
    Precipitation,
}

impl DataPointType {
    pub const ALL: [DataPointType; 6] = [
        DataPointType::Wind,
        DataPointType::Temperature,
        DataPointType::Humidity,
        DataPointType::Pressure,
        DataPointType::CloudCover,
        DataPointType::Precipitation,
    ];

    /// Inclusive bounds for the mean of a reading of this type
    pub const fn bounds(self) -> (f64, f64) {
        match self {
            DataPointType::Wind => (0.0, 1000.0),
            DataPointType::Temperature => (-50.0, 100.0),
            DataPointType::Humidity => (0.0, 100.0),
            DataPointType::Pressure => (650.0, 800.0),
            DataPointType::CloudCover => (0.0, 100.0),
            DataPointType::Precipitation => (0.0, 100.0),
        }
    }

    pub fn range(self) -> RangeInclusive<f64> {
        let (min, max) = self.bounds();
        min..=max
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DataPointType::Wind => "WIND",
            DataPointType::Temperature => "TEMPERATURE",
            DataPointType::Humidity => "HUMIDITY",
            DataPointType::Pressure => "PRESSURE",
            DataPointType::CloudCover => "CLOUDCOVER",
            DataPointType::Precipitation => "PRECIPITATION",
        }
    }

    /// Check a mean against this type's bounds. NaN never passes.
    pub fn validate(self, mean: f64) -> Result<()> {
        if self.range().contains(&mean) {
            Ok(())
        } else {
            let (min, max) = self.bounds();
            Err(MeteoportError::OutOfRange {
                kind: self,
                value: mean,
                min,
                max,
            })
        }
    }
}

impl FromStr for DataPointType {
    type Err = MeteoportError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        DataPointType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MeteoportError::invalid(format!("Unknown data point type: {}", s)))
    }
}

impl fmt::Display for DataPointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A summarised measurement for one atmospheric variable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataPoint")]
pub struct DataPoint {
    #[serde(rename = "type")]
    pub kind: DataPointType,
    /// Mean of the observations
    pub mean: f64,
    /// First quartile
    pub first: i32,
    /// Median
    pub second: i32,
    /// Third quartile
    pub third: i32,
    /// Number of observations
    pub count: i32,
}

impl DataPoint {
    /// A reading with only its type and mean set
    pub fn new(kind: DataPointType, mean: f64) -> Self {
        Self {
            kind,
            mean,
            first: 0,
            second: 0,
            third: 0,
            count: 0,
        }
    }

    /// Decode a reading submitted as JSON. Any decoding problem, including an
    /// unknown `type`, is reported as invalid input.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| MeteoportError::invalid(e.to_string()))
    }
}

/// Wire form of a reading before its type is resolved
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDataPoint {
    #[serde(rename = "type")]
    kind: Option<String>,
    mean: f64,
    #[serde(deserialize_with = "integral")]
    first: i32,
    #[serde(deserialize_with = "integral")]
    second: i32,
    #[serde(alias = "last", deserialize_with = "integral")]
    third: i32,
    #[serde(deserialize_with = "integral")]
    count: i32,
}

/// Accept `4` as well as `4.0`; reject fractions and out-of-range values
fn integral<'de, D>(deserializer: D) -> std::result::Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.fract() == 0.0 && (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&value) {
        Ok(value as i32)
    } else {
        Err(de::Error::custom(format!("expected a whole number, found {}", value)))
    }
}

impl TryFrom<RawDataPoint> for DataPoint {
    type Error = MeteoportError;

    fn try_from(raw: RawDataPoint) -> Result<Self> {
        let kind = raw
            .kind
            .as_deref()
            .ok_or_else(|| MeteoportError::invalid("Data point type is missing"))?
            .parse()?;

        Ok(Self {
            kind,
            mean: raw.mean,
            first: raw.first,
            second: raw.second,
            third: raw.third,
            count: raw.count,
        })
    }
}

/// Latest readings for one airport. Absent fields were never successfully set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtmosphericInformation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    temperature: Option<DataPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    wind: Option<DataPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    humidity: Option<DataPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    precipitation: Option<DataPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pressure: Option<DataPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cloud_cover: Option<DataPoint>,
    /// Epoch milliseconds of the last successful update, 0 if never updated
    #[serde(default)]
    last_update_time: i64,
}

impl AtmosphericInformation {
    pub fn reading(&self, kind: DataPointType) -> Option<&DataPoint> {
        match kind {
            DataPointType::Temperature => self.temperature.as_ref(),
            DataPointType::Wind => self.wind.as_ref(),
            DataPointType::Humidity => self.humidity.as_ref(),
            DataPointType::Pressure => self.pressure.as_ref(),
            DataPointType::CloudCover => self.cloud_cover.as_ref(),
            DataPointType::Precipitation => self.precipitation.as_ref(),
        }
    }

    fn slot_mut(&mut self, kind: DataPointType) -> &mut Option<DataPoint> {
        match kind {
            DataPointType::Temperature => &mut self.temperature,
            DataPointType::Wind => &mut self.wind,
            DataPointType::Humidity => &mut self.humidity,
            DataPointType::Pressure => &mut self.pressure,
            DataPointType::CloudCover => &mut self.cloud_cover,
            DataPointType::Precipitation => &mut self.precipitation,
        }
    }

    /// Store a reading in the field matching its type and stamp the update time.
    ///
    /// The record is untouched when the mean is out of range.
    pub fn apply(&mut self, point: DataPoint, now_ms: i64) -> Result<()> {
        point.kind.validate(point.mean)?;
        *self.slot_mut(point.kind) = Some(point);
        self.last_update_time = now_ms;
        Ok(())
    }

    /// True when at least one of the six readings is present
    pub fn is_populated(&self) -> bool {
        DataPointType::ALL
            .into_iter()
            .any(|kind| self.reading(kind).is_some())
    }

    pub fn last_update_time(&self) -> i64 {
        self.last_update_time
    }

    /// Whether the record was updated within `window_ms` before `now_ms`
    pub fn updated_within(&self, now_ms: i64, window_ms: i64) -> bool {
        self.last_update_time > now_ms - window_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bounds_are_inclusive() {
        for kind in DataPointType::ALL {
            let (min, max) = kind.bounds();
            assert!(kind.validate(min).is_ok(), "{} min rejected", kind);
            assert!(kind.validate(max).is_ok(), "{} max rejected", kind);
            assert!(kind.validate(min - 0.001).is_err());
            assert!(kind.validate(max + 0.001).is_err());
        }
        assert!(DataPointType::Humidity.validate(f64::NAN).is_err());
    }

    #[test]
    fn test_parse_type_names() {
        assert_eq!(
            "CLOUDCOVER".parse::<DataPointType>().unwrap(),
            DataPointType::CloudCover
        );
        assert_eq!(
            "wind".parse::<DataPointType>().unwrap(),
            DataPointType::Wind
        );
        assert!(matches!(
            "VISIBILITY".parse::<DataPointType>(),
            Err(MeteoportError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_data_point_json() {
        let point = DataPoint::from_json(
            r#"{"type":"PRESSURE","mean":720.5,"first":4,"second":5,"last":6,"count":10}"#,
        )
        .unwrap();
        assert_eq!(point.kind, DataPointType::Pressure);
        assert_eq!(point.mean, 720.5);
        assert_eq!(point.third, 6);
        assert_eq!(point.count, 10);

        let json = serde_json::to_value(point).unwrap();
        assert_eq!(json["type"], "PRESSURE");
        assert_eq!(json["third"], 6);

        assert!(matches!(
            DataPoint::from_json(r#"{"type":"FOG","mean":1}"#),
            Err(MeteoportError::InvalidInput { .. })
        ));
        assert!(matches!(
            DataPoint::from_json(r#"{"mean":1}"#),
            Err(MeteoportError::InvalidInput { .. })
        ));
        assert!(matches!(
            DataPoint::from_json("not json"),
            Err(MeteoportError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_data_point_accepts_whole_floats() {
        let point = DataPoint::from_json(
            r#"{"type":"WIND","mean":5,"first":4.0,"second":6.0,"third":8.0,"count":20.0}"#,
        )
        .unwrap();
        assert_eq!(point.first, 4);
        assert_eq!(point.third, 8);
        assert_eq!(point.count, 20);

        assert!(matches!(
            DataPoint::from_json(r#"{"type":"WIND","mean":5,"first":4.5}"#),
            Err(MeteoportError::InvalidInput { .. })
        ));
        assert!(matches!(
            DataPoint::from_json(r#"{"type":"WIND","mean":5,"count":1e12}"#),
            Err(MeteoportError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_apply_sets_matching_field() {
        let mut info = AtmosphericInformation::default();
        assert!(!info.is_populated());
        assert_eq!(info.last_update_time(), 0);

        info.apply(DataPoint::new(DataPointType::CloudCover, 40.0), 1_000)
            .unwrap();

        assert!(info.is_populated());
        assert_eq!(info.last_update_time(), 1_000);
        assert_eq!(
            info.reading(DataPointType::CloudCover).map(|p| p.mean),
            Some(40.0)
        );
        assert!(info.reading(DataPointType::Wind).is_none());

        let json = serde_json::to_value(&info).unwrap();
        assert!(json.get("cloudCover").is_some());
        assert!(json.get("wind").is_none());
        assert_eq!(json["lastUpdateTime"], 1_000);
    }

    #[test]
    fn test_rejected_reading_leaves_record_unchanged() {
        let mut info = AtmosphericInformation::default();
        info.apply(DataPoint::new(DataPointType::Temperature, 21.0), 5)
            .unwrap();
        let before = info.clone();

        let result = info.apply(DataPoint::new(DataPointType::Temperature, 150.0), 10);

        assert!(matches!(result, Err(MeteoportError::OutOfRange { .. })));
        assert_eq!(info, before);
    }

    #[test]
    fn test_freshness_window() {
        let mut info = AtmosphericInformation::default();
        info.apply(DataPoint::new(DataPointType::Wind, 5.0), 10_000)
            .unwrap();

        assert!(info.updated_within(10_500, 1_000));
        assert!(!info.updated_within(11_000, 1_000));
    }
}

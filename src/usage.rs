//! Query usage counters and the statistics derived from them.
//!
//! Two tallies are kept for the lifetime of the process: queries per airport
//! code and queries per exact requested radius. Radii are stored unrounded.

use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};

use crate::geo::EARTH_CIRCUMFERENCE_KM;

/// Histogram length used when no radius has been recorded yet
const EMPTY_HISTOGRAM_MAX_RADIUS: f64 = 1000.0;

/// Radius at which the histogram stops growing
const MAX_HISTOGRAM_RADIUS: f64 = EARTH_CIRCUMFERENCE_KM;

/// Number of buckets the radius histogram folds values into
const RADIUS_BUCKETS: i64 = 10;

/// Hashable key for an exact radius value. `-0.0` and `0.0` share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct RadiusKey(u64);

impl RadiusKey {
    fn new(radius: f64) -> Self {
        let normalized = if radius == 0.0 { 0.0 } else { radius };
        Self(normalized.to_bits())
    }

    fn value(self) -> f64 {
        f64::from_bits(self.0)
    }
}

#[derive(Debug, Default, Clone)]
struct Counters {
    requests: HashMap<String, u64>,
    radii: HashMap<RadiusKey, u64>,
}

/// Thread-safe usage counters
#[derive(Debug, Default)]
pub struct UsageAggregator {
    counters: Mutex<Counters>,
}

impl UsageAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one query for `iata` at `radius_km`. Both counters move together
    /// under a single lock, so concurrent calls never lose an increment.
    pub fn record_query(&self, iata: &str, radius_km: f64) {
        let mut counters = self.counters.lock();
        *counters.requests.entry(iata.to_string()).or_insert(0) += 1;
        *counters.radii.entry(RadiusKey::new(radius_km)).or_insert(0) += 1;
    }

    /// Immutable copy of both counter maps
    pub fn snapshot(&self) -> UsageSnapshot {
        let counters = self.counters.lock().clone();
        UsageSnapshot {
            requests: counters.requests,
            radii: counters
                .radii
                .into_iter()
                .map(|(key, count)| (key.value(), count))
                .collect(),
        }
    }

    /// Share of all queries that targeted each of `iata_codes`
    pub fn compute_frequencies<'a, I>(&self, iata_codes: I) -> BTreeMap<String, f64>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.snapshot().frequencies(iata_codes)
    }

    /// Radius counts folded into `radius mod 10` buckets
    pub fn compute_radius_histogram(&self) -> Vec<u64> {
        self.snapshot().radius_histogram()
    }

    /// Forget the per-code tally for one airport. Radius tallies are kept
    /// because they are not attributable to a single airport.
    pub fn forget_airport(&self, iata: &str) -> Option<u64> {
        self.counters.lock().requests.remove(iata)
    }
}

/// Point-in-time copy of the usage counters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageSnapshot {
    requests: HashMap<String, u64>,
    radii: Vec<(f64, u64)>,
}

impl UsageSnapshot {
    /// Number of queries recorded for an airport code
    pub fn request_count(&self, iata: &str) -> u64 {
        self.requests.get(iata).copied().unwrap_or(0)
    }

    /// Number of queries recorded for exactly this radius
    pub fn radius_count(&self, radius_km: f64) -> u64 {
        let key = RadiusKey::new(radius_km);
        self.radii
            .iter()
            .find(|(radius, _)| RadiusKey::new(*radius) == key)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Sum of all per-code counts
    pub fn total_requests(&self) -> u64 {
        self.requests.values().sum()
    }

    pub fn request_counts(&self) -> &HashMap<String, u64> {
        &self.requests
    }

    /// Every distinct radius with its count, in no particular order
    pub fn radius_counts(&self) -> &[(f64, u64)] {
        &self.radii
    }

    /// `count(code) / total` for each code. With no recorded queries every
    /// code maps to 0.0.
    pub fn frequencies<'a, I>(&self, iata_codes: I) -> BTreeMap<String, f64>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let total = self.total_requests();

        iata_codes
            .into_iter()
            .map(|code| {
                let frequency = if total == 0 {
                    0.0
                } else {
                    self.request_count(code) as f64 / total as f64
                };
                (code.to_string(), frequency)
            })
            .collect()
    }

    /// Modulus-based bucketing, not a range histogram: each radius is
    /// truncated to an integer and its count added to bucket `r % 10`. The
    /// vector is `floor(max radius) + 1` long, or 1001 when nothing was
    /// recorded, and never longer than `floor(EARTH_CIRCUMFERENCE_KM) + 1`.
    /// Negative and non-finite radii are not binned.
    pub fn radius_histogram(&self) -> Vec<u64> {
        let binned = || {
            self.radii
                .iter()
                .filter(|(radius, _)| radius.is_finite() && *radius >= 0.0)
        };

        let max_radius = binned()
            .map(|(radius, _)| *radius)
            .fold(None, |max: Option<f64>, r| Some(max.map_or(r, |m| m.max(r))))
            .unwrap_or(EMPTY_HISTOGRAM_MAX_RADIUS)
            .min(MAX_HISTOGRAM_RADIUS);

        let mut histogram = vec![0u64; max_radius.floor() as usize + 1];
        for (radius, count) in binned() {
            let bucket = (radius.trunc() as i64 % RADIUS_BUCKETS) as usize;
            histogram[bucket] += count;
        }
        histogram
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_and_snapshot() {
        let usage = UsageAggregator::new();
        usage.record_query("JFK", 13.4);
        usage.record_query("JFK", 13.4);
        usage.record_query("LHR", 0.0);

        let snapshot = usage.snapshot();
        assert_eq!(snapshot.request_count("JFK"), 2);
        assert_eq!(snapshot.request_count("LHR"), 1);
        assert_eq!(snapshot.request_count("AMS"), 0);
        assert_eq!(snapshot.radius_count(13.4), 2);
        assert_eq!(snapshot.radius_count(13.0), 0);
        assert_eq!(snapshot.radius_count(-0.0), 1);
        assert_eq!(snapshot.total_requests(), 3);

        assert_eq!(snapshot.request_counts().len(), 2);
        assert_eq!(snapshot.request_counts()["JFK"], 2);
        let mut radii = snapshot.radius_counts().to_vec();
        radii.sort_by(|a, b| a.0.total_cmp(&b.0));
        assert_eq!(radii, vec![(0.0, 1), (13.4, 2)]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let usage = UsageAggregator::new();
        usage.record_query("JFK", 10.0);
        let snapshot = usage.snapshot();

        usage.record_query("JFK", 10.0);

        assert_eq!(snapshot.request_count("JFK"), 1);
        assert_eq!(usage.snapshot().request_count("JFK"), 2);
    }

    #[test]
    fn test_frequencies() {
        let usage = UsageAggregator::new();
        usage.record_query("JFK", 1.0);
        usage.record_query("JFK", 1.0);
        usage.record_query("JFK", 1.0);
        usage.record_query("LHR", 1.0);

        let freq = usage.compute_frequencies(["JFK", "LHR", "AMS"]);
        assert_eq!(freq["JFK"], 0.75);
        assert_eq!(freq["LHR"], 0.25);
        assert_eq!(freq["AMS"], 0.0);
    }

    #[test]
    fn test_frequencies_without_queries_are_zero() {
        let usage = UsageAggregator::new();
        let freq = usage.compute_frequencies(["JFK", "LHR"]);

        assert_eq!(freq.len(), 2);
        assert!(freq.values().all(|f| *f == 0.0));
    }

    #[test]
    fn test_radius_histogram_uses_modulus_buckets() {
        let usage = UsageAggregator::new();
        usage.record_query("JFK", 5.0);
        usage.record_query("JFK", 15.7);
        usage.record_query("JFK", 15.2);
        usage.record_query("JFK", 23.0);
        usage.record_query("JFK", 23.0);

        let histogram = usage.compute_radius_histogram();

        assert_eq!(histogram.len(), 24);
        assert_eq!(histogram[5], 3);
        assert_eq!(histogram[3], 2);
        assert_eq!(histogram.iter().sum::<u64>(), 5);
        assert!(histogram[10..].iter().all(|c| *c == 0));
    }

    #[test]
    fn test_radius_histogram_small_and_empty() {
        let usage = UsageAggregator::new();
        assert_eq!(usage.compute_radius_histogram(), vec![0; 1001]);

        usage.record_query("JFK", 0.0);
        assert_eq!(usage.compute_radius_histogram(), vec![1]);
    }

    #[test]
    fn test_radius_histogram_length_is_capped() {
        let usage = UsageAggregator::new();
        usage.record_query("JFK", 1e300);
        usage.record_query("JFK", 1e12);
        usage.record_query("JFK", 12.0);

        let histogram = usage.compute_radius_histogram();

        assert_eq!(histogram.len(), 40_076);
        assert_eq!(histogram[2], 1);
        assert_eq!(histogram.iter().sum::<u64>(), 3);
    }

    #[test]
    fn test_forget_airport() {
        let usage = UsageAggregator::new();
        usage.record_query("JFK", 50.0);

        assert_eq!(usage.forget_airport("JFK"), Some(1));
        assert_eq!(usage.snapshot().request_count("JFK"), 0);
        assert_eq!(usage.snapshot().radius_count(50.0), 1);
    }

    #[test]
    fn test_concurrent_increments() {
        let usage = UsageAggregator::new();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let usage = &usage;
                scope.spawn(move || {
                    for _ in 0..1_000 {
                        usage.record_query("JFK", 250.0);
                    }
                });
            }
        });

        let snapshot = usage.snapshot();
        assert_eq!(snapshot.request_count("JFK"), 8_000);
        assert_eq!(snapshot.radius_count(250.0), 8_000);
    }
}

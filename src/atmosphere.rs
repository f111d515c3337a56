//! Per-airport atmospheric records.
//!
//! The outer map is only write-locked to insert a new record. Each record sits
//! behind its own mutex, so updates to different airports proceed in parallel
//! while updates to the same airport are serialized.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::model::{AtmosphericInformation, DataPoint};

type SharedRecord = Arc<Mutex<AtmosphericInformation>>;

/// Owns one [`AtmosphericInformation`] per airport code
#[derive(Debug, Default)]
pub struct AtmosphericStore {
    records: RwLock<HashMap<String, SharedRecord>>,
}

impl AtmosphericStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the airport's record, or an empty record if it has none yet
    pub fn get_or_default(&self, iata: &str) -> AtmosphericInformation {
        let record = self.records.read().get(iata).cloned();
        record.map(|r| r.lock().clone()).unwrap_or_default()
    }

    /// Validate and store a reading stamped with the current time
    pub fn apply_reading(&self, iata: &str, point: DataPoint) -> Result<()> {
        self.apply_reading_at(iata, point, chrono::Utc::now().timestamp_millis())
    }

    /// Validate and store a reading stamped with `now_ms`.
    ///
    /// An out-of-range mean fails with `OutOfRange` before any record is
    /// created or modified.
    pub fn apply_reading_at(&self, iata: &str, point: DataPoint, now_ms: i64) -> Result<()> {
        if let Err(e) = point.kind.validate(point.mean) {
            warn!(iata = iata, kind = %point.kind, mean = point.mean, "Rejected reading");
            return Err(e);
        }

        let record = self.record(iata);
        let mut info = record.lock();
        info.apply(point, now_ms)?;

        debug!(iata = iata, kind = %point.kind, mean = point.mean, "Stored reading");
        Ok(())
    }

    /// Copies of every stored record
    pub fn all_records(&self) -> Vec<AtmosphericInformation> {
        let records: Vec<SharedRecord> = self.records.read().values().cloned().collect();
        records.iter().map(|r| r.lock().clone()).collect()
    }

    /// Drop an airport's record. Returns whether one existed.
    pub fn remove(&self, iata: &str) -> bool {
        self.records.write().remove(iata).is_some()
    }

    /// Number of stored records, populated or not
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn record(&self, iata: &str) -> SharedRecord {
        if let Some(record) = self.records.read().get(iata) {
            return Arc::clone(record);
        }

        Arc::clone(
            self.records
                .write()
                .entry(iata.to_string())
                .or_default(),
        )
    }
}

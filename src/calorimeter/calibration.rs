//! HCAL trigger-primitive calibration
//!
//! Converts a compressed Et count into calibrated transverse energy. The
//! lookup is a pure function of (region, |ieta|, count) for the duration of
//! an event.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::CaloRegion;
use crate::error::MonitorError;
use crate::MonitorResult;

/// Source of calibrated tower Et
pub trait CalibrationLookup {
    fn calibrated_et(&self, region: CaloRegion, abs_ieta: u32, raw_count: u16) -> f32;
}

impl<T: CalibrationLookup + ?Sized> CalibrationLookup for &T {
    fn calibrated_et(&self, region: CaloRegion, abs_ieta: u32, raw_count: u16) -> f32 {
        (**self).calibrated_et(region, abs_ieta, raw_count)
    }
}

/// Uniform linear scale, `Et = count × lsb`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearCalibration {
    pub lsb: f32,
}

impl LinearCalibration {
    pub fn new(lsb: f32) -> Self {
        Self { lsb }
    }
}

impl Default for LinearCalibration {
    fn default() -> Self {
        Self { lsb: 0.5 }
    }
}

impl CalibrationLookup for LinearCalibration {
    fn calibrated_et(&self, _region: CaloRegion, _abs_ieta: u32, raw_count: u16) -> f32 {
        f32::from(raw_count) * self.lsb
    }
}

/// Per-|ieta| lookup table, one row of Et values indexed by compressed count
///
/// JSON layout:
///
/// ```text
/// { "rows": { "1": [0.0, 0.5, 1.0, ...], "2": [...], ... } }
/// ```
///
/// Towers without a row, and counts past the end of a row, calibrate to 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationTable {
    pub rows: BTreeMap<u32, Vec<f32>>,
}

impl CalibrationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row for one |ieta|
    pub fn with_row(mut self, abs_ieta: u32, row: Vec<f32>) -> Self {
        self.rows.insert(abs_ieta, row);
        self
    }

    /// Build a table whose every row is a linear ramp
    pub fn linear(abs_ietas: impl IntoIterator<Item = u32>, lsb: f32, n_counts: usize) -> Self {
        let row: Vec<f32> = (0..n_counts).map(|c| c as f32 * lsb).collect();
        let rows = abs_ietas.into_iter().map(|a| (a, row.clone())).collect();
        Self { rows }
    }

    /// Load a table from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> MonitorResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let table: Self = serde_json::from_str(&content)?;
        table.validate()?;
        log::info!(
            "Loaded calibration table with {} rows from {:?}",
            table.rows.len(),
            path
        );
        Ok(table)
    }

    pub fn validate(&self) -> MonitorResult<()> {
        for (abs_ieta, row) in &self.rows {
            if let Some(bad) = row.iter().find(|v| !v.is_finite()) {
                return Err(MonitorError::Calibration(format!(
                    "row {} holds non-finite value {}",
                    abs_ieta, bad
                )));
            }
        }
        Ok(())
    }
}

impl CalibrationLookup for CalibrationTable {
    fn calibrated_et(&self, _region: CaloRegion, abs_ieta: u32, raw_count: u16) -> f32 {
        self.rows
            .get(&abs_ieta)
            .and_then(|row| row.get(usize::from(raw_count)))
            .copied()
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_linear_calibration() {
        let cal = LinearCalibration::default();
        assert_eq!(cal.calibrated_et(CaloRegion::HadronBarrel, 3, 10), 5.0);
        assert_eq!(
            LinearCalibration::new(0.25).calibrated_et(CaloRegion::HadronForward, 30, 8),
            2.0
        );
    }

    #[test]
    fn test_table_lookup_and_gaps() {
        let table = CalibrationTable::new().with_row(5, vec![0.0, 1.5, 3.5]);
        assert_eq!(table.calibrated_et(CaloRegion::HadronBarrel, 5, 2), 3.5);
        assert_eq!(table.calibrated_et(CaloRegion::HadronBarrel, 5, 3), 0.0);
        assert_eq!(table.calibrated_et(CaloRegion::HadronBarrel, 6, 1), 0.0);
    }

    #[test]
    fn test_table_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"rows": {{"1": [0.0, 0.7], "29": [0.0, 2.0, 4.0]}}}}"#).unwrap();

        let table = CalibrationTable::from_file(file.path()).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.calibrated_et(CaloRegion::HadronForward, 29, 2), 4.0);
        assert!((table.calibrated_et(CaloRegion::HadronBarrel, 1, 1) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_linear_table_matches_linear_calibration() {
        let table = CalibrationTable::linear(1..=32, 0.5, 256);
        let linear = LinearCalibration::new(0.5);
        for count in [0u16, 4, 17, 255] {
            assert_eq!(
                table.calibrated_et(CaloRegion::HadronEndcap, 25, count),
                linear.calibrated_et(CaloRegion::HadronEndcap, 25, count)
            );
        }
    }
}

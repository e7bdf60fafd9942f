//! # Calorimeter Trigger Primitives
//!
//! Per-event monitoring of the calorimeter trigger towers:
//!
//! ```text
//!   ECAL towers ──► linear Et (0.5 / count) ──┐
//!                                             ├──► region sums / maxima ──┐
//!   HCAL towers ──► CalibrationLookup ────────┘                           │
//!                                                                         ▼
//!   particles ──► leading stable particle ──► ΔR < 0.5 cone sums ──► EventSummaryRecord
//! ```
//!
//! Region sums only count towers above the noise cut; region maxima see
//! every tower.

pub mod aggregator;
pub mod calibration;
pub mod record;

pub use aggregator::CalorimeterSumAggregator;
pub use calibration::{CalibrationLookup, CalibrationTable, LinearCalibration};
pub use record::EventSummaryRecord;

use crate::geometry::{HB_MAX_ABS_IETA, HE_MAX_ABS_IETA, HF_MAX_ABS_IETA, HF_MIN_ABS_IETA};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// TOWER ID
// ═══════════════════════════════════════════════════════════════════════════════

/// Trigger tower address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TowerId {
    /// Signed pseudorapidity index
    pub ieta: i32,
    /// Azimuthal index
    pub iphi: i32,
}

impl TowerId {
    pub fn new(ieta: i32, iphi: i32) -> Self {
        Self { ieta, iphi }
    }

    #[inline]
    pub fn abs_ieta(&self) -> u32 {
        self.ieta.unsigned_abs()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DETECTOR REGIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Calorimeter region a tower belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaloRegion {
    /// Electromagnetic calorimeter
    Electromagnetic,
    /// Hadron barrel, |ieta| 1..=21
    HadronBarrel,
    /// Hadron endcap, |ieta| 22..=28
    HadronEndcap,
    /// Forward calorimeter, |ieta| 29..=32
    HadronForward,
}

impl CaloRegion {
    /// Summing bucket of a hadron tower, `None` outside |ieta| 0..=32
    pub fn hadron_bucket(abs_ieta: u32) -> Option<Self> {
        if abs_ieta <= HE_MAX_ABS_IETA {
            if abs_ieta <= HB_MAX_ABS_IETA {
                Some(Self::HadronBarrel)
            } else {
                Some(Self::HadronEndcap)
            }
        } else if (HF_MIN_ABS_IETA..=HF_MAX_ABS_IETA).contains(&abs_ieta) {
            Some(Self::HadronForward)
        } else {
            None
        }
    }

}

// ═══════════════════════════════════════════════════════════════════════════════
// CALORIMETER CELL
// ═══════════════════════════════════════════════════════════════════════════════

/// One trigger tower as delivered by the readout
///
/// The readout ships a short pulse of compressed Et samples; only the
/// sample of interest (`soi`) enters the sums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaloCell {
    pub id: TowerId,
    pub region: CaloRegion,
    /// Compressed Et per time sample
    pub samples: Vec<u16>,
    /// Index of the sample of interest
    #[serde(default)]
    pub soi: usize,
}

impl CaloCell {
    /// Single-sample tower
    pub fn new(id: TowerId, region: CaloRegion, compressed_et: u16) -> Self {
        Self {
            id,
            region,
            samples: vec![compressed_et],
            soi: 0,
        }
    }

    /// ECAL tower
    pub fn electromagnetic(ieta: i32, iphi: i32, compressed_et: u16) -> Self {
        Self::new(
            TowerId::new(ieta, iphi),
            CaloRegion::Electromagnetic,
            compressed_et,
        )
    }

    /// HCAL tower tagged by its |ieta| bucket (forward beyond the endcap)
    pub fn hadron(ieta: i32, iphi: i32, compressed_et: u16) -> Self {
        let id = TowerId::new(ieta, iphi);
        let region =
            CaloRegion::hadron_bucket(id.abs_ieta()).unwrap_or(CaloRegion::HadronForward);
        Self::new(id, region, compressed_et)
    }

    /// Tower with a full pulse
    pub fn with_pulse(id: TowerId, region: CaloRegion, samples: Vec<u16>, soi: usize) -> Self {
        Self {
            id,
            region,
            samples,
            soi,
        }
    }

    /// Compressed Et of the sample of interest (0 if the pulse is too short)
    #[inline]
    pub fn compressed_et(&self) -> u16 {
        self.samples.get(self.soi).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hadron_buckets() {
        assert_eq!(CaloRegion::hadron_bucket(0), Some(CaloRegion::HadronBarrel));
        assert_eq!(CaloRegion::hadron_bucket(1), Some(CaloRegion::HadronBarrel));
        assert_eq!(CaloRegion::hadron_bucket(21), Some(CaloRegion::HadronBarrel));
        assert_eq!(CaloRegion::hadron_bucket(22), Some(CaloRegion::HadronEndcap));
        assert_eq!(CaloRegion::hadron_bucket(28), Some(CaloRegion::HadronEndcap));
        assert_eq!(CaloRegion::hadron_bucket(29), Some(CaloRegion::HadronForward));
        assert_eq!(CaloRegion::hadron_bucket(32), Some(CaloRegion::HadronForward));
        assert_eq!(CaloRegion::hadron_bucket(33), None);
    }

    #[test]
    fn test_sample_of_interest() {
        let cell = CaloCell::with_pulse(
            TowerId::new(-3, 10),
            CaloRegion::HadronBarrel,
            vec![1, 9, 40, 7],
            2,
        );
        assert_eq!(cell.compressed_et(), 40);
        assert_eq!(cell.id.abs_ieta(), 3);

        let short = CaloCell::with_pulse(TowerId::new(1, 1), CaloRegion::HadronBarrel, vec![5], 3);
        assert_eq!(short.compressed_et(), 0);
    }

    #[test]
    fn test_hadron_constructor_tags_region() {
        assert_eq!(CaloCell::hadron(-25, 4, 1).region, CaloRegion::HadronEndcap);
        assert_eq!(CaloCell::hadron(30, 4, 1).region, CaloRegion::HadronForward);
        assert_eq!(CaloCell::electromagnetic(3, 4, 1).region, CaloRegion::Electromagnetic);
        assert_eq!(CaloRegion::hadron_bucket(3), Some(CaloRegion::HadronBarrel));
    }
}

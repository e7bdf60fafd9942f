//! Tracker hits and their sub-detector classification

use serde::{Deserialize, Serialize};

/// Tracker sub-detector a hit was recorded in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubDetector {
    PixelBarrel,
    PixelEndcap,
    /// Tracker inner barrel
    StripTib,
    /// Tracker inner disks
    StripTid,
    /// Tracker outer barrel
    StripTob,
    /// Tracker endcaps
    StripTec,
    Muon,
    Other,
}

impl SubDetector {
    /// Pixels, inner barrel and inner disks
    #[inline]
    pub fn is_inner(&self) -> bool {
        matches!(
            self,
            Self::PixelBarrel | Self::PixelEndcap | Self::StripTib | Self::StripTid
        )
    }

}

/// Hit interface used by the hit-sharing matcher
pub trait TrackHit {
    fn is_valid(&self) -> bool;
    fn subdetector(&self) -> SubDetector;
    /// Whether both hits were built from the same detector input
    fn shares_input(&self, other: &Self) -> bool;

    /// Valid hit in the inner tracker
    #[inline]
    fn is_inner_valid(&self) -> bool {
        self.is_valid() && self.subdetector().is_inner()
    }
}

/// A reconstructed tracker hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecHit {
    /// Hit passed the validity checks of the fit
    #[serde(default = "default_valid")]
    pub valid: bool,
    pub subdetector: SubDetector,
    /// Detector module id
    pub det_id: u32,
    /// Clusters the hit was built from
    #[serde(default)]
    pub clusters: Vec<u32>,
}

fn default_valid() -> bool {
    true
}

impl RecHit {
    pub fn new(subdetector: SubDetector, det_id: u32, clusters: Vec<u32>) -> Self {
        Self {
            valid: true,
            subdetector,
            det_id,
            clusters,
        }
    }

    pub fn invalid(subdetector: SubDetector, det_id: u32) -> Self {
        Self {
            valid: false,
            subdetector,
            det_id,
            clusters: Vec::new(),
        }
    }
}

impl TrackHit for RecHit {
    fn is_valid(&self) -> bool {
        self.valid
    }

    fn subdetector(&self) -> SubDetector {
        self.subdetector
    }

    /// Same module and every cluster shared
    fn shares_input(&self, other: &Self) -> bool {
        self.valid
            && other.valid
            && self.det_id == other.det_id
            && !self.clusters.is_empty()
            && self.clusters == other.clusters
    }
}

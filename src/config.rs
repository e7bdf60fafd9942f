//! Run configuration for the aggregator and the track matcher
//!
//! Defaults are the detector constants; a JSON file only needs to name the
//! fields it overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::MonitorError;
use crate::geometry::ConePhiWrap;
use crate::MonitorResult;

/// Maximum number of ECAL trigger towers read per event
pub const ECAL_TOWER_CAPACITY: usize = 4032;
/// HCAL trigger towers expected per event (4032 barrel/endcap + 144 forward)
pub const EXPECTED_HCAL_TOWERS: usize = 4176;
/// Raw counts at or below this value are treated as noise in region sums
pub const NOISE_THRESHOLD_COUNTS: u16 = 3;
/// ECAL compressed Et step
pub const ECAL_ET_LSB: f32 = 0.5;
/// Cone radius around the leading particle
pub const CONE_RADIUS: f64 = 0.5;
/// Leading particles must satisfy |η| < this bound
pub const PARTICLE_ETA_LIMIT: f64 = 5.0;
/// Generator status of a stable final-state particle
pub const STABLE_STATUS: i32 = 1;
/// Candidate tracks farther than this in (η, φ) are not scored
pub const TRACK_MATCH_MAX_DELTA_R: f64 = 0.3;

/// Calorimeter sum aggregator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// ECAL towers beyond this count are ignored
    pub ecal_capacity: usize,
    /// HCAL tower count checked once per event
    pub expected_hcal_cells: usize,
    /// Noise cut on raw counts (strictly greater passes)
    pub noise_threshold: u16,
    /// ECAL linear Et scale per count
    pub ecal_lsb: f32,
    /// Cone radius for the leading-particle sums
    pub cone_radius: f64,
    /// Open |η| bound for the leading particle
    pub particle_eta_limit: f64,
    /// Status code accepted for the leading particle
    pub stable_status: i32,
    /// Δφ handling inside the cone sums
    pub cone_phi_wrap: ConePhiWrap,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            ecal_capacity: ECAL_TOWER_CAPACITY,
            expected_hcal_cells: EXPECTED_HCAL_TOWERS,
            noise_threshold: NOISE_THRESHOLD_COUNTS,
            ecal_lsb: ECAL_ET_LSB,
            cone_radius: CONE_RADIUS,
            particle_eta_limit: PARTICLE_ETA_LIMIT,
            stable_status: STABLE_STATUS,
            cone_phi_wrap: ConePhiWrap::Literal,
        }
    }
}

impl AggregatorConfig {
    /// Squared cone radius used in the ΔR² comparison
    #[inline]
    pub fn cone_radius_sq(&self) -> f64 {
        self.cone_radius * self.cone_radius
    }

    pub fn validate(&self) -> MonitorResult<()> {
        if self.ecal_capacity == 0 {
            return Err(MonitorError::InvalidConfig(
                "ecal_capacity must be positive".to_string(),
            ));
        }
        if !(self.cone_radius.is_finite() && self.cone_radius > 0.0) {
            return Err(MonitorError::InvalidConfig(format!(
                "cone_radius must be positive, got {}",
                self.cone_radius
            )));
        }
        if !(self.ecal_lsb.is_finite() && self.ecal_lsb > 0.0) {
            return Err(MonitorError::InvalidConfig(format!(
                "ecal_lsb must be positive, got {}",
                self.ecal_lsb
            )));
        }
        if !(self.particle_eta_limit.is_finite() && self.particle_eta_limit > 0.0) {
            return Err(MonitorError::InvalidConfig(format!(
                "particle_eta_limit must be positive, got {}",
                self.particle_eta_limit
            )));
        }
        Ok(())
    }
}

/// Track hit-sharing matcher settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// (η, φ) window around the primary track
    pub max_delta_r: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            max_delta_r: TRACK_MATCH_MAX_DELTA_R,
        }
    }
}

impl MatcherConfig {
    pub fn validate(&self) -> MonitorResult<()> {
        if !(self.max_delta_r.is_finite() && self.max_delta_r >= 0.0) {
            return Err(MonitorError::InvalidConfig(format!(
                "max_delta_r must be non-negative, got {}",
                self.max_delta_r
            )));
        }
        Ok(())
    }
}

/// Combined configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub aggregator: AggregatorConfig,
    pub matcher: MatcherConfig,
}

impl MonitorConfig {
    /// Load and validate a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> MonitorResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> MonitorResult<()> {
        self.aggregator.validate()?;
        self.matcher.validate()
    }
}

//! # Detector Monitor
//!
//! Event-by-event monitoring of calorimeter trigger primitives and matching
//! of electron tracks to general tracks.
//!
//! ## Features
//! - ECAL / HB / HE / HF trigger-tower Et sums and maxima with a noise cut
//! - Leading stable generator particle and Et in a ΔR < 0.5 cone around it
//! - Fixed 18-column summary ntuple (CSV or JSON Lines)
//! - Electron track → general track association by shared inner hits
//!
//! ## Architecture
//!
//! ```text
//!   EventInput ──► CalorimeterSumAggregator ──► EventSummaryRecord ──► OutputSink
//!                          ▲
//!                CalibrationLookup
//!
//!   TrackSource ──► TrackHitShareMatcher ──► MatchResult
//! ```
//!
//! Both components are plain values driven by explicit arguments; there is
//! no global event state.

// Core modules
pub mod config;
pub mod error;
pub mod geometry;

// Calorimeter monitoring
pub mod calorimeter;
pub mod event;
pub mod particles;
pub mod sink;

// Track matching
pub mod tracking;

// Run summaries
pub mod metrics;


pub use calorimeter::{
    CaloCell, CaloRegion, CalibrationLookup, CalibrationTable, CalorimeterSumAggregator,
    EventSummaryRecord, LinearCalibration, TowerId,
};
pub use config::{AggregatorConfig, MatcherConfig, MonitorConfig};
pub use error::MonitorError;
pub use event::{CaloEvent, EventInput, EventReader};
pub use geometry::ConePhiWrap;
pub use metrics::{AggregatorStats, Histogram, MatchStats};
pub use particles::{select_leading_particle, ParticleCandidate};
pub use sink::{MemorySink, NtupleFormat, NtupleWriter, OutputSink};
pub use tracking::{
    ElectronCoreMatch, MatchResult, RecHit, SubDetector, Track, TrackHit, TrackHitShareMatcher,
    TrackLike, TrackMatchEvent, TrackSource,
};

/// Result type for monitoring operations
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        // Calorimeter
        CaloCell,
        CaloEvent,
        CalibrationLookup,
        CalorimeterSumAggregator,
        EventInput,
        EventSummaryRecord,
        OutputSink,
        ParticleCandidate,

        // Tracking
        MatchResult,
        Track,
        TrackHitShareMatcher,
        TrackSource,

        // Config and results
        MonitorConfig,
        MonitorError,
        MonitorResult,
    };
}

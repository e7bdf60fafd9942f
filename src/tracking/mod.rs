//! # Electron Track Matching
//!
//! Associates each electron (primary) track with the general track that
//! shares the largest fraction of its inner-tracker hits.
//!
//! ```text
//!   primary ──► ΔR ≤ 0.3 window ──► valid pixel / TIB / TID hits
//!                                          │
//!   candidates ────────────────────────────┴──► shared / min(n_inner) ──► best candidate
//! ```

pub mod hits;
pub mod matcher;
pub mod track;

pub use hits::{RecHit, SubDetector, TrackHit};
pub use matcher::{ElectronCoreMatch, MatchResult, TrackHitShareMatcher};
pub use track::{Track, TrackEventReader, TrackLike, TrackMatchEvent, TrackPair, TrackSource};

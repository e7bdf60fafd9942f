//! Tracks and the per-event track collections

use serde::{Deserialize, Serialize};

use super::hits::{RecHit, TrackHit};
use crate::event::JsonLinesReader;

/// Track interface used by the hit-sharing matcher
pub trait TrackLike {
    type Hit: TrackHit;

    fn eta(&self) -> f64;
    fn phi(&self) -> f64;
    /// Hits in fit order
    fn hits(&self) -> &[Self::Hit];

    /// Valid hits in the inner tracker
    fn inner_hits(&self) -> Vec<&Self::Hit> {
        self.hits().iter().filter(|h| h.is_inner_valid()).collect()
    }
}

/// A reconstructed track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    #[serde(default)]
    pub hits: Vec<RecHit>,
}

impl Track {
    pub fn new(pt: f64, eta: f64, phi: f64, hits: Vec<RecHit>) -> Self {
        Self { pt, eta, phi, hits }
    }
}

impl TrackLike for Track {
    type Hit = RecHit;

    fn eta(&self) -> f64 {
        self.eta
    }

    fn phi(&self) -> f64 {
        self.phi
    }

    fn hits(&self) -> &[RecHit] {
        &self.hits
    }
}

/// One primary track and the candidates it is matched against
pub trait TrackSource {
    type Track: TrackLike;

    fn primary_track(&self) -> &Self::Track;
    fn candidate_tracks(&self) -> &[Self::Track];
}

/// Borrowed primary/candidates view
#[derive(Debug, Clone, Copy)]
pub struct TrackPair<'a, T> {
    pub primary: &'a T,
    pub candidates: &'a [T],
}

impl<'a, T: TrackLike> TrackSource for TrackPair<'a, T> {
    type Track = T;

    fn primary_track(&self) -> &T {
        self.primary
    }

    fn candidate_tracks(&self) -> &[T] {
        self.candidates
    }
}

/// Track collections of one event
///
/// `primary_tracks` are the electron tracks, `candidate_tracks` the general
/// track collection they are matched to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackMatchEvent {
    #[serde(default)]
    pub primary_tracks: Vec<Track>,
    #[serde(default)]
    pub candidate_tracks: Vec<Track>,
}

impl TrackMatchEvent {
    pub fn new(primary_tracks: Vec<Track>, candidate_tracks: Vec<Track>) -> Self {
        Self {
            primary_tracks,
            candidate_tracks,
        }
    }

    /// One view per primary track
    pub fn pairs(&self) -> impl Iterator<Item = TrackPair<'_, Track>> + '_ {
        self.primary_tracks.iter().map(move |primary| TrackPair {
            primary,
            candidates: &self.candidate_tracks,
        })
    }
}

/// Reader for track events
pub type TrackEventReader = JsonLinesReader<TrackMatchEvent>;

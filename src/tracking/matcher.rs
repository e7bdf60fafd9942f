//! Electron-track to general-track matching by shared inner hits
//!
//! For each candidate inside a ΔR window around the primary track, count
//! the primary's inner-tracker hits that share input with one of the
//! candidate's inner hits, and normalise by the smaller inner-hit count:
//!
//! ```text
//!   fraction = shared / min(n_inner(primary), n_inner(candidate))
//! ```
//!
//! The candidate with the strictly greatest fraction wins; ties keep the
//! earlier candidate and a fraction of 0 never matches.

use serde::{Deserialize, Serialize};

use super::hits::TrackHit;
use super::track::{Track, TrackLike, TrackMatchEvent, TrackSource};
use crate::config::MatcherConfig;
use crate::geometry::delta_r;

/// Best candidate for one primary track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Index into the candidate collection
    pub candidate: Option<usize>,
    /// Shared inner-hit fraction in [0, 1]
    pub shared_fraction: f32,
}

impl MatchResult {
    pub fn new(candidate: Option<usize>, shared_fraction: f32) -> Self {
        Self {
            candidate,
            shared_fraction,
        }
    }

    /// No candidate qualified
    pub fn none() -> Self {
        Self::new(None, 0.0)
    }

    pub fn is_match(&self) -> bool {
        self.candidate.is_some()
    }
}

impl Default for MatchResult {
    fn default() -> Self {
        Self::none()
    }
}

/// Match result tagged with the primary track it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElectronCoreMatch {
    /// Index into the primary collection
    pub primary: usize,
    #[serde(flatten)]
    pub result: MatchResult,
}

/// Greedy shared-hit matcher
#[derive(Debug, Clone, Default)]
pub struct TrackHitShareMatcher {
    config: MatcherConfig,
}

impl TrackHitShareMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Best candidate for `primary` among `candidates`
    pub fn best_match<T: TrackLike>(&self, primary: &T, candidates: &[T]) -> MatchResult {
        let primary_inner = primary.inner_hits();
        let mut best = MatchResult::none();

        for (index, candidate) in candidates.iter().enumerate() {
            let distance = delta_r(primary.eta(), primary.phi(), candidate.eta(), candidate.phi());
            if distance > self.config.max_delta_r {
                continue;
            }

            let candidate_inner = candidate.inner_hits();
            if primary_inner.is_empty() || candidate_inner.is_empty() {
                continue;
            }

            let shared = count_shared(&primary_inner, &candidate_inner);
            let fraction = shared as f32 / primary_inner.len().min(candidate_inner.len()) as f32;
            log::trace!(
                "Candidate {}: dR {:.3}, {} shared of {}/{} inner hits",
                index,
                distance,
                shared,
                primary_inner.len(),
                candidate_inner.len()
            );

            if fraction > best.shared_fraction {
                best = MatchResult::new(Some(index), fraction);
            }
        }

        best
    }

    /// Match the primary track of a [`TrackSource`]
    pub fn match_source<S: TrackSource + ?Sized>(&self, source: &S) -> MatchResult {
        self.best_match(source.primary_track(), source.candidate_tracks())
    }

    /// Match every primary track of an event
    pub fn match_event(&self, event: &TrackMatchEvent) -> Vec<ElectronCoreMatch> {
        event
            .pairs()
            .enumerate()
            .map(|(primary, pair)| {
                let result = self.match_source(&pair);
                log::debug!(
                    "Primary track {} -> {:?} (fraction {:.3})",
                    primary,
                    result.candidate,
                    result.shared_fraction
                );
                ElectronCoreMatch { primary, result }
            })
            .collect()
    }

    /// Convenience wrapper for owned tracks
    pub fn match_tracks(&self, primary: &Track, candidates: &[Track]) -> MatchResult {
        self.best_match(primary, candidates)
    }
}

/// Primary hits that share input with some candidate hit.
///
/// Each primary hit stops scanning at its first shared candidate hit.
fn count_shared<H: TrackHit>(primary: &[&H], candidate: &[&H]) -> usize {
    primary
        .iter()
        .filter(|p| candidate.iter().any(|c| p.shares_input(c)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::hits::{RecHit, SubDetector};

    fn inner_hits(det_ids: &[u32]) -> Vec<RecHit> {
        det_ids
            .iter()
            .map(|&id| RecHit::new(SubDetector::PixelBarrel, id, vec![id * 10]))
            .collect()
    }

    fn matcher() -> TrackHitShareMatcher {
        TrackHitShareMatcher::new(MatcherConfig::default())
    }

    #[test]
    fn test_identical_tracks_share_everything() {
        let primary = Track::new(20.0, 0.5, 1.0, inner_hits(&[1, 2, 3, 4, 5]));
        let result = matcher().best_match(&primary, std::slice::from_ref(&primary));
        assert_eq!(result.candidate, Some(0));
        assert_eq!(result.shared_fraction, 1.0);
    }

    #[test]
    fn test_empty_candidates() {
        let primary = Track::new(20.0, 0.5, 1.0, inner_hits(&[1, 2, 3]));
        let result = matcher().best_match(&primary, &[]);
        assert_eq!(result, MatchResult::none());
        assert!(!result.is_match());
    }

    #[test]
    fn test_outside_window_is_excluded() {
        let primary = Track::new(20.0, 0.0, 0.0, inner_hits(&[1, 2, 3]));
        let far_eta = Track::new(20.0, 0.31, 0.0, inner_hits(&[1, 2, 3]));
        let far_phi = Track::new(20.0, 0.0, -0.35, inner_hits(&[1, 2, 3]));
        let result = matcher().best_match(&primary, &[far_eta, far_phi]);
        assert_eq!(result.candidate, None);
        assert_eq!(result.shared_fraction, 0.0);
    }

    #[test]
    fn test_window_wraps_in_phi() {
        let primary = Track::new(20.0, 0.0, 3.1, inner_hits(&[1, 2]));
        let across = Track::new(20.0, 0.0, -3.1, inner_hits(&[1, 2]));
        let result = matcher().best_match(&primary, &[across]);
        assert_eq!(result.candidate, Some(0));
    }

    #[test]
    fn test_fraction_uses_smaller_inner_count() {
        let primary = Track::new(20.0, 0.0, 0.0, inner_hits(&[1, 2, 3, 4, 5, 6]));
        let short = Track::new(20.0, 0.05, 0.05, inner_hits(&[1, 2, 9]));
        let result = matcher().best_match(&primary, &[short]);
        assert_eq!(result.candidate, Some(0));
        assert!((result.shared_fraction - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_only_valid_inner_hits_count() {
        let mut primary_hits = inner_hits(&[1, 2]);
        primary_hits.push(RecHit::new(SubDetector::StripTob, 3, vec![30]));
        primary_hits.push(RecHit::invalid(SubDetector::PixelBarrel, 4));
        let primary = Track::new(20.0, 0.0, 0.0, primary_hits);

        let mut candidate_hits = inner_hits(&[1]);
        candidate_hits.push(RecHit::new(SubDetector::StripTob, 3, vec![30]));
        let candidate = Track::new(20.0, 0.0, 0.0, candidate_hits);

        let result = matcher().best_match(&primary, &[candidate]);
        assert_eq!(result.shared_fraction, 1.0);
    }

    #[test]
    fn test_candidate_without_inner_hits_skipped() {
        let primary = Track::new(20.0, 0.0, 0.0, inner_hits(&[1, 2]));
        let outer_only = Track::new(
            20.0,
            0.0,
            0.0,
            vec![RecHit::new(SubDetector::StripTec, 1, vec![10])],
        );
        assert_eq!(matcher().best_match(&primary, &[outer_only]), MatchResult::none());
    }

    #[test]
    fn test_zero_fraction_never_matches() {
        let primary = Track::new(20.0, 0.0, 0.0, inner_hits(&[1, 2]));
        let disjoint = Track::new(20.0, 0.0, 0.0, inner_hits(&[7, 8]));
        assert_eq!(matcher().best_match(&primary, &[disjoint]), MatchResult::none());
    }

    #[test]
    fn test_tie_keeps_earlier_candidate() {
        let primary = Track::new(20.0, 0.0, 0.0, inner_hits(&[1, 2, 3, 4]));
        let first = Track::new(20.0, 0.1, 0.0, inner_hits(&[1, 2, 8, 9]));
        let second = Track::new(20.0, 0.0, 0.0, inner_hits(&[3, 4, 8, 9]));
        let better = Track::new(20.0, 0.0, 0.1, inner_hits(&[1, 2, 3, 9]));

        let result = matcher().best_match(&primary, &[first.clone(), second.clone()]);
        assert_eq!(result.candidate, Some(0));
        assert_eq!(result.shared_fraction, 0.5);

        let result = matcher().best_match(&primary, &[first, second, better]);
        assert_eq!(result.candidate, Some(2));
        assert_eq!(result.shared_fraction, 0.75);
    }

    #[test]
    fn test_match_event() {
        let event = TrackMatchEvent::new(
            vec![
                Track::new(20.0, 0.0, 0.0, inner_hits(&[1, 2, 3])),
                Track::new(15.0, 2.0, -1.0, inner_hits(&[4, 5])),
            ],
            vec![
                Track::new(3.0, 1.0, 1.0, inner_hits(&[4, 5])),
                Track::new(19.0, 0.01, 0.0, inner_hits(&[1, 2, 3])),
            ],
        );
        let matches = matcher().match_event(&event);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].primary, 0);
        assert_eq!(matches[0].result.candidate, Some(1));
        assert_eq!(matches[1].result, MatchResult::none());
    }
}

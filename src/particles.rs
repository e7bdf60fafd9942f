//! Generator-level particle candidates
//!
//! The monitor looks for the hardest stable particle inside the detector
//! acceptance and uses its direction as the cone axis.

use serde::{Deserialize, Serialize};

use crate::geometry::{ConePhiWrap, tower_eta, tower_phi};

/// A generator particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleCandidate {
    /// PDG particle code
    pub pdg_id: i32,
    /// Generator status code
    pub status: i32,
    /// Transverse momentum
    pub pt: f64,
    /// Pseudorapidity
    pub eta: f64,
    /// Azimuthal angle
    pub phi: f64,
}

impl ParticleCandidate {
    pub fn new(pdg_id: i32, status: i32, pt: f64, eta: f64, phi: f64) -> Self {
        Self {
            pdg_id,
            status,
            pt,
            eta,
            phi,
        }
    }

    /// Squared (η, φ) distance to a tower centre, `None` off the η table
    pub fn tower_delta_r_sq(&self, ieta: i32, iphi: i32, wrap: ConePhiWrap) -> Option<f64> {
        let deta = self.eta - tower_eta(ieta)?;
        let dphi = wrap.apply(self.phi - tower_phi(iphi));
        Some(deta * deta + dphi * dphi)
    }
}

/// Pick the highest-pt particle with the given status and |η| < `eta_limit`.
///
/// Only a strictly greater pt replaces the current choice, so the earliest
/// particle reaching the maximum is kept. Particles with pt ≤ 0 are never
/// selected.
pub fn select_leading_particle(
    particles: &[ParticleCandidate],
    stable_status: i32,
    eta_limit: f64,
) -> Option<&ParticleCandidate> {
    let mut best: Option<&ParticleCandidate> = None;
    let mut best_pt = 0.0;
    for p in particles {
        if p.status == stable_status && best_pt < p.pt && p.eta > -eta_limit && p.eta < eta_limit {
            best_pt = p.pt;
            best = Some(p);
        }
    }
    best
}

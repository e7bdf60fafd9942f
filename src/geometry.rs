//! Trigger tower geometry in (η, φ) space
//!
//! Towers are addressed by an integer pseudorapidity index `ieta`
//! (signed, |ieta| in 1..=32) and an azimuthal index `iphi`
//! (72 towers around the beam, 5° each).
//!
//! ```text
//!   |ieta|   1 ........ 21 | 22 ..... 28 | 29 ... 32
//!            HCAL barrel   | HCAL endcap | forward (HF)
//!            ECAL covers |ieta| 1..=28
//! ```
//!
//! Tower centres in η come from a fixed lookup table; φ is mapped linearly
//! and folded into (-π, π].

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Highest |ieta| covered by the HCAL barrel
pub const HB_MAX_ABS_IETA: u32 = 21;
/// Highest |ieta| covered by the HCAL endcap
pub const HE_MAX_ABS_IETA: u32 = 28;
/// Lowest |ieta| of the forward calorimeter
pub const HF_MIN_ABS_IETA: u32 = 29;
/// Highest |ieta| of the forward calorimeter
pub const HF_MAX_ABS_IETA: u32 = 32;

/// Number of φ towers that span the full circle
pub const N_PHI_TOWERS: i32 = 72;

/// Tower η bin centres indexed by |ieta|. Bin 0 is a dummy.
pub const TOWER_ETA_LUT: [f64; 33] = [
    0.0000, 0.0435, 0.1305, 0.2175, 0.3045, 0.3915, 0.4785, 0.5655, 0.6525, 0.7395, //
    0.8265, 0.9135, 1.0005, 1.0875, 1.1745, 1.2615, 1.3485, 1.4355, 1.5225, 1.6095, //
    1.6965, 1.7850, 1.8800, 1.9865, 2.1075, 2.2470, 2.4110, 2.5750, 2.8250, 3.3250, //
    3.8250, 4.3250, 4.825,
];

/// Threshold of the cone Δφ wrap-down branch.
///
/// The recorded value is `2 × 3.1415827`, which sits just below 2π. Angles
/// built from folded φ values almost never exceed it, so the branch is
/// effectively dead. See [`ConePhiWrap::Shortest`] for a proper fold.
pub const CONE_PHI_WRAP_LIMIT: f64 = 2.0 * 3.1415827;

/// How the Δφ between a particle and a tower is corrected in cone sums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConePhiWrap {
    /// Subtract 2π only when Δφ exceeds [`CONE_PHI_WRAP_LIMIT`]
    #[default]
    Literal,
    /// Fold Δφ onto the shortest arc, |Δφ| ≤ π
    Shortest,
}

impl ConePhiWrap {
    /// Apply the correction to a raw `phi_a - phi_b` difference
    #[inline]
    pub fn apply(self, delta_phi: f64) -> f64 {
        match self {
            Self::Literal => {
                if delta_phi > CONE_PHI_WRAP_LIMIT {
                    delta_phi - 2.0 * PI
                } else {
                    delta_phi
                }
            }
            Self::Shortest => fold_phi(delta_phi),
        }
    }
}

/// Signed tower η centre for a raw `ieta`.
///
/// Returns `None` when |ieta| is beyond the lookup table.
#[inline]
pub fn tower_eta(ieta: i32) -> Option<f64> {
    let abs_ieta = ieta.unsigned_abs() as usize;
    TOWER_ETA_LUT
        .get(abs_ieta)
        .map(|&centre| f64::from(ieta.signum()) * centre)
}

/// Tower φ centre for a raw `iphi`: `iphi · π / 36`, folded down by 2π above π
#[inline]
pub fn tower_phi(iphi: i32) -> f64 {
    let phi = f64::from(iphi) * PI / 36.0;
    if phi > PI {
        phi - 2.0 * PI
    } else {
        phi
    }
}

/// Fold an angle difference into [-π, π]
#[inline]
pub fn fold_phi(delta_phi: f64) -> f64 {
    let mut d = delta_phi % (2.0 * PI);
    if d > PI {
        d -= 2.0 * PI;
    } else if d < -PI {
        d += 2.0 * PI;
    }
    d
}

/// Absolute Δφ along the shorter arc.
///
/// Only a single fold is applied: `|Δφ| > π` becomes `2π - |Δφ|`.
#[inline]
pub fn abs_delta_phi(phi_a: f64, phi_b: f64) -> f64 {
    let diff = (phi_a - phi_b).abs();
    if diff > PI {
        2.0 * PI - diff
    } else {
        diff
    }
}

/// Euclidean distance in (η, φ) using the shorter φ arc
#[inline]
pub fn delta_r(eta_a: f64, phi_a: f64, eta_b: f64, phi_b: f64) -> f64 {
    let deta = eta_a - eta_b;
    let dphi = abs_delta_phi(phi_a, phi_b);
    (deta * deta + dphi * dphi).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tower_eta_sign_follows_ieta() {
        assert_eq!(tower_eta(5), Some(0.3915));
        assert_eq!(tower_eta(-5), Some(-0.3915));
        assert_eq!(tower_eta(32), Some(4.825));
        assert_eq!(tower_eta(0), Some(0.0));
        assert_eq!(tower_eta(33), None);
        assert_eq!(tower_eta(-40), None);
    }

    #[test]
    fn test_tower_phi_full_turn() {
        // 72 towers make a full turn, so index 72 lands back on index 0
        let phi_0 = tower_phi(0);
        let phi_72 = tower_phi(N_PHI_TOWERS);
        assert!((phi_0 - phi_72).abs() < 1e-9);
    }

    #[test]
    fn test_tower_phi_folds_above_pi() {
        assert!((tower_phi(18) - PI / 2.0).abs() < 1e-12);
        assert!((tower_phi(54) + PI / 2.0).abs() < 1e-9);
        assert!(tower_phi(37) < 0.0);
    }

    #[test]
    fn test_literal_wrap_is_inert_for_folded_angles() {
        let d = PI - (-PI + 0.01);
        assert_eq!(ConePhiWrap::Literal.apply(d), d);
        assert!((ConePhiWrap::Shortest.apply(d) + 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_literal_wrap_fires_above_limit() {
        let wrapped = ConePhiWrap::Literal.apply(6.3);
        assert!((wrapped - (6.3 - 2.0 * PI)).abs() < 1e-12);
        assert_eq!(ConePhiWrap::Literal.apply(6.28), 6.28);

        let particle = crate::particles::ParticleCandidate::new(11, 1, 10.0, 0.0435, 6.3);
        let d2 = particle.tower_delta_r_sq(1, 0, ConePhiWrap::Literal);
        assert!(d2.is_some_and(|d| d < 0.25));
    }

    #[test]
    fn test_tower_phi_half_turn_stays_positive() {
        // iphi 36 sits exactly on π and is not folded
        assert!(tower_phi(36) > 0.0);
        assert!((tower_phi(36) - PI).abs() < 1e-12);
    }

    #[test]
    fn test_abs_delta_phi_shortest_arc() {
        let d = abs_delta_phi(3.0, -3.0);
        assert!((d - (2.0 * PI - 6.0)).abs() < 1e-12);
        assert!((abs_delta_phi(0.1, 0.3) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_delta_r_symmetry() {
        let a = delta_r(0.5, 3.1, -0.2, -3.0);
        let b = delta_r(-0.2, -3.0, 0.5, 3.1);
        assert!((a - b).abs() < 1e-12);
    }
}

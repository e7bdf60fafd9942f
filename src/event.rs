//! # Event Input
//!
//! Events reach the aggregator through the [`EventInput`] trait. The crate
//! ships a serde-backed [`CaloEvent`] and a JSON Lines reader for it:
//!
//! ```text
//! {"ecal": [{"id": {"ieta": 3, "iphi": 7}, "region": "electromagnetic", "samples": [12]}],
//!  "hcal": [...],
//!  "particles": [{"pdg_id": 11, "status": 1, "pt": 25.0, "eta": 0.4, "phi": 1.2}]}
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::calorimeter::{CaloCell, CaloRegion, TowerId};
use crate::config::{ECAL_TOWER_CAPACITY, EXPECTED_HCAL_TOWERS};
use crate::error::MonitorError;
use crate::geometry::{HE_MAX_ABS_IETA, HF_MAX_ABS_IETA, N_PHI_TOWERS};
use crate::particles::ParticleCandidate;
use crate::MonitorResult;

/// Collections read by the calorimeter aggregator for one event
pub trait EventInput {
    fn electromagnetic_cells(&self) -> &[CaloCell];
    fn hadron_cells(&self) -> &[CaloCell];
    fn particles(&self) -> &[ParticleCandidate];
}

/// Owned event record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaloEvent {
    #[serde(default)]
    pub ecal: Vec<CaloCell>,
    #[serde(default)]
    pub hcal: Vec<CaloCell>,
    #[serde(default)]
    pub particles: Vec<ParticleCandidate>,
}

impl EventInput for CaloEvent {
    fn electromagnetic_cells(&self) -> &[CaloCell] {
        &self.ecal
    }

    fn hadron_cells(&self) -> &[CaloCell] {
        &self.hcal
    }

    fn particles(&self) -> &[ParticleCandidate] {
        &self.particles
    }
}

impl CaloEvent {
    pub fn new(
        ecal: Vec<CaloCell>,
        hcal: Vec<CaloCell>,
        particles: Vec<ParticleCandidate>,
    ) -> Self {
        Self {
            ecal,
            hcal,
            particles,
        }
    }

    /// Full-detector synthetic event
    ///
    /// Produces 4032 ECAL towers (|ieta| 1..=28), 4176 HCAL towers
    /// (|ieta| 1..=28 plus 144 forward towers on every fourth iphi of
    /// |ieta| 29..=32) and `n_particles` generator particles.
    pub fn synthetic<R: Rng>(rng: &mut R, n_particles: usize) -> Self {
        let mut ecal = Vec::with_capacity(ECAL_TOWER_CAPACITY);
        let mut hcal = Vec::with_capacity(EXPECTED_HCAL_TOWERS);

        for abs_ieta in 1..=HE_MAX_ABS_IETA as i32 {
            for side in [-1, 1] {
                for iphi in 1..=N_PHI_TOWERS {
                    let ieta = side * abs_ieta;
                    ecal.push(CaloCell::electromagnetic(ieta, iphi, noise_count(rng)));
                    hcal.push(CaloCell::hadron(ieta, iphi, noise_count(rng)));
                }
            }
        }
        for abs_ieta in (HE_MAX_ABS_IETA + 1) as i32..=HF_MAX_ABS_IETA as i32 {
            for side in [-1, 1] {
                for iphi in (1..=N_PHI_TOWERS).step_by(4) {
                    hcal.push(CaloCell::new(
                        TowerId::new(side * abs_ieta, iphi),
                        CaloRegion::HadronForward,
                        noise_count(rng),
                    ));
                }
            }
        }

        let particles = (0..n_particles)
            .map(|_| {
                ParticleCandidate::new(
                    SYNTHETIC_PDG_CODES[rng.gen_range(0..SYNTHETIC_PDG_CODES.len())],
                    rng.gen_range(1..=3),
                    rng.gen_range(0.5..80.0),
                    rng.gen_range(-5.5..5.5),
                    rng.gen_range(-std::f64::consts::PI..std::f64::consts::PI),
                )
            })
            .collect();

        Self::new(ecal, hcal, particles)
    }
}

const SYNTHETIC_PDG_CODES: [i32; 6] = [11, -11, 22, 211, -211, 13];

/// Mostly-quiet tower with an occasional deposit
fn noise_count<R: Rng>(rng: &mut R) -> u16 {
    if rng.gen_bool(0.05) {
        rng.gen_range(4..120)
    } else {
        rng.gen_range(0..4)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSON LINES READER
// ═══════════════════════════════════════════════════════════════════════════════

/// Streams JSON Lines records, one per non-blank line
pub struct JsonLinesReader<T> {
    lines: Lines<Box<dyn BufRead>>,
    line_no: usize,
    _marker: std::marker::PhantomData<T>,
}

impl<T: serde::de::DeserializeOwned> JsonLinesReader<T> {
    pub fn open(path: impl AsRef<Path>) -> MonitorResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        log::info!("Reading events from {:?}", path);
        Ok(Self::from_reader(BufReader::new(file)))
    }

    pub fn from_reader(reader: impl BufRead + 'static) -> Self {
        let boxed: Box<dyn BufRead> = Box::new(reader);
        Self {
            lines: boxed.lines(),
            line_no: 0,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T: serde::de::DeserializeOwned> Iterator for JsonLinesReader<T> {
    type Item = MonitorResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(serde_json::from_str(&line).map_err(|e| {
                MonitorError::MalformedEvent {
                    line: self.line_no,
                    message: e.to_string(),
                }
            }));
        }
    }
}

/// Reader for calorimeter events
pub type EventReader = JsonLinesReader<CaloEvent>;

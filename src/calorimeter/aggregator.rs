//! Per-event calorimeter trigger-primitive aggregation
//!
//! ```rust,ignore
//! use detector_monitor::{CalorimeterSumAggregator, AggregatorConfig, LinearCalibration};
//!
//! let mut aggregator = CalorimeterSumAggregator::new(AggregatorConfig::default());
//! let record = aggregator.process(&event, &LinearCalibration::default());
//! sink.append(&record)?;
//! ```

use super::calibration::CalibrationLookup;
use super::record::EventSummaryRecord;
use super::{CaloCell, CaloRegion};
use crate::config::AggregatorConfig;
use crate::event::EventInput;
use crate::metrics::AggregatorStats;
use crate::particles::{select_leading_particle, ParticleCandidate};
use crate::sink::OutputSink;
use crate::MonitorResult;

/// Running sum and maximum of one region
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct RegionTotals {
    sum: f32,
    max: f32,
}

impl RegionTotals {
    /// The sum only takes towers above the noise cut, the maximum takes all
    #[inline]
    fn add(&mut self, raw_count: u16, et: f32, noise_threshold: u16) {
        if raw_count > noise_threshold {
            self.sum += et;
        }
        if et > self.max {
            self.max = et;
        }
    }
}

/// Et inside the cone around the leading particle
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConeSums {
    /// ECAL + HCAL
    pub total: f32,
    /// HCAL only
    pub hadronic: f32,
}

/// Sums calibrated trigger-tower Et per region and around the leading particle
#[derive(Debug, Clone, Default)]
pub struct CalorimeterSumAggregator {
    config: AggregatorConfig,
    stats: AggregatorStats,
}

impl CalorimeterSumAggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self {
            config,
            stats: AggregatorStats::default(),
        }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    pub fn stats(&self) -> &AggregatorStats {
        &self.stats
    }

    /// Summarise one event
    pub fn process<E, C>(&mut self, event: &E, calibration: &C) -> EventSummaryRecord
    where
        E: EventInput + ?Sized,
        C: CalibrationLookup + ?Sized,
    {
        let cfg = &self.config;
        let threshold = cfg.noise_threshold;

        let all_ecal = event.electromagnetic_cells();
        let ecal = &all_ecal[..all_ecal.len().min(cfg.ecal_capacity)];
        let hcal = event.hadron_cells();

        let mut ecal_totals = RegionTotals::default();
        for cell in ecal {
            let raw = cell.compressed_et();
            ecal_totals.add(raw, self.ecal_et(raw), threshold);
        }

        let hcal_count_ok = hcal.len() == cfg.expected_hcal_cells;
        if !hcal_count_ok {
            log::warn!(
                "There are {} HCAL towers instead of {}",
                hcal.len(),
                cfg.expected_hcal_cells
            );
        }

        let mut hb = RegionTotals::default();
        let mut he = RegionTotals::default();
        let mut hf = RegionTotals::default();
        for cell in hcal {
            let raw = cell.compressed_et();
            let et = hcal_et(cell, calibration);
            match CaloRegion::hadron_bucket(cell.id.abs_ieta()) {
                Some(CaloRegion::HadronBarrel) => hb.add(raw, et, threshold),
                Some(CaloRegion::HadronEndcap) => he.add(raw, et, threshold),
                Some(CaloRegion::HadronForward) => hf.add(raw, et, threshold),
                _ => {}
            }
        }

        let mut record = EventSummaryRecord {
            n_ecal_cells: ecal.len() as f32,
            ecal_sum: ecal_totals.sum,
            ecal_max: ecal_totals.max,
            n_hcal_cells: hcal.len() as f32,
            hb_sum: hb.sum,
            hb_max: hb.max,
            he_sum: he.sum,
            he_max: he.max,
            hf_sum: hf.sum,
            hf_max: hf.max,
            et_sum: ecal_totals.sum + hb.sum + he.sum + hf.sum,
            ..Default::default()
        };

        let leading =
            select_leading_particle(event.particles(), cfg.stable_status, cfg.particle_eta_limit);
        if let Some(particle) = leading {
            let cone = self.cone_sums(particle, ecal, hcal, calibration);
            record.id = particle.pdg_id as f32;
            record.status = particle.status as f32;
            record.pt = particle.pt as f32;
            record.eta = particle.eta as f32;
            record.phi = particle.phi as f32;
            record.cone_et_sum = cone.total;
            record.hcal_cone_et_sum = cone.hadronic;
        }

        log::debug!(
            "Event summary: {} ECAL / {} HCAL towers, Et sum {:.1}, leading pt {:.1}, cone Et {:.1}",
            ecal.len(),
            hcal.len(),
            record.et_sum,
            record.pt,
            record.cone_et_sum
        );

        self.stats.record(&record, hcal_count_ok);
        record
    }

    /// Summarise one event and append the record to `sink`
    pub fn process_into<E, C, S>(
        &mut self,
        event: &E,
        calibration: &C,
        sink: &mut S,
    ) -> MonitorResult<EventSummaryRecord>
    where
        E: EventInput + ?Sized,
        C: CalibrationLookup + ?Sized,
        S: OutputSink + ?Sized,
    {
        let record = self.process(event, calibration);
        sink.append(&record)?;
        Ok(record)
    }

    /// Et inside the cone around `particle`.
    ///
    /// Every tower counts regardless of the noise cut; towers whose |ieta|
    /// is off the η table are skipped.
    pub fn cone_sums<C>(
        &self,
        particle: &ParticleCandidate,
        ecal: &[CaloCell],
        hcal: &[CaloCell],
        calibration: &C,
    ) -> ConeSums
    where
        C: CalibrationLookup + ?Sized,
    {
        let radius_sq = self.config.cone_radius_sq();
        let wrap = self.config.cone_phi_wrap;
        let in_cone = |cell: &CaloCell| {
            particle
                .tower_delta_r_sq(cell.id.ieta, cell.id.iphi, wrap)
                .is_some_and(|d| d < radius_sq)
        };

        let mut sums = ConeSums::default();
        for cell in ecal.iter().filter(|c| in_cone(*c)) {
            sums.total += self.ecal_et(cell.compressed_et());
        }
        for cell in hcal.iter().filter(|c| in_cone(*c)) {
            let et = hcal_et(cell, calibration);
            sums.total += et;
            sums.hadronic += et;
        }
        sums
    }

    #[inline]
    fn ecal_et(&self, raw_count: u16) -> f32 {
        f32::from(raw_count) * self.config.ecal_lsb
    }
}

#[inline]
fn hcal_et<C: CalibrationLookup + ?Sized>(cell: &CaloCell, calibration: &C) -> f32 {
    calibration.calibrated_et(cell.region, cell.id.abs_ieta(), cell.compressed_et())
}

//! Run-level monitoring statistics
//!
//! Accumulated across events and logged once at the end of a run.

use serde::{Deserialize, Serialize};

use crate::calorimeter::EventSummaryRecord;
use crate::tracking::MatchResult;

// ═══════════════════════════════════════════════════════════════════════════════
// HISTOGRAM
// ═══════════════════════════════════════════════════════════════════════════════

/// Fixed-width 1D histogram
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin edges
    pub edges: Vec<f64>,
    /// Bin counts
    pub counts: Vec<u64>,
    /// Total entries
    pub total: u64,
    pub underflow: u64,
    pub overflow: u64,
    sum: f64,
}

impl Histogram {
    /// Create a histogram with uniform bins on `[min, max)`
    pub fn new(min: f64, max: f64, n_bins: usize) -> Self {
        let n_bins = n_bins.max(1);
        let step = (max - min) / n_bins as f64;
        let edges: Vec<f64> = (0..=n_bins).map(|i| min + i as f64 * step).collect();
        Self {
            edges,
            counts: vec![0; n_bins],
            total: 0,
            underflow: 0,
            overflow: 0,
            sum: 0.0,
        }
    }

    pub fn fill(&mut self, value: f64) {
        self.total += 1;
        self.sum += value;

        let (Some(&lo), Some(&hi)) = (self.edges.first(), self.edges.last()) else {
            return;
        };
        if value < lo {
            self.underflow += 1;
            return;
        }
        if value >= hi {
            self.overflow += 1;
            return;
        }

        let bin = self.edges.partition_point(|&e| e <= value).saturating_sub(1);
        if let Some(count) = self.counts.get_mut(bin) {
            *count += 1;
        }
    }

    pub fn mean(&self) -> f64 {
        if self.total > 0 {
            self.sum / self.total as f64
        } else {
            0.0
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// AGGREGATOR STATS
// ═══════════════════════════════════════════════════════════════════════════════

/// Counters kept by the calorimeter aggregator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorStats {
    pub events: u64,
    /// Events whose HCAL tower count differed from the expected constant
    pub hcal_count_mismatches: u64,
    /// Events with a leading stable particle
    pub events_with_leading: u64,
    /// Total Et per event
    pub et_sum: Histogram,
}

impl Default for AggregatorStats {
    fn default() -> Self {
        Self {
            events: 0,
            hcal_count_mismatches: 0,
            events_with_leading: 0,
            et_sum: Histogram::new(0.0, 2000.0, 100),
        }
    }
}

impl AggregatorStats {
    pub fn record(&mut self, record: &EventSummaryRecord, hcal_count_ok: bool) {
        self.events += 1;
        if !hcal_count_ok {
            self.hcal_count_mismatches += 1;
        }
        if record.pt > 0.0 {
            self.events_with_leading += 1;
        }
        self.et_sum.fill(f64::from(record.et_sum));
    }

    pub fn log_summary(&self) {
        log::info!(
            "Aggregated {} events: {} with leading particle, {} HCAL count mismatches, mean Et sum {:.2}",
            self.events,
            self.events_with_leading,
            self.hcal_count_mismatches,
            self.et_sum.mean()
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MATCH STATS
// ═══════════════════════════════════════════════════════════════════════════════

/// Counters kept by the track matcher driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchStats {
    pub primaries: u64,
    pub matched: u64,
    /// Shared fraction of matched primaries
    pub shared_fraction: Histogram,
}

impl Default for MatchStats {
    fn default() -> Self {
        Self {
            primaries: 0,
            matched: 0,
            shared_fraction: Histogram::new(0.0, 1.0 + 1e-6, 20),
        }
    }
}

impl MatchStats {
    pub fn record(&mut self, result: &MatchResult) {
        self.primaries += 1;
        if result.is_match() {
            self.matched += 1;
            self.shared_fraction.fill(f64::from(result.shared_fraction));
        }
    }

    pub fn match_rate(&self) -> f64 {
        if self.primaries > 0 {
            self.matched as f64 / self.primaries as f64
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        log::info!(
            "Matched {}/{} primary tracks ({:.1}%), mean shared fraction {:.3}",
            self.matched,
            self.primaries,
            100.0 * self.match_rate(),
            self.shared_fraction.mean()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_binning() {
        let mut h = Histogram::new(0.0, 10.0, 10);
        h.fill(0.0);
        h.fill(5.5);
        h.fill(9.99);
        h.fill(-1.0);
        h.fill(10.0);
        assert_eq!(h.total, 5);
        assert_eq!(h.counts[0], 1);
        assert_eq!(h.counts[5], 1);
        assert_eq!(h.counts[9], 1);
        assert_eq!(h.underflow, 1);
        assert_eq!(h.overflow, 1);
    }

    #[test]
    fn test_histogram_mean_counts_out_of_range_entries() {
        let mut h = Histogram::new(0.0, 10.0, 5);
        assert_eq!(h.mean(), 0.0);
        for v in [2.0, 4.0, 15.0] {
            h.fill(v);
        }
        assert_eq!(h.overflow, 1);
        assert!((h.mean() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_match_stats() {
        let mut stats = MatchStats::default();
        stats.record(&MatchResult::none());
        stats.record(&MatchResult::new(Some(3), 1.0));
        assert_eq!(stats.primaries, 2);
        assert_eq!(stats.matched, 1);
        assert!((stats.match_rate() - 0.5).abs() < 1e-12);
        assert_eq!(stats.shared_fraction.overflow, 0);
    }

    #[test]
    fn test_aggregator_stats() {
        let mut stats = AggregatorStats::default();
        let record = EventSummaryRecord {
            pt: 12.0,
            et_sum: 40.0,
            ..Default::default()
        };
        stats.record(&record, false);
        stats.record(&EventSummaryRecord::default(), true);
        assert_eq!(stats.events, 2);
        assert_eq!(stats.events_with_leading, 1);
        assert_eq!(stats.hcal_count_mismatches, 1);
    }
}

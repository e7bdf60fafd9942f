//! Flat per-event summary written to the monitoring ntuple

use serde::{Deserialize, Serialize};

/// One row of the trigger-primitive ntuple
///
/// Field order is the ntuple schema and must not change; see
/// [`EventSummaryRecord::FIELD_NAMES`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSummaryRecord {
    /// ECAL towers read (after clamping to capacity)
    pub n_ecal_cells: f32,
    pub ecal_sum: f32,
    pub ecal_max: f32,
    /// HCAL towers read
    pub n_hcal_cells: f32,
    pub hb_sum: f32,
    pub hb_max: f32,
    pub he_sum: f32,
    pub he_max: f32,
    pub hf_sum: f32,
    pub hf_max: f32,
    /// ECAL + HB + HE + HF sums
    pub et_sum: f32,
    /// Leading particle code
    pub id: f32,
    /// Leading particle status
    pub status: f32,
    pub pt: f32,
    pub eta: f32,
    pub phi: f32,
    /// ECAL + HCAL Et inside the cone
    pub cone_et_sum: f32,
    /// HCAL-only Et inside the cone
    pub hcal_cone_et_sum: f32,
}

impl EventSummaryRecord {
    pub const N_FIELDS: usize = 18;

    /// Column names expected by downstream ntuple readers
    pub const FIELD_NAMES: [&'static str; 18] = [
        "nEcalDigi",
        "ecalSum",
        "ecalMax",
        "nHcalDigi",
        "hbSum",
        "hbMax",
        "heSum",
        "heMax",
        "hfSum",
        "hfMax",
        "etSum",
        "id",
        "st",
        "pt",
        "eta",
        "phi",
        "towerEtSum",
        "hcalTowerEtSum",
    ];

    /// Colon-separated variable list
    pub fn varlist() -> String {
        Self::FIELD_NAMES.join(":")
    }

    /// Values in schema order
    pub fn to_array(&self) -> [f32; 18] {
        [
            self.n_ecal_cells,
            self.ecal_sum,
            self.ecal_max,
            self.n_hcal_cells,
            self.hb_sum,
            self.hb_max,
            self.he_sum,
            self.he_max,
            self.hf_sum,
            self.hf_max,
            self.et_sum,
            self.id,
            self.status,
            self.pt,
            self.eta,
            self.phi,
            self.cone_et_sum,
            self.hcal_cone_et_sum,
        ]
    }
}

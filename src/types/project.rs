//! Project and contractual parameter types
//!
//! A project carries the contractual constants the rollup engine needs:
//! planned volumes, the standby/cap pay rates and the per-source-type
//! production parameters that feed the CTM target calculation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Contractual parameters for one production method (e.g. a vibrator fleet).
///
/// A project defines 1..N source types that can be active on the same day;
/// production records reference them by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceType {
    pub name: String,
    /// Number of vibrators in the fleet.
    pub vibes: u32,
    /// Sweep length in seconds.
    pub sweep_length: f64,
    /// Move-up time between source points in seconds.
    pub moveup: f64,
    /// Contracted recording hours per day.
    pub rec_hours: f64,
}

/// Receiver spread parameters for one receiver/node type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiverType {
    pub name: String,
    /// Required field QC percentage from the contract; dashboards compare
    /// the period-averaged `qc_field` metric against this.
    pub field_qc_rqrmt: f64,
}

/// A seismic acquisition project with its contractual constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub crew: String,
    /// Planned total source points for the project.
    pub planned_vp: u32,
    /// Planned survey area in square kilometres.
    #[serde(default)]
    pub planned_area: f64,
    #[serde(default)]
    pub planned_receivers: u32,
    #[serde(default)]
    pub planned_start: Option<NaiveDate>,
    #[serde(default)]
    pub planned_end: Option<NaiveDate>,
    /// Pay rate applied to standby hours when blending the period rate.
    #[serde(default)]
    pub standby_rate: f64,
    /// Maximum payable rate once productivity exceeds the cap ratio.
    #[serde(default)]
    pub cap_rate: f64,
    /// APP/CTM ratio at which the rate cap is reached. Bonus rates are
    /// prorated linearly between a ratio of 1 and this value.
    #[serde(default)]
    pub cap_app_ctm: f64,
    pub source_types: Vec<SourceType>,
    #[serde(default)]
    pub receiver_types: Vec<ReceiverType>,
}

impl Project {
    /// Look up a source type by name.
    pub fn source_type(&self, name: &str) -> Option<&SourceType> {
        self.source_types.iter().find(|st| st.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_type_lookup_by_name() {
        let project = Project {
            name: "Block 9".into(),
            crew: "Crew 3".into(),
            planned_vp: 250_000,
            planned_area: 1200.0,
            planned_receivers: 40_000,
            planned_start: None,
            planned_end: None,
            standby_rate: 0.75,
            cap_rate: 1.05,
            cap_app_ctm: 1.10,
            source_types: vec![SourceType {
                name: "Vibes A".into(),
                vibes: 4,
                sweep_length: 20.0,
                moveup: 10.0,
                rec_hours: 20.0,
            }],
            receiver_types: vec![],
        };
        assert!(project.source_type("Vibes A").is_some());
        assert!(project.source_type("Vibes B").is_none());
    }
}

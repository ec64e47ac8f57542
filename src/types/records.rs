//! Per-day field report records
//!
//! One set of records is created per production day by report ingestion and
//! may be overwritten when the same date is re-ingested. The rollup engine
//! only ever reads them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Terrain classes
// ============================================================================

/// The five terrain classes a source point can fall in.
///
/// Production is reported per class because each class carries its own
/// correction factor in the contract (see `report::tcf`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    Flat,
    Rough,
    Facilities,
    Dunes,
    Sabkha,
}

impl Terrain {
    /// All classes in reporting order.
    pub const ALL: [Self; 5] = [
        Self::Flat,
        Self::Rough,
        Self::Facilities,
        Self::Dunes,
        Self::Sabkha,
    ];

    /// Display name for report tables.
    pub fn name(self) -> &'static str {
        match self {
            Self::Flat => "Flat",
            Self::Rough => "Rough",
            Self::Facilities => "Facilities",
            Self::Dunes => "Dunes",
            Self::Sabkha => "Sabkha",
        }
    }
}

impl std::fmt::Display for Terrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Source point counts per terrain class for one (day, source type).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainCounts {
    pub flat: u32,
    pub rough: u32,
    pub facilities: u32,
    pub dunes: u32,
    pub sabkha: u32,
}

impl TerrainCounts {
    pub fn get(&self, terrain: Terrain) -> u32 {
        match terrain {
            Terrain::Flat => self.flat,
            Terrain::Rough => self.rough,
            Terrain::Facilities => self.facilities,
            Terrain::Dunes => self.dunes,
            Terrain::Sabkha => self.sabkha,
        }
    }

    /// Total recorded source points. Skips are tracked separately and are
    /// never part of this total.
    pub fn total(&self) -> u32 {
        Terrain::ALL.iter().map(|t| self.get(*t)).sum()
    }

    /// True when no class has any production.
    pub fn is_zero(&self) -> bool {
        self.total() == 0
    }
}

/// Source production for one (production day, source type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionRecord {
    pub date: NaiveDate,
    /// Name of the source type this row belongs to (a project may run
    /// several vibrator fleets on the same day).
    pub source_type: String,
    #[serde(flatten)]
    pub terrain: TerrainCounts,
    /// Skipped source points, excluded from every production total.
    pub skips: u32,
}

// ============================================================================
// Time breakdown
// ============================================================================

/// Contractual grouping of time buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeGroup {
    /// Time the crew is operating (recording plus supporting activity).
    Ops,
    /// Time on standby for reasons attributable to the company.
    Standby,
    /// Time lost to faults and incidents on the contractor side.
    Downtime,
}

/// The 17 named duration buckets of a daily time breakdown.
///
/// Every bucket belongs to exactly one [`TimeGroup`]; the mapping is a
/// contract constant and is deliberately not configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBucket {
    RecHours,
    RecMoveup,
    Logistics,
    CampMove,
    WaitSource,
    WaitLayout,
    WaitShiftChange,
    CompanySuspension,
    CompanyTests,
    BeyondControl,
    LineFault,
    InstrumentFault,
    VibratorFault,
    Incident,
    Holiday,
    Recovering,
    OtherDowntime,
}

impl TimeBucket {
    pub const ALL: [Self; 17] = [
        Self::RecHours,
        Self::RecMoveup,
        Self::Logistics,
        Self::CampMove,
        Self::WaitSource,
        Self::WaitLayout,
        Self::WaitShiftChange,
        Self::CompanySuspension,
        Self::CompanyTests,
        Self::BeyondControl,
        Self::LineFault,
        Self::InstrumentFault,
        Self::VibratorFault,
        Self::Incident,
        Self::Holiday,
        Self::Recovering,
        Self::OtherDowntime,
    ];

    /// Fixed bucket-to-group contract mapping.
    pub fn group(self) -> TimeGroup {
        match self {
            Self::RecHours
            | Self::RecMoveup
            | Self::Logistics
            | Self::WaitSource
            | Self::WaitLayout
            | Self::WaitShiftChange => TimeGroup::Ops,
            Self::CompanySuspension
            | Self::CompanyTests
            | Self::BeyondControl
            | Self::CampMove => TimeGroup::Standby,
            Self::LineFault
            | Self::InstrumentFault
            | Self::VibratorFault
            | Self::Incident
            | Self::Holiday
            | Self::Recovering
            | Self::OtherDowntime => TimeGroup::Downtime,
        }
    }
}

/// Hour values for all 17 time buckets.
///
/// Values come straight from the ingested report and may be NaN when a cell
/// was left blank; the rollup engine treats NaN as missing (`report::numeric`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeBuckets {
    pub rec_hours: f64,
    pub rec_moveup: f64,
    pub logistics: f64,
    pub camp_move: f64,
    pub wait_source: f64,
    pub wait_layout: f64,
    pub wait_shift_change: f64,
    pub company_suspension: f64,
    pub company_tests: f64,
    pub beyond_control: f64,
    pub line_fault: f64,
    pub instrument_fault: f64,
    pub vibrator_fault: f64,
    pub incident: f64,
    pub holiday: f64,
    pub recovering: f64,
    pub other_downtime: f64,
}

impl Default for TimeBuckets {
    fn default() -> Self {
        Self {
            rec_hours: 0.0,
            rec_moveup: 0.0,
            logistics: 0.0,
            camp_move: 0.0,
            wait_source: 0.0,
            wait_layout: 0.0,
            wait_shift_change: 0.0,
            company_suspension: 0.0,
            company_tests: 0.0,
            beyond_control: 0.0,
            line_fault: 0.0,
            instrument_fault: 0.0,
            vibrator_fault: 0.0,
            incident: 0.0,
            holiday: 0.0,
            recovering: 0.0,
            other_downtime: 0.0,
        }
    }
}

impl TimeBuckets {
    pub fn get(&self, bucket: TimeBucket) -> f64 {
        match bucket {
            TimeBucket::RecHours => self.rec_hours,
            TimeBucket::RecMoveup => self.rec_moveup,
            TimeBucket::Logistics => self.logistics,
            TimeBucket::CampMove => self.camp_move,
            TimeBucket::WaitSource => self.wait_source,
            TimeBucket::WaitLayout => self.wait_layout,
            TimeBucket::WaitShiftChange => self.wait_shift_change,
            TimeBucket::CompanySuspension => self.company_suspension,
            TimeBucket::CompanyTests => self.company_tests,
            TimeBucket::BeyondControl => self.beyond_control,
            TimeBucket::LineFault => self.line_fault,
            TimeBucket::InstrumentFault => self.instrument_fault,
            TimeBucket::VibratorFault => self.vibrator_fault,
            TimeBucket::Incident => self.incident,
            TimeBucket::Holiday => self.holiday,
            TimeBucket::Recovering => self.recovering,
            TimeBucket::OtherDowntime => self.other_downtime,
        }
    }

    fn get_mut(&mut self, bucket: TimeBucket) -> &mut f64 {
        match bucket {
            TimeBucket::RecHours => &mut self.rec_hours,
            TimeBucket::RecMoveup => &mut self.rec_moveup,
            TimeBucket::Logistics => &mut self.logistics,
            TimeBucket::CampMove => &mut self.camp_move,
            TimeBucket::WaitSource => &mut self.wait_source,
            TimeBucket::WaitLayout => &mut self.wait_layout,
            TimeBucket::WaitShiftChange => &mut self.wait_shift_change,
            TimeBucket::CompanySuspension => &mut self.company_suspension,
            TimeBucket::CompanyTests => &mut self.company_tests,
            TimeBucket::BeyondControl => &mut self.beyond_control,
            TimeBucket::LineFault => &mut self.line_fault,
            TimeBucket::InstrumentFault => &mut self.instrument_fault,
            TimeBucket::VibratorFault => &mut self.vibrator_fault,
            TimeBucket::Incident => &mut self.incident,
            TimeBucket::Holiday => &mut self.holiday,
            TimeBucket::Recovering => &mut self.recovering,
            TimeBucket::OtherDowntime => &mut self.other_downtime,
        }
    }

    /// Accumulate another day's buckets, treating NaN entries as zero.
    pub fn accumulate(&mut self, other: &Self) {
        for bucket in TimeBucket::ALL {
            let v = other.get(bucket);
            if !v.is_nan() {
                *self.get_mut(bucket) += v;
            }
        }
    }

    /// Sum of all buckets belonging to `group`, NaN entries ignored.
    pub fn group_sum(&self, group: TimeGroup) -> f64 {
        TimeBucket::ALL
            .iter()
            .filter(|b| b.group() == group)
            .map(|b| self.get(*b))
            .filter(|v| !v.is_nan())
            .sum()
    }
}

/// Time breakdown for one production day (project wide, not per source type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBreakdownRecord {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub buckets: TimeBuckets,
}

// ============================================================================
// Receiver production
// ============================================================================

/// Receiver/node production for one (production day, receiver type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiverProductionRecord {
    pub date: NaiveDate,
    pub receiver_type: String,
    pub layout: u32,
    pub pickup: u32,
    pub node_download: u32,
    pub node_charged: u32,
    pub node_failure: u32,
    pub node_repair: u32,
    /// Field QC percentage for the day. NaN when QC was not run. This is
    /// the one receiver metric that is averaged over a period, not summed.
    pub qc_field: f64,
}

// ============================================================================
// HSE and weather
// ============================================================================

/// HSE incident counters and weather observations for one production day.
///
/// Incident counters roll up over periods; weather and toolbox talks are
/// day-only and never aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HseWeatherRecord {
    pub date: NaiveDate,
    pub lti: u32,
    pub rwc: u32,
    pub mtc: u32,
    pub fac: u32,
    pub incident_nm: u32,
    pub lsr_violations: u32,
    pub stop_cards: u32,
    pub drills: u32,
    pub audits: u32,
    pub medevac: u32,
    pub weather_condition: String,
    pub rain: String,
    pub temp_min: f64,
    pub temp_max: f64,
    #[serde(default)]
    pub toolbox_talks: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terrain_total_excludes_skips() {
        let counts = TerrainCounts {
            flat: 100,
            rough: 50,
            facilities: 0,
            dunes: 25,
            sabkha: 25,
        };
        assert_eq!(counts.total(), 200);
    }

    #[test]
    fn every_bucket_has_exactly_one_group() {
        let ops = TimeBucket::ALL.iter().filter(|b| b.group() == TimeGroup::Ops).count();
        let standby = TimeBucket::ALL
            .iter()
            .filter(|b| b.group() == TimeGroup::Standby)
            .count();
        let downtime = TimeBucket::ALL
            .iter()
            .filter(|b| b.group() == TimeGroup::Downtime)
            .count();
        assert_eq!(ops, 6);
        assert_eq!(standby, 4);
        assert_eq!(downtime, 7);
        assert_eq!(ops + standby + downtime, TimeBucket::ALL.len());
    }

    #[test]
    fn group_sum_ignores_nan_entries() {
        let buckets = TimeBuckets {
            rec_hours: 20.0,
            logistics: f64::NAN,
            rec_moveup: 1.5,
            ..TimeBuckets::default()
        };
        assert!((buckets.group_sum(TimeGroup::Ops) - 21.5).abs() < 1e-9);
    }
}

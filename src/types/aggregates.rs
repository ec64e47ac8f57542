//! Derived rollup output types
//!
//! Explicit structs for every (period, domain) aggregate the engine
//! produces. Fields that can be undefined are `Option<f64>`: `None` means
//! the value could not be computed (empty window, degenerate denominator,
//! undefined contract), `Some(0.0)` means a genuinely recorded zero. The
//! distinction survives serialization — undefined renders as JSON `null`
//! and is shown as a blank cell downstream.
//!
//! Aggregates are recomputed on every request. Nothing here is persisted
//! and nothing is mutated between calls.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::records::{Terrain, TerrainCounts, TimeBuckets};

// ============================================================================
// Periods
// ============================================================================

/// The four rollup periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// The single reference date.
    Day,
    /// Reference date and the six preceding calendar days.
    Week,
    /// First of the reference month through the reference date.
    Month,
    /// Project start (earliest record) through the reference date.
    Project,
}

impl Period {
    pub const ALL: [Self; 4] = [Self::Day, Self::Week, Self::Month, Self::Project];

    /// Field-name prefix used in flat report exports (`day_total`,
    /// `week_total`, `month_total`, `proj_total`).
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Project => "proj",
        }
    }
}

// ============================================================================
// Production
// ============================================================================

/// Summed source points per terrain class over a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TerrainSums {
    pub flat: f64,
    pub rough: f64,
    pub facilities: f64,
    pub dunes: f64,
    pub sabkha: f64,
}

impl TerrainSums {
    pub fn get(&self, terrain: Terrain) -> f64 {
        match terrain {
            Terrain::Flat => self.flat,
            Terrain::Rough => self.rough,
            Terrain::Facilities => self.facilities,
            Terrain::Dunes => self.dunes,
            Terrain::Sabkha => self.sabkha,
        }
    }

    /// Sum of the five class totals. Skips never contribute here.
    pub fn total(&self) -> f64 {
        Terrain::ALL.iter().map(|t| self.get(*t)).sum()
    }

    pub fn accumulate_counts(&mut self, counts: &TerrainCounts) {
        self.flat += f64::from(counts.flat);
        self.rough += f64::from(counts.rough);
        self.facilities += f64::from(counts.facilities);
        self.dunes += f64::from(counts.dunes);
        self.sabkha += f64::from(counts.sabkha);
    }

    pub fn accumulate(&mut self, other: &Self) {
        self.flat += other.flat;
        self.rough += other.rough;
        self.facilities += other.facilities;
        self.dunes += other.dunes;
        self.sabkha += other.sabkha;
    }
}

/// Production rollup for one (period, source type) pair — or the combined
/// project-level figures after `report::combine`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProdTotals {
    pub terrain: TerrainSums,
    pub skips: f64,
    /// Sum of the five terrain classes, skips excluded.
    pub total: f64,
    /// Terrain correction factor — production-weighted average of the
    /// per-class coefficients. Undefined when total production is below 1.
    pub tcf: Option<f64>,
    /// Contractual target for the period, scaled by the period's recorded
    /// time. Undefined when the TCF or the source contract is undefined.
    pub ctm: Option<f64>,
    /// Actual/target productivity ratio.
    pub app_ctm: Option<f64>,
    /// Contractual payment rate derived from `app_ctm` and standby time.
    pub rate: Option<f64>,
    /// Average production per calendar day in the window.
    pub avg: Option<f64>,
    /// Skipped points as a fraction of attempted points.
    pub perc_skips: Option<f64>,
    /// Production per recording hour.
    pub vp_hour: Option<f64>,
}

// ============================================================================
// Time breakdown
// ============================================================================

/// Time rollup over a window: the 17 summed buckets plus the derived
/// group totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeTotals {
    #[serde(flatten)]
    pub buckets: TimeBuckets,
    /// Recording hours alone. Also counted inside `ops_time`.
    pub rec_time: f64,
    pub ops_time: f64,
    pub standby: f64,
    pub downtime: f64,
    /// `ops_time + standby + downtime`, always recomputed.
    pub total_time: f64,
}

// ============================================================================
// HSE
// ============================================================================

/// Summed HSE incident counters over a window. Weather observations do not
/// roll up; they only appear in [`HseDayDetail`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HseTotals {
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
}

/// Day-only HSE report content: weather observations and toolbox talks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HseDayDetail {
    pub weather_condition: String,
    pub rain: String,
    pub temp_min: f64,
    pub temp_max: f64,
    pub toolbox_talks: Vec<String>,
}

// ============================================================================
// Receiver
// ============================================================================

/// Receiver/node rollup over a window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiverTotals {
    pub layout: u32,
    pub pickup: u32,
    pub node_download: u32,
    pub node_charged: u32,
    pub node_failure: u32,
    pub node_repair: u32,
    /// Field QC averaged over the window's valid daily values — a QC
    /// percentage is not additive, so this is the one receiver metric
    /// that is not a sum.
    pub qc_field: Option<f64>,
}

// ============================================================================
// Assembled report
// ============================================================================

/// All four domain aggregates for one period. `None` for a domain means
/// the window held no records of that kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainTotals {
    pub prod: Option<ProdTotals>,
    pub time: Option<TimeTotals>,
    pub hse: Option<HseTotals>,
    pub receiver: Option<ReceiverTotals>,
}

/// The full rollup for one reference date: every period crossed with every
/// domain, plus the day-only HSE detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTotals {
    pub reference_date: NaiveDate,
    pub day: DomainTotals,
    pub week: DomainTotals,
    pub month: DomainTotals,
    pub project: DomainTotals,
    pub day_detail: Option<HseDayDetail>,
}

impl ReportTotals {
    pub fn domain(&self, period: Period) -> &DomainTotals {
        match period {
            Period::Day => &self.day,
            Period::Week => &self.week,
            Period::Month => &self.month,
            Period::Project => &self.project,
        }
    }
}

// ============================================================================
// Series
// ============================================================================

/// Project-to-date per-day series, one entry per day that has a production
/// record, ordered by date ascending. Consumers index by calendar date, so
/// the vectors are always the same length as `dates` and never contain a
/// day without a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub dates: Vec<NaiveDate>,
    pub terrain: Vec<TerrainSums>,
    pub total: Vec<f64>,
    pub skips: Vec<f64>,
    pub tcf: Vec<Option<f64>>,
    pub ctm: Vec<Option<f64>>,
    pub app_ctm: Vec<Option<f64>>,
    pub rec_hours: Vec<f64>,
    pub ops_time: Vec<f64>,
    pub standby: Vec<f64>,
    pub downtime: Vec<f64>,
    pub total_time: Vec<f64>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

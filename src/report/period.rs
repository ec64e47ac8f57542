//! Period windows and per-domain window aggregation
//!
//! A window is resolved from (period, reference date) and the matching
//! records are summed per domain. An empty window yields `None` — an
//! undefined aggregate is distinguishable from a recorded zero all the way
//! to the rendered report. The receiver domain alone supports a legacy
//! zero-fill policy behind [`MissingWindowPolicy`].

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::{
    HseDayDetail, HseTotals, HseWeatherRecord, Period, ProductionRecord,
    ReceiverProductionRecord, ReceiverTotals, TerrainSums, TimeBreakdownRecord, TimeBuckets,
    TimeGroup, TimeTotals,
};

use super::numeric::mean_valid;

/// What an empty receiver window aggregates to.
///
/// Production, time and HSE windows always aggregate to undefined when
/// empty; older receiver reports filled zeros instead, and some consumers
/// still expect that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingWindowPolicy {
    /// Empty window -> undefined aggregate (`None`).
    #[default]
    Undefined,
    /// Empty window -> zero-filled aggregate.
    Zero,
}

// ============================================================================
// Windows
// ============================================================================

/// A closed date window `[start, end]`; `start == None` means open at the
/// left (project-to-date).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date <= self.end && self.start.map_or(true, |s| date >= s)
    }
}

/// Resolve the window for a period relative to `reference`.
///
/// - day: the reference date alone
/// - week: the reference date and the `week_days - 1` preceding days
/// - month: the 1st of the reference month through the reference date
/// - project: everything up to and including the reference date
pub fn window(period: Period, reference: NaiveDate, week_days: u32) -> DateWindow {
    let start = match period {
        Period::Day => Some(reference),
        Period::Week => Some(reference - Duration::days(i64::from(week_days) - 1)),
        Period::Month => Some(reference.with_day(1).unwrap_or(reference)),
        Period::Project => None,
    };
    DateWindow {
        start,
        end: reference,
    }
}

/// Calendar length of a period window in days, for per-day averages.
///
/// For the project period the length runs from the earliest record to the
/// reference date; `None` when there is no record at all.
pub fn window_days(
    period: Period,
    reference: NaiveDate,
    week_days: u32,
    earliest_record: Option<NaiveDate>,
) -> Option<f64> {
    match period {
        Period::Day => Some(1.0),
        Period::Week => Some(f64::from(week_days)),
        Period::Month => Some(f64::from(reference.day())),
        Period::Project => {
            let first = earliest_record?;
            let days = (reference - first).num_days() + 1;
            (days > 0).then_some(days as f64)
        }
    }
}

// ============================================================================
// Production domain
// ============================================================================

/// Raw production sums for one (window, source type) before the contract
/// calculations are attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProdSums {
    pub terrain: TerrainSums,
    pub skips: f64,
}

impl ProdSums {
    pub fn total(&self) -> f64 {
        self.terrain.total()
    }
}

/// Sum the production records of one source type inside `window`.
/// `None` when no record falls in the window.
pub fn production_window_sums(
    records: &[ProductionRecord],
    source_type: &str,
    window: DateWindow,
) -> Option<ProdSums> {
    let mut terrain = TerrainSums::default();
    let mut skips = 0.0;
    let mut seen = false;

    for rec in records
        .iter()
        .filter(|r| r.source_type == source_type && window.contains(r.date))
    {
        terrain.accumulate_counts(&rec.terrain);
        skips += f64::from(rec.skips);
        seen = true;
    }

    seen.then_some(ProdSums { terrain, skips })
}

// ============================================================================
// Time domain
// ============================================================================

/// Sum the time breakdown records inside `window` and derive the group
/// totals. `None` when no record falls in the window.
pub fn time_window_totals(
    records: &[TimeBreakdownRecord],
    window: DateWindow,
) -> Option<TimeTotals> {
    let mut buckets = TimeBuckets::default();
    let mut seen = false;

    for rec in records.iter().filter(|r| window.contains(r.date)) {
        buckets.accumulate(&rec.buckets);
        seen = true;
    }

    if !seen {
        return None;
    }

    let ops_time = buckets.group_sum(TimeGroup::Ops);
    let standby = buckets.group_sum(TimeGroup::Standby);
    let downtime = buckets.group_sum(TimeGroup::Downtime);

    Some(TimeTotals {
        rec_time: buckets.rec_hours,
        ops_time,
        standby,
        downtime,
        total_time: ops_time + standby + downtime,
        buckets,
    })
}

// ============================================================================
// HSE domain
// ============================================================================

/// Sum the HSE incident counters inside `window`. Weather fields do not
/// roll up and are only available through [`hse_day_detail`].
pub fn hse_window_totals(records: &[HseWeatherRecord], window: DateWindow) -> Option<HseTotals> {
    let mut totals = HseTotals::default();
    let mut seen = false;

    for rec in records.iter().filter(|r| window.contains(r.date)) {
        totals.lti += rec.lti;
        totals.rwc += rec.rwc;
        totals.mtc += rec.mtc;
        totals.fac += rec.fac;
        totals.incident_nm += rec.incident_nm;
        totals.lsr_violations += rec.lsr_violations;
        totals.stop_cards += rec.stop_cards;
        totals.drills += rec.drills;
        totals.audits += rec.audits;
        totals.medevac += rec.medevac;
        seen = true;
    }

    seen.then_some(totals)
}

/// Day-only HSE content for the reference date: weather observations and
/// toolbox talks.
pub fn hse_day_detail(records: &[HseWeatherRecord], reference: NaiveDate) -> Option<HseDayDetail> {
    records.iter().find(|r| r.date == reference).map(|rec| HseDayDetail {
        weather_condition: rec.weather_condition.clone(),
        rain: rec.rain.clone(),
        temp_min: rec.temp_min,
        temp_max: rec.temp_max,
        toolbox_talks: rec.toolbox_talks.clone(),
    })
}

// ============================================================================
// Receiver domain
// ============================================================================

/// Sum the receiver records inside `window` across all receiver types.
///
/// Counters are additive; `qc_field` is averaged over the valid daily
/// values because a QC percentage is not additive. An empty window follows
/// `policy`.
pub fn receiver_window_totals(
    records: &[ReceiverProductionRecord],
    window: DateWindow,
    policy: MissingWindowPolicy,
) -> Option<ReceiverTotals> {
    let in_window: Vec<&ReceiverProductionRecord> =
        records.iter().filter(|r| window.contains(r.date)).collect();

    if in_window.is_empty() {
        return match policy {
            MissingWindowPolicy::Undefined => None,
            MissingWindowPolicy::Zero => Some(ReceiverTotals::default()),
        };
    }

    let mut totals = ReceiverTotals::default();
    for rec in &in_window {
        totals.layout += rec.layout;
        totals.pickup += rec.pickup;
        totals.node_download += rec.node_download;
        totals.node_charged += rec.node_charged;
        totals.node_failure += rec.node_failure;
        totals.node_repair += rec.node_repair;
    }
    totals.qc_field = mean_valid(in_window.iter().map(|r| r.qc_field));

    Some(totals)
}

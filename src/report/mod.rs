//! Rollup Engine
//!
//! Aggregates per-day crew records into day / week-to-date / month-to-date
//! / project-to-date rollups across four domains: source production, time
//! breakdown, HSE and receiver production.
//!
//! Everything in this module is a pure function of the record window passed
//! in — no hidden state, no caching, safe to call concurrently. Missing
//! data degrades to undefined values; the only error surfaced to callers is
//! a project with no source types, which cannot be reported on at all.
//!
//! ## Pipeline
//!
//! - `numeric` — NaN-safe ratio/sum/mean primitives
//! - `tcf` — terrain correction factor (production-weighted derate)
//! - `ctm` — contractual target and payment rate
//! - `period` — window resolution and per-domain window sums
//! - `combine` — multi-source-type weighted combination
//! - `series` — per-day chart/report series
//! - `completion` — estimated completion date

pub mod combine;
pub mod completion;
pub mod ctm;
pub mod numeric;
pub mod period;
pub mod series;
pub mod tcf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{
    DomainTotals, HseWeatherRecord, Period, ProdTotals, ProductionRecord,
    ReceiverProductionRecord, ReceiverTotals, ReportTotals, Series, TimeBreakdownRecord,
    TimeTotals,
};

pub use combine::combine_source_types;
pub use completion::{estimate_completion, CompletionEstimate};
pub use ctm::{calc_ctm, calc_rate, scale_ctm, CtmScaling, RateMethod, RateParams};
pub use numeric::{mean_valid, nan_to_zero, nan_to_zero_seq, nansum, ratio, ratio_opt};
pub use period::{
    hse_day_detail, hse_window_totals, production_window_sums, receiver_window_totals,
    time_window_totals, window, window_days, DateWindow, MissingWindowPolicy, ProdSums,
};
pub use series::{build_series, cumulative};
pub use tcf::{calc_tcf, TerrainCoefficients};

use crate::types::Project;

// ============================================================================
// Options
// ============================================================================

/// Tunable rollup behavior. Defaults match the contract this engine was
/// built against; all values are operator-tunable through
/// `crew_config.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollupOptions {
    /// Length of the trailing week window in days.
    pub week_days: u32,
    /// Number of trailing weeks shown on the weekly report.
    pub weeks_shown: u32,
    /// Trailing-average window for the completion estimate.
    pub avg_period_days: u32,
    /// How period CTM is scaled by recorded time.
    pub ctm_scaling: CtmScaling,
    /// How the payment rate blends standby time.
    pub rate_method: RateMethod,
    /// What an empty receiver window aggregates to.
    pub receiver_missing_window: MissingWindowPolicy,
}

impl Default for RollupOptions {
    fn default() -> Self {
        Self {
            week_days: 7,
            weeks_shown: 6,
            avg_period_days: 14,
            ctm_scaling: CtmScaling::default(),
            rate_method: RateMethod::default(),
            receiver_missing_window: MissingWindowPolicy::default(),
        }
    }
}

/// The record history the engine aggregates over: everything up to and
/// including the reference date, ascending. Assembled by the caller from
/// the store; the engine never queries anything itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectHistory<'a> {
    pub production: &'a [ProductionRecord],
    pub time: &'a [TimeBreakdownRecord],
    pub hse: &'a [HseWeatherRecord],
    pub receiver: &'a [ReceiverProductionRecord],
}

#[derive(Debug, Error)]
pub enum ReportError {
    /// Reporting on a project without source types is a configuration
    /// defect, not a missing-data condition.
    #[error("project '{0}' has no source types configured")]
    NoSourceTypes(String),
}

// ============================================================================
// Period rollup assembly
// ============================================================================

/// Compute the full rollup for one reference date: all four periods
/// crossed with all four domains, plus the day-only HSE detail.
pub fn calc_report_totals(
    project: &Project,
    history: ProjectHistory<'_>,
    reference: NaiveDate,
    options: &RollupOptions,
    coeff: &TerrainCoefficients,
) -> Result<ReportTotals, ReportError> {
    if project.source_types.is_empty() {
        return Err(ReportError::NoSourceTypes(project.name.clone()));
    }

    let earliest = history.production.iter().map(|r| r.date).min();

    let mut domains = Period::ALL.iter().map(|period| {
        calc_domain_totals(project, history, *period, reference, earliest, options, coeff)
    });

    // Period::ALL order: day, week, month, project.
    let day = domains.next().unwrap_or_default();
    let week = domains.next().unwrap_or_default();
    let month = domains.next().unwrap_or_default();
    let proj = domains.next().unwrap_or_default();

    Ok(ReportTotals {
        reference_date: reference,
        day,
        week,
        month,
        project: proj,
        day_detail: period::hse_day_detail(history.hse, reference),
    })
}

/// All four domain aggregates for one period window.
fn calc_domain_totals(
    project: &Project,
    history: ProjectHistory<'_>,
    period: Period,
    reference: NaiveDate,
    earliest: Option<NaiveDate>,
    options: &RollupOptions,
    coeff: &TerrainCoefficients,
) -> DomainTotals {
    let win = period::window(period, reference, options.week_days);
    let wdays = period::window_days(period, reference, options.week_days, earliest);

    let time = period::time_window_totals(history.time, win);
    let rates = RateParams::from(project);

    let per_type: Vec<ProdTotals> = project
        .source_types
        .iter()
        .filter_map(|source| {
            let sums = period::production_window_sums(history.production, &source.name, win)?;
            Some(assemble_prod_totals(
                &sums,
                source,
                time.as_ref(),
                &rates,
                wdays,
                options,
                coeff,
            ))
        })
        .collect();

    let prod = combine::combine_source_types(&per_type, time.as_ref(), &rates, options.rate_method);

    DomainTotals {
        prod,
        time,
        hse: period::hse_window_totals(history.hse, win),
        receiver: period::receiver_window_totals(
            history.receiver,
            win,
            options.receiver_missing_window,
        ),
    }
}

/// Attach the contract calculations to one source type's window sums.
fn assemble_prod_totals(
    sums: &ProdSums,
    source: &crate::types::SourceType,
    time: Option<&TimeTotals>,
    rates: &RateParams,
    window_days: Option<f64>,
    options: &RollupOptions,
    coeff: &TerrainCoefficients,
) -> ProdTotals {
    let total = sums.total();
    let tcf = calc_tcf(&sums.terrain, coeff);
    let ctm = scale_ctm(calc_ctm(source, tcf), time, options.ctm_scaling);
    let app_ctm = ratio_opt(total, ctm);

    // Zero recorded time means no rate for the period (caller-side guard of
    // the rate formula's precondition).
    let rate = time
        .filter(|t| t.total_time > 0.0)
        .and_then(|t| calc_rate(rates, app_ctm, t.total_time, t.standby, options.rate_method));

    ProdTotals {
        terrain: sums.terrain,
        skips: sums.skips,
        total,
        tcf,
        ctm,
        app_ctm,
        rate,
        avg: window_days.and_then(|d| ratio(total, d)),
        perc_skips: ratio(sums.skips, total + sums.skips),
        vp_hour: time.and_then(|t| ratio(total, t.rec_time)),
    }
}

// ============================================================================
// Weekly collation
// ============================================================================

/// Day-level row of the weekly report.
#[derive(Debug, Clone, Serialize)]
pub struct DaySlot {
    pub date: NaiveDate,
    pub prod: Option<ProdTotals>,
    pub time: Option<TimeTotals>,
    pub receiver: Option<ReceiverTotals>,
}

/// Trailing-week row of the weekly report.
#[derive(Debug, Clone, Serialize)]
pub struct WeekSlot {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub prod: Option<ProdTotals>,
    pub time: Option<TimeTotals>,
    pub receiver: Option<ReceiverTotals>,
}

/// The weekly report's two tables: one slot per day of the report week and
/// one per trailing week, both ascending. Slots for days without records
/// carry undefined aggregates — the report renders them blank rather than
/// dropping the row.
#[derive(Debug, Clone, Serialize)]
pub struct WeekCollation {
    pub days: Vec<DaySlot>,
    pub weeks: Vec<WeekSlot>,
}

/// Collate the weekly report data: per-day figures for the report week and
/// week-to-date figures for the trailing weeks.
pub fn collate_week_data(
    project: &Project,
    history: ProjectHistory<'_>,
    reference: NaiveDate,
    options: &RollupOptions,
    coeff: &TerrainCoefficients,
) -> Result<WeekCollation, ReportError> {
    if project.source_types.is_empty() {
        return Err(ReportError::NoSourceTypes(project.name.clone()));
    }

    let earliest = history.production.iter().map(|r| r.date).min();
    let week_days = i64::from(options.week_days);

    let days = (0..week_days)
        .map(|offset| {
            let date = reference - chrono::Duration::days(week_days - 1 - offset);
            let domains = calc_domain_totals(
                project,
                history,
                Period::Day,
                date,
                earliest,
                options,
                coeff,
            );
            DaySlot {
                date,
                prod: domains.prod,
                time: domains.time,
                receiver: domains.receiver,
            }
        })
        .collect();

    let weeks = (0..i64::from(options.weeks_shown))
        .map(|wk| {
            let end = reference
                - chrono::Duration::days((i64::from(options.weeks_shown) - 1 - wk) * week_days);
            let start = end - chrono::Duration::days(week_days - 1);
            let domains = calc_domain_totals(
                project,
                history,
                Period::Week,
                end,
                earliest,
                options,
                coeff,
            );
            WeekSlot {
                start,
                end,
                prod: domains.prod,
                time: domains.time,
                receiver: domains.receiver,
            }
        })
        .collect();

    Ok(WeekCollation { days, weeks })
}

// ============================================================================
// Project status
// ============================================================================

/// Project-to-date headline figures for the report header.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectStatus {
    pub recorded_vp: f64,
    pub skips: f64,
    /// `(recorded + skips) / planned_vp`; undefined without a planned
    /// volume. Skips count because a skipped point consumes survey area.
    pub complete: Option<f64>,
    /// Planned area prorated by completion.
    pub area_covered: Option<f64>,
    pub est_completion: CompletionEstimate,
}

/// Compute the project status block for a reference date.
pub fn project_status(
    project: &Project,
    production: &[ProductionRecord],
    reference: NaiveDate,
    options: &RollupOptions,
) -> ProjectStatus {
    let mut recorded = 0.0;
    let mut skips = 0.0;
    for rec in production.iter().filter(|r| r.date <= reference) {
        recorded += f64::from(rec.terrain.total());
        skips += f64::from(rec.skips);
    }

    let complete = ratio(recorded + skips, f64::from(project.planned_vp));
    let est_completion = estimate_completion(
        production,
        reference,
        options.avg_period_days,
        project.planned_vp,
        complete.unwrap_or(0.0),
    );

    ProjectStatus {
        recorded_vp: recorded,
        skips,
        complete,
        area_covered: complete.map(|c| project.planned_area * c),
        est_completion,
    }
}

/// Build the project-to-date series with the project's configured scaling.
pub fn calc_series(
    project: &Project,
    history: ProjectHistory<'_>,
    options: &RollupOptions,
    coeff: &TerrainCoefficients,
) -> Series {
    series::build_series(
        project,
        history.production,
        history.time,
        coeff,
        options.ctm_scaling,
    )
}

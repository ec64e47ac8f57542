//! Estimated completion date
//!
//! Projects the calendar date the planned volume will be reached, from the
//! completion percentage and a trailing-average production rate. Near the
//! end of a survey the crew stops shooting while reporting continues; a
//! near-complete project whose latest report shows zero production is
//! treated as finished and the last date with real production is reported
//! instead of a forward projection.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::types::ProductionRecord;

/// Completion percentage above which an all-zero production day is read as
/// "operations have stopped" rather than a bad day.
const STOPPED_COMPLETE_THRESHOLD: f64 = 0.97;

/// Outcome of the completion estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "date", rename_all = "snake_case")]
pub enum CompletionEstimate {
    /// Forward projection from the trailing production average.
    Projected(NaiveDate),
    /// Production has stopped; this is the last date with nonzero
    /// production.
    Stopped(NaiveDate),
    /// No estimate possible (no trailing production, zero average, or a
    /// degenerate trailing window).
    Unknown,
}

impl std::fmt::Display for CompletionEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Projected(date) | Self::Stopped(date) => {
                write!(f, "{}", date.format("%-d %b %Y"))
            }
            Self::Unknown => write!(f, "-"),
        }
    }
}

/// Estimate the project completion date.
///
/// `production` is the full project history up to and including
/// `reference`, any order. `trailing_days` is the trailing-average window
/// length (degenerate values yield [`CompletionEstimate::Unknown`]);
/// `complete` is the project completion fraction and `planned_vp` the
/// planned total volume. The trailing average counts skips as attempted
/// points — a skip consumes survey area the same as a recorded point.
pub fn estimate_completion(
    production: &[ProductionRecord],
    reference: NaiveDate,
    trailing_days: u32,
    planned_vp: u32,
    complete: f64,
) -> CompletionEstimate {
    if trailing_days < 1 {
        return CompletionEstimate::Unknown;
    }

    if complete > STOPPED_COMPLETE_THRESHOLD && latest_day_is_zero(production, reference) {
        return match last_production_date(production) {
            Some(date) => CompletionEstimate::Stopped(date),
            None => CompletionEstimate::Unknown,
        };
    }

    let start = reference - Duration::days(i64::from(trailing_days));
    let mut total = 0.0;
    let mut seen = false;
    for rec in production
        .iter()
        .filter(|r| r.date >= start && r.date <= reference)
    {
        total += f64::from(rec.terrain.total()) + f64::from(rec.skips);
        seen = true;
    }

    if !seen {
        return CompletionEstimate::Unknown;
    }

    let avg = total / f64::from(trailing_days);
    if avg <= 0.0 {
        return CompletionEstimate::Unknown;
    }

    let remaining = (1.0 - complete) * f64::from(planned_vp);
    let days_left = (remaining / avg).round().max(0.0) as i64;
    CompletionEstimate::Projected(reference + Duration::days(days_left))
}

/// True when the most recent reported day shows zero production across all
/// terrain classes (all source types).
fn latest_day_is_zero(production: &[ProductionRecord], reference: NaiveDate) -> bool {
    let latest = production
        .iter()
        .filter(|r| r.date <= reference)
        .map(|r| r.date)
        .max();
    match latest {
        Some(day) => production
            .iter()
            .filter(|r| r.date == day)
            .all(|r| r.terrain.is_zero()),
        None => false,
    }
}

/// Most recent date with nonzero production in the project history.
fn last_production_date(production: &[ProductionRecord]) -> Option<NaiveDate> {
    production
        .iter()
        .filter(|r| !r.terrain.is_zero())
        .map(|r| r.date)
        .max()
}

//! Multi-source-type combination
//!
//! A project running several source types (e.g. two vibrator fleets with
//! different sweep contracts) gets one period aggregate per type; the
//! project-level figures combine them. Additive fields sum directly.
//! TCF and CTM are recombined by production-weighted averaging — a simple
//! mean would let a fleet that shot ten points drag the factor of one that
//! shot ten thousand. The rate is recomputed from the combined ratio, not
//! averaged from per-type rates.

use crate::types::{ProdTotals, TerrainSums, TimeTotals};

use super::ctm::{calc_rate, RateMethod, RateParams};
use super::numeric::{ratio, ratio_opt};

/// Combine per-source-type production aggregates for one period into the
/// project-level aggregate.
///
/// `time` is the period's project-wide time rollup (time breakdowns are
/// not per source type); it feeds the recomputed rate. When the combined
/// total is zero every weighted field is undefined.
pub fn combine_source_types(
    per_type: &[ProdTotals],
    time: Option<&TimeTotals>,
    rates: &RateParams,
    rate_method: RateMethod,
) -> Option<ProdTotals> {
    if per_type.is_empty() {
        return None;
    }
    if per_type.len() == 1 {
        return per_type.first().cloned();
    }

    let mut terrain = TerrainSums::default();
    let mut skips = 0.0;
    for t in per_type {
        terrain.accumulate(&t.terrain);
        skips += t.skips;
    }
    let total = terrain.total();

    let (tcf, ctm) = if total > 0.0 {
        (
            weighted_mean(per_type, total, |t| t.tcf),
            weighted_mean(per_type, total, |t| t.ctm).map(f64::round),
        )
    } else {
        (None, None)
    };

    let app_ctm = ratio_opt(total, ctm);
    let rate = time
        .filter(|t| t.total_time > 0.0)
        .and_then(|t| calc_rate(rates, app_ctm, t.total_time, t.standby, rate_method));

    // avg / perc_skips / vp_hour combine additively from the summed
    // figures, same denominators as the single-type path.
    let avg = mean_of_sums(per_type, |t| t.avg);
    let perc_skips = ratio(skips, total + skips);
    let vp_hour = time.and_then(|t| ratio(total, t.rec_time));

    Some(ProdTotals {
        terrain,
        skips,
        total,
        tcf,
        ctm,
        app_ctm,
        rate,
        avg,
        perc_skips,
        vp_hour,
    })
}

/// Production-weighted mean of an optional per-type field. A type whose
/// field is undefined is excluded together with its weight; `None` when no
/// type contributes.
fn weighted_mean<F>(per_type: &[ProdTotals], combined_total: f64, field: F) -> Option<f64>
where
    F: Fn(&ProdTotals) -> Option<f64>,
{
    debug_assert!(combined_total > 0.0);

    let mut weighted = 0.0;
    let mut weight = 0.0;
    for t in per_type {
        if let Some(v) = field(t) {
            weighted += v * t.total;
            weight += t.total;
        }
    }
    (weight > 0.0).then(|| weighted / weight)
}

/// Sum of the per-type per-day averages — the per-type averages share the
/// same window length, so their sum is the combined average.
fn mean_of_sums<F>(per_type: &[ProdTotals], field: F) -> Option<f64>
where
    F: Fn(&ProdTotals) -> Option<f64>,
{
    let values: Vec<f64> = per_type.iter().filter_map(&field).collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum())
    }
}

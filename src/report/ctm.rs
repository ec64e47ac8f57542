//! Contractual target (CTM) and payment rate calculations
//!
//! The CTM is the contractual point-count target for a source type:
//! cycles-per-hour capacity of the fleet, derated by terrain, times the
//! contracted recording hours. It is computed on a daily basis and scaled
//! by the period's actually recorded time at the call site.
//!
//! Two scaling conventions and two rate-blending conventions exist in the
//! contract history; both are kept selectable so older projects keep
//! reporting the figures they were invoiced against.

use serde::{Deserialize, Serialize};

use crate::types::{SourceType, TimeTotals};

/// How the daily-basis CTM is scaled to a period's recorded time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CtmScaling {
    /// Scale by `total_time / 24` — standby hours still accrue target.
    Legacy,
    /// Scale by `(total_time - standby) / 24` — standby hours accrue no
    /// target.
    #[default]
    Current,
}

/// How the capped APP/CTM ratio is blended with the standby rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateMethod {
    /// Apply the capped ratio to the full period time.
    Legacy,
    /// Apply the capped ratio only to non-standby time.
    #[default]
    Current,
}

/// Project-level rate constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateParams {
    /// Pay rate for standby hours.
    pub standby_rate: f64,
    /// Rate ceiling once productivity reaches `cap_app_ctm`.
    pub cap_rate: f64,
    /// APP/CTM ratio at which `cap_rate` is reached.
    pub cap_app_ctm: f64,
}

impl From<&crate::types::Project> for RateParams {
    fn from(project: &crate::types::Project) -> Self {
        Self {
            standby_rate: project.standby_rate,
            cap_rate: project.cap_rate,
            cap_app_ctm: project.cap_app_ctm,
        }
    }
}

/// Daily-basis contractual target for one source type.
///
/// `None` when the TCF is undefined or when any of vibrator count, sweep
/// length or move-up is exactly zero — a contract with no fleet or no
/// cycle time has no meaningful target, and the zero guard also keeps the
/// cycle-time division safe.
///
/// The result still has to be scaled by the period's recorded time
/// ([`scale_ctm`]) before it can be compared against actual production.
pub fn calc_ctm(source: &SourceType, tcf: Option<f64>) -> Option<f64> {
    let tcf = tcf?;
    if source.vibes == 0 || source.sweep_length == 0.0 || source.moveup == 0.0 {
        return None;
    }

    Some(
        3600.0 / (source.sweep_length + source.moveup)
            * f64::from(source.vibes)
            * tcf
            * source.rec_hours,
    )
}

/// Scale a daily-basis CTM to the period's recorded time.
///
/// The period's summed `total_time` already embeds the window length
/// (seven reported days carry ~168 hours), so no separate
/// multiply-by-days factor applies.
pub fn scale_ctm(ctm: Option<f64>, time: Option<&TimeTotals>, scaling: CtmScaling) -> Option<f64> {
    let time = time?;
    let hours = match scaling {
        CtmScaling::Legacy => time.total_time,
        CtmScaling::Current => time.total_time - time.standby,
    };
    ctm.map(|c| c * hours / 24.0)
}

/// Re-map an APP/CTM ratio above 1 onto the capped bonus scale.
///
/// Productivity above 100% earns a bonus rate that rises linearly until
/// `cap_app_ctm`, then flattens at `cap_rate`. Ratios at or below 1, or
/// contracts without a meaningful cap, pass through unchanged.
fn cap_ratio(app_ctm: f64, params: &RateParams) -> f64 {
    if app_ctm > 1.0 && params.cap_app_ctm > 1.0 && params.cap_rate > 1.0 {
        1.0 + (params.cap_rate - 1.0) * ((app_ctm - 1.0) / (params.cap_app_ctm - 1.0)).min(1.0)
    } else {
        app_ctm
    }
}

/// Contractual payment rate for a period.
///
/// Callers must skip periods with zero recorded time — `total_time > 0`
/// is a precondition here, enforced where the period aggregate is
/// assembled, not re-checked in this formula.
pub fn calc_rate(
    params: &RateParams,
    app_ctm: Option<f64>,
    total_time: f64,
    standby: f64,
    method: RateMethod,
) -> Option<f64> {
    let capped = cap_ratio(app_ctm?, params);
    let blended = match method {
        RateMethod::Legacy => (capped * total_time + params.standby_rate * standby) / total_time,
        RateMethod::Current => {
            (capped * (total_time - standby) + params.standby_rate * standby) / total_time
        }
    };
    Some(blended)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::numeric::ratio;

    fn source() -> SourceType {
        SourceType {
            name: "Vibes A".into(),
            vibes: 4,
            sweep_length: 20.0,
            moveup: 10.0,
            rec_hours: 20.0,
        }
    }

    fn params() -> RateParams {
        RateParams {
            standby_rate: 0.75,
            cap_rate: 1.05,
            cap_app_ctm: 1.10,
        }
    }

    #[test]
    fn daily_ctm_matches_contract_formula() {
        // 3600 / (20 + 10) * 4 * 0.85 * 20 = 8160
        let ctm = calc_ctm(&source(), Some(0.85)).expect("ctm");
        assert!((ctm - 8160.0).abs() < 1e-9);
    }

    #[test]
    fn ctm_undefined_without_tcf() {
        assert_eq!(calc_ctm(&source(), None), None);
    }

    #[test]
    fn ctm_undefined_for_degenerate_contract() {
        let mut s = source();
        s.vibes = 0;
        assert_eq!(calc_ctm(&s, Some(0.85)), None);

        let mut s = source();
        s.sweep_length = 0.0;
        assert_eq!(calc_ctm(&s, Some(0.85)), None);

        let mut s = source();
        s.moveup = 0.0;
        assert_eq!(calc_ctm(&s, Some(0.85)), None);
    }

    #[test]
    fn scaling_conventions_differ_by_standby() {
        let time = TimeTotals {
            buckets: crate::types::TimeBuckets::default(),
            rec_time: 20.0,
            ops_time: 20.0,
            standby: 2.0,
            downtime: 2.0,
            total_time: 24.0,
        };
        let daily = Some(8160.0);

        let current = scale_ctm(daily, Some(&time), CtmScaling::Current).expect("ctm");
        let legacy = scale_ctm(daily, Some(&time), CtmScaling::Legacy).expect("ctm");
        assert!((current - 8160.0 * 22.0 / 24.0).abs() < 1e-9);
        assert!((legacy - 8160.0).abs() < 1e-9);
    }

    #[test]
    fn scaling_undefined_without_time_totals() {
        assert_eq!(scale_ctm(Some(8160.0), None, CtmScaling::Current), None);
    }

    #[test]
    fn rate_cap_is_exact_at_cap_ratio() {
        // At the cap ratio the capped value equals cap_rate exactly; with
        // zero standby both methods then pay cap_rate flat.
        let p = params();
        let rate =
            calc_rate(&p, Some(p.cap_app_ctm), 24.0, 0.0, RateMethod::Current).expect("rate");
        assert!((rate - p.cap_rate).abs() < 1e-12);
    }

    #[test]
    fn rate_unchanged_at_or_below_one() {
        let p = params();
        let rate = calc_rate(&p, Some(0.8), 24.0, 0.0, RateMethod::Current).expect("rate");
        assert!((rate - 0.8).abs() < 1e-12);
    }

    #[test]
    fn rate_flattens_above_cap_ratio() {
        let p = params();
        let at_cap = calc_rate(&p, Some(1.10), 24.0, 0.0, RateMethod::Current).expect("rate");
        let beyond = calc_rate(&p, Some(1.50), 24.0, 0.0, RateMethod::Current).expect("rate");
        assert!((at_cap - beyond).abs() < 1e-12);
    }

    #[test]
    fn methods_blend_standby_differently() {
        let p = params();
        let legacy = calc_rate(&p, Some(0.9), 24.0, 6.0, RateMethod::Legacy).expect("rate");
        let current = calc_rate(&p, Some(0.9), 24.0, 6.0, RateMethod::Current).expect("rate");
        // Legacy: (0.9 * 24 + 0.75 * 6) / 24
        assert!((legacy - (0.9 * 24.0 + 0.75 * 6.0) / 24.0).abs() < 1e-12);
        // Current: (0.9 * 18 + 0.75 * 6) / 24
        assert!((current - (0.9 * 18.0 + 0.75 * 6.0) / 24.0).abs() < 1e-12);
        assert!(legacy > current);
    }

    #[test]
    fn rate_undefined_without_ratio() {
        assert_eq!(calc_rate(&params(), None, 24.0, 0.0, RateMethod::Current), None);
    }

    #[test]
    fn app_ctm_from_ratio_helper() {
        assert_eq!(ratio(1000.0, 0.0), None);
        let r = ratio(1000.0, 8160.0).expect("ratio");
        assert!((r - 1000.0 / 8160.0).abs() < 1e-12);
    }
}

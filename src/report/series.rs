//! Project-to-date per-day series
//!
//! Builds the ordered per-day series behind the production charts and the
//! monthly production record sheet: terrain breakdown, TCF, CTM, APP/CTM
//! and the time-breakdown sub-totals, one entry per day that has a
//! production record, ascending by date. A pure function of the record
//! window — no streaming state, safe to recompute per request.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::types::{
    ProdTotals, ProductionRecord, Project, Series, TerrainSums, TimeBreakdownRecord, TimeGroup,
};

use super::combine::combine_source_types;
use super::ctm::{calc_ctm, CtmScaling, RateMethod, RateParams};
use super::numeric::ratio_opt;
use super::tcf::{calc_tcf, TerrainCoefficients};

/// Build the project-to-date series from the full record history.
///
/// Consumers index the series by calendar date: every day with a
/// production record appears exactly once, in ascending order, and no day
/// without a record is ever inserted. Days with several source types are
/// combined per day with the same production-weighted rules as the period
/// aggregates.
pub fn build_series(
    project: &Project,
    production: &[ProductionRecord],
    time: &[TimeBreakdownRecord],
    coeff: &TerrainCoefficients,
    scaling: CtmScaling,
) -> Series {
    let mut by_date: BTreeMap<NaiveDate, Vec<&ProductionRecord>> = BTreeMap::new();
    for rec in production {
        by_date.entry(rec.date).or_default().push(rec);
    }

    let time_by_date: BTreeMap<NaiveDate, &TimeBreakdownRecord> =
        time.iter().map(|t| (t.date, t)).collect();

    let rates = RateParams::from(project);
    let mut series = Series::default();

    for (date, records) in by_date {
        // Per-type day figures, combined with the period-aggregate rules.
        let per_type: Vec<ProdTotals> = records
            .iter()
            .filter_map(|rec| {
                let source = project.source_type(&rec.source_type)?;
                let mut terrain = TerrainSums::default();
                terrain.accumulate_counts(&rec.terrain);
                let tcf = calc_tcf(&terrain, coeff);
                Some(ProdTotals {
                    terrain,
                    skips: f64::from(rec.skips),
                    total: terrain.total(),
                    tcf,
                    ctm: calc_ctm(source, tcf),
                    app_ctm: None,
                    rate: None,
                    avg: None,
                    perc_skips: None,
                    vp_hour: None,
                })
            })
            .collect();

        let Some(day) = combine_source_types(&per_type, None, &rates, RateMethod::Current) else {
            continue;
        };

        let day_time = time_by_date.get(&date).map(|t| &t.buckets);
        let (ops, standby, downtime) = day_time.map_or((f64::NAN, f64::NAN, f64::NAN), |b| {
            (
                b.group_sum(TimeGroup::Ops),
                b.group_sum(TimeGroup::Standby),
                b.group_sum(TimeGroup::Downtime),
            )
        });
        let total_time = ops + standby + downtime;

        // Daily CTM scaled by the day's recorded time; without a time
        // breakdown the target for that day is undefined.
        let ctm_scaled = day_time.and_then(|_| {
            let hours = match scaling {
                CtmScaling::Legacy => total_time,
                CtmScaling::Current => total_time - standby,
            };
            day.ctm.map(|c| c * hours / 24.0)
        });
        let app_ctm = ratio_opt(day.total, ctm_scaled);

        series.dates.push(date);
        series.terrain.push(day.terrain);
        series.total.push(day.total);
        series.skips.push(day.skips);
        series.tcf.push(day.tcf);
        series.ctm.push(ctm_scaled);
        series.app_ctm.push(app_ctm);
        series
            .rec_hours
            .push(day_time.map_or(f64::NAN, |b| b.rec_hours));
        series.ops_time.push(ops);
        series.standby.push(standby);
        series.downtime.push(downtime);
        series.total_time.push(total_time);
    }

    series
}

/// Cumulative sum of a series column, NaN entries contributing zero.
/// Used by the cumulative production chart.
pub fn cumulative(values: &[f64]) -> Vec<f64> {
    let mut acc = 0.0;
    values
        .iter()
        .map(|v| {
            if !v.is_nan() {
                acc += v;
            }
            acc
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SourceType, TerrainCounts, TimeBuckets};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 3, d).expect("valid date")
    }

    fn project() -> Project {
        Project {
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
        }
    }

    fn prod(d: NaiveDate, flat: u32) -> ProductionRecord {
        ProductionRecord {
            date: d,
            source_type: "Vibes A".into(),
            terrain: TerrainCounts {
                flat,
                ..TerrainCounts::default()
            },
            skips: 0,
        }
    }

    fn time(d: NaiveDate, rec_hours: f64) -> TimeBreakdownRecord {
        TimeBreakdownRecord {
            date: d,
            buckets: TimeBuckets {
                rec_hours,
                ..TimeBuckets::default()
            },
        }
    }

    #[test]
    fn one_entry_per_recorded_day_ascending() {
        let production = vec![prod(date(3), 900), prod(date(1), 1000), prod(date(5), 800)];
        let times = vec![time(date(1), 20.0), time(date(3), 20.0), time(date(5), 20.0)];
        let series = build_series(
            &project(),
            &production,
            &times,
            &TerrainCoefficients::default(),
            CtmScaling::Current,
        );

        assert_eq!(series.len(), 3);
        assert_eq!(series.dates, vec![date(1), date(3), date(5)]);
        assert!(series.dates.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(series.total.len(), series.len());
        assert_eq!(series.tcf.len(), series.len());
        assert_eq!(series.ctm.len(), series.len());
        assert_eq!(series.app_ctm.len(), series.len());
    }

    #[test]
    fn per_day_tcf_and_ctm() {
        let production = vec![prod(date(1), 1000)];
        let times = vec![time(date(1), 24.0)];
        let series = build_series(
            &project(),
            &production,
            &times,
            &TerrainCoefficients::default(),
            CtmScaling::Current,
        );

        assert_eq!(series.tcf[0], Some(0.85));
        // Daily CTM 8160 scaled by 24 recorded hours.
        let ctm = series.ctm[0].expect("ctm");
        assert!((ctm - 8160.0).abs() < 1e-9);
        let app_ctm = series.app_ctm[0].expect("app/ctm");
        assert!((app_ctm - 1000.0 / 8160.0).abs() < 1e-12);
    }

    #[test]
    fn day_without_time_breakdown_has_undefined_target() {
        let production = vec![prod(date(1), 1000)];
        let series = build_series(
            &project(),
            &production,
            &[],
            &TerrainCoefficients::default(),
            CtmScaling::Current,
        );
        assert_eq!(series.ctm[0], None);
        assert_eq!(series.app_ctm[0], None);
        assert!(series.rec_hours[0].is_nan());
    }

    #[test]
    fn cumulative_skips_nan() {
        let cum = cumulative(&[1.0, f64::NAN, 2.0]);
        assert_eq!(cum, vec![1.0, 1.0, 3.0]);
    }
}

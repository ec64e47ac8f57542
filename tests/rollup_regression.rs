//! Regression tests for the rollup engine
//!
//! Pins the contract arithmetic end-to-end: a known single-day scenario,
//! window boundary behavior, multi-source-type combination and the
//! degraded results for sparse histories.

use chrono::NaiveDate;

use seisreport::report::{
    calc_report_totals, collate_week_data, estimate_completion, project_status, CompletionEstimate,
    CtmScaling, ProjectHistory, RateMethod, RollupOptions, TerrainCoefficients,
};
use seisreport::types::{
    ProductionRecord, Project, ReceiverProductionRecord, ReceiverType, SourceType, TerrainCounts,
    TimeBreakdownRecord, TimeBuckets,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn single_type_project() -> Project {
    Project {
        name: "Haradh 3D".into(),
        crew: "Crew 3".into(),
        planned_vp: 10_000,
        planned_area: 1150.0,
        planned_receivers: 42_000,
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
        receiver_types: vec![ReceiverType {
            name: "Nodes".into(),
            field_qc_rqrmt: 95.0,
        }],
    }
}

fn flat_day(d: NaiveDate, flat: u32, skips: u32) -> ProductionRecord {
    ProductionRecord {
        date: d,
        source_type: "Vibes A".into(),
        terrain: TerrainCounts {
            flat,
            ..TerrainCounts::default()
        },
        skips,
    }
}

fn recording_day(d: NaiveDate, rec_hours: f64, standby: f64, downtime: f64) -> TimeBreakdownRecord {
    TimeBreakdownRecord {
        date: d,
        buckets: TimeBuckets {
            rec_hours,
            company_suspension: standby,
            vibrator_fault: downtime,
            ..TimeBuckets::default()
        },
    }
}

#[test]
fn known_single_day_scenario() {
    // planned_vp=10000, one source type (4 vibes, 20s sweep, 10s moveup,
    // 20 contracted hours), one day: 1000 flat points, 20 recording hours,
    // no standby, no downtime.
    let reference = date(2023, 3, 20);
    let production = vec![flat_day(reference, 1000, 0)];
    let time = vec![recording_day(reference, 20.0, 0.0, 0.0)];
    let history = ProjectHistory {
        production: &production,
        time: &time,
        hse: &[],
        receiver: &[],
    };
    let options = RollupOptions::default();
    let coeff = TerrainCoefficients::default();

    let totals = calc_report_totals(&single_type_project(), history, reference, &options, &coeff)
        .expect("report");
    let day = totals.day.prod.expect("day prod");

    // All production is flat, so the TCF is the flat coefficient.
    assert_eq!(day.tcf, Some(0.85));
    assert!((day.total - 1000.0).abs() < 1e-9);

    // Daily-basis CTM: 3600 / 30 * 4 * 0.85 * 20 = 8160, then scaled by
    // the day's 20 non-standby hours.
    let ctm = day.ctm.expect("ctm");
    assert!((ctm - 8160.0 * 20.0 / 24.0).abs() < 1e-9);

    let app_ctm = day.app_ctm.expect("app/ctm");
    assert!((app_ctm - 1000.0 / ctm).abs() < 1e-12);

    let time_totals = totals.day.time.expect("day time");
    assert!((time_totals.rec_time - 20.0).abs() < 1e-9);
    assert!((time_totals.total_time - 20.0).abs() < 1e-9);
    assert!((time_totals.standby).abs() < 1e-9);
}

#[test]
fn legacy_scaling_counts_standby_hours() {
    let reference = date(2023, 3, 20);
    let production = vec![flat_day(reference, 1000, 0)];
    let time = vec![recording_day(reference, 18.0, 4.0, 0.0)];
    let history = ProjectHistory {
        production: &production,
        time: &time,
        hse: &[],
        receiver: &[],
    };
    let coeff = TerrainCoefficients::default();

    let current = RollupOptions::default();
    let legacy = RollupOptions {
        ctm_scaling: CtmScaling::Legacy,
        rate_method: RateMethod::Legacy,
        ..RollupOptions::default()
    };

    let project = single_type_project();
    let day_current = calc_report_totals(&project, history, reference, &current, &coeff)
        .expect("report")
        .day
        .prod
        .expect("prod");
    let day_legacy = calc_report_totals(&project, history, reference, &legacy, &coeff)
        .expect("report")
        .day
        .prod
        .expect("prod");

    let ctm_current = day_current.ctm.expect("ctm");
    let ctm_legacy = day_legacy.ctm.expect("ctm");
    // 18 vs 22 scaled hours.
    assert!((ctm_current - 8160.0 * 18.0 / 24.0).abs() < 1e-9);
    assert!((ctm_legacy - 8160.0 * 22.0 / 24.0).abs() < 1e-9);
}

#[test]
fn week_window_boundaries() {
    let reference = date(2023, 3, 20);
    // One record on the oldest in-window day, one just outside.
    let production = vec![
        flat_day(date(2023, 3, 14), 700, 0),
        flat_day(date(2023, 3, 13), 9999, 0),
    ];
    let time = vec![recording_day(date(2023, 3, 14), 20.0, 0.0, 0.0)];
    let history = ProjectHistory {
        production: &production,
        time: &time,
        hse: &[],
        receiver: &[],
    };

    let totals = calc_report_totals(
        &single_type_project(),
        history,
        reference,
        &RollupOptions::default(),
        &TerrainCoefficients::default(),
    )
    .expect("report");

    let week = totals.week.prod.expect("week prod");
    assert!((week.total - 700.0).abs() < 1e-9);

    let project_totals = totals.project.prod.expect("project prod");
    assert!((project_totals.total - 10699.0).abs() < 1e-9);
}

#[test]
fn empty_week_is_undefined_not_an_error() {
    // Project just started: the only record predates the week window.
    let reference = date(2023, 6, 20);
    let production = vec![flat_day(date(2023, 3, 1), 1000, 0)];
    let history = ProjectHistory {
        production: &production,
        time: &[],
        hse: &[],
        receiver: &[],
    };

    let totals = calc_report_totals(
        &single_type_project(),
        history,
        reference,
        &RollupOptions::default(),
        &TerrainCoefficients::default(),
    )
    .expect("report");

    assert!(totals.week.prod.is_none());
    assert!(totals.week.time.is_none());
    assert!(totals.week.hse.is_none());
    assert!(totals.week.receiver.is_none());
}

#[test]
fn two_identical_source_types_double_the_total() {
    let mut project = single_type_project();
    project.source_types.push(SourceType {
        name: "Vibes B".into(),
        ..project.source_types[0].clone()
    });

    let reference = date(2023, 3, 20);
    let mut b = flat_day(reference, 1000, 10);
    b.source_type = "Vibes B".into();
    let production = vec![flat_day(reference, 1000, 10), b];
    let time = vec![recording_day(reference, 20.0, 0.0, 0.0)];
    let history = ProjectHistory {
        production: &production,
        time: &time,
        hse: &[],
        receiver: &[],
    };

    let totals = calc_report_totals(
        &project,
        history,
        reference,
        &RollupOptions::default(),
        &TerrainCoefficients::default(),
    )
    .expect("report");
    let day = totals.day.prod.expect("day prod");

    assert!((day.total - 2000.0).abs() < 1e-9);
    assert!((day.skips - 20.0).abs() < 1e-9);
    // Weighted average of equal TCFs is the TCF itself.
    assert_eq!(day.tcf, Some(0.85));
}

#[test]
fn receiver_qc_averages_across_the_window() {
    let reference = date(2023, 3, 20);
    let mk = |d: NaiveDate, qc: f64| ReceiverProductionRecord {
        date: d,
        receiver_type: "Nodes".into(),
        layout: 2000,
        pickup: 1800,
        node_download: 1500,
        node_charged: 1500,
        node_failure: 5,
        node_repair: 3,
        qc_field: qc,
    };
    let production = vec![flat_day(reference, 1000, 0)];
    let receiver = vec![mk(date(2023, 3, 19), 94.0), mk(reference, 98.0)];
    let history = ProjectHistory {
        production: &production,
        time: &[],
        hse: &[],
        receiver: &receiver,
    };

    let totals = calc_report_totals(
        &single_type_project(),
        history,
        reference,
        &RollupOptions::default(),
        &TerrainCoefficients::default(),
    )
    .expect("report");

    let week = totals.week.receiver.expect("week receiver");
    assert_eq!(week.layout, 4000);
    assert_eq!(week.qc_field, Some(96.0));

    let day = totals.day.receiver.expect("day receiver");
    assert_eq!(day.layout, 2000);
    assert_eq!(day.qc_field, Some(98.0));
}

#[test]
fn completion_stops_on_a_finished_project() {
    let production = vec![
        flat_day(date(2023, 3, 18), 800, 0),
        flat_day(date(2023, 3, 19), 400, 0),
        flat_day(date(2023, 3, 20), 0, 0),
    ];
    let est = estimate_completion(&production, date(2023, 3, 20), 14, 10_000, 1.0);
    assert_eq!(est, CompletionEstimate::Stopped(date(2023, 3, 19)));
}

#[test]
fn project_status_drives_the_estimate() {
    let project = single_type_project();
    // 14 days at 500/day: 7000 recorded of 10000 planned.
    let production: Vec<_> = (1..=14)
        .map(|d| flat_day(date(2023, 3, d), 500, 0))
        .collect();
    let status = project_status(
        &project,
        &production,
        date(2023, 3, 14),
        &RollupOptions::default(),
    );

    assert!((status.recorded_vp - 7000.0).abs() < 1e-9);
    assert_eq!(status.complete, Some(0.7));
    // 3000 remaining at 500/day -> 6 days out.
    assert_eq!(
        status.est_completion,
        CompletionEstimate::Projected(date(2023, 3, 20))
    );
}

#[test]
fn weekly_collation_keeps_blank_slots() {
    // Records on only 3 of the last 7 days.
    let reference = date(2023, 3, 20);
    let production: Vec<_> = [18, 19, 20]
        .iter()
        .map(|d| flat_day(date(2023, 3, *d), 1000, 0))
        .collect();
    let history = ProjectHistory {
        production: &production,
        time: &[],
        hse: &[],
        receiver: &[],
    };

    let collation = collate_week_data(
        &single_type_project(),
        history,
        reference,
        &RollupOptions::default(),
        &TerrainCoefficients::default(),
    )
    .expect("collation");

    assert_eq!(collation.days.len(), 7);
    let defined = collation.days.iter().filter(|d| d.prod.is_some()).count();
    assert_eq!(defined, 3);
    let blank = collation.days.iter().filter(|d| d.prod.is_none()).count();
    assert_eq!(blank, 4);
}

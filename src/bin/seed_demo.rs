//! Demo data seeder
//!
//! Populates the record store with a synthetic project history so the
//! dashboard and report endpoints have something to show without a real
//! ingestion feed. Deterministic for a given seed.
//!
//! ```bash
//! cargo run --bin seed-demo -- --days 90 --data-dir ./data/seisreport
//! ```

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tracing::info;

use seisreport::storage::ReportStore;
use seisreport::types::{
    HseWeatherRecord, ProductionRecord, Project, ReceiverProductionRecord, ReceiverType,
    SourceType, TerrainCounts, TimeBreakdownRecord, TimeBuckets,
};

#[derive(Parser, Debug)]
#[command(name = "seed-demo", about = "Seed the record store with a demo project")]
struct CliArgs {
    /// Record store directory
    #[arg(long, default_value = "./data/seisreport")]
    data_dir: PathBuf,

    /// Project name to create
    #[arg(long, default_value = "Haradh 3D")]
    project: String,

    /// Number of production days to generate
    #[arg(long, default_value_t = 90)]
    days: u32,

    /// First production date (YYYY-MM-DD)
    #[arg(long, default_value = "2023-01-01")]
    start: NaiveDate,

    /// RNG seed for reproducible histories
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn demo_project(name: &str) -> Project {
    Project {
        name: name.to_string(),
        crew: "Crew 3".to_string(),
        planned_vp: 250_000,
        planned_area: 1150.0,
        planned_receivers: 42_000,
        planned_start: None,
        planned_end: None,
        standby_rate: 0.75,
        cap_rate: 1.05,
        cap_app_ctm: 1.10,
        source_types: vec![
            SourceType {
                name: "Vibes A".to_string(),
                vibes: 4,
                sweep_length: 20.0,
                moveup: 10.0,
                rec_hours: 20.0,
            },
            SourceType {
                name: "Vibes B".to_string(),
                vibes: 3,
                sweep_length: 24.0,
                moveup: 12.0,
                rec_hours: 20.0,
            },
        ],
        receiver_types: vec![ReceiverType {
            name: "Nodes".to_string(),
            field_qc_rqrmt: 95.0,
        }],
    }
}

fn production_for_day(
    rng: &mut StdRng,
    date: NaiveDate,
    source_type: &str,
    scale: f64,
) -> ProductionRecord {
    let base = (2200.0 * scale) as u32;
    ProductionRecord {
        date,
        source_type: source_type.to_string(),
        terrain: TerrainCounts {
            flat: rng.gen_range(base / 2..=base),
            rough: rng.gen_range(0..=base / 4),
            facilities: rng.gen_range(0..=base / 10),
            dunes: rng.gen_range(0..=base / 5),
            sabkha: rng.gen_range(0..=base / 8),
        },
        skips: rng.gen_range(0..=base / 40),
    }
}

fn time_for_day(rng: &mut StdRng, date: NaiveDate) -> TimeBreakdownRecord {
    let rec_hours: f64 = rng.gen_range(18.0..22.5);
    let standby = if rng.gen_bool(0.1) {
        rng.gen_range(0.5..3.0)
    } else {
        0.0
    };
    let downtime = if rng.gen_bool(0.15) {
        rng.gen_range(0.2..1.5)
    } else {
        0.0
    };
    let remainder = (24.0 - rec_hours - standby - downtime).max(0.0);
    TimeBreakdownRecord {
        date,
        buckets: TimeBuckets {
            rec_hours,
            rec_moveup: remainder * 0.6,
            logistics: remainder * 0.4,
            company_suspension: standby,
            vibrator_fault: downtime,
            ..TimeBuckets::default()
        },
    }
}

fn hse_for_day(rng: &mut StdRng, date: NaiveDate) -> HseWeatherRecord {
    HseWeatherRecord {
        date,
        lti: 0,
        rwc: 0,
        mtc: u32::from(rng.gen_bool(0.01)),
        fac: u32::from(rng.gen_bool(0.02)),
        incident_nm: u32::from(rng.gen_bool(0.05)),
        lsr_violations: u32::from(rng.gen_bool(0.03)),
        stop_cards: rng.gen_range(5..25),
        drills: u32::from(rng.gen_bool(0.1)),
        audits: u32::from(rng.gen_bool(0.07)),
        medevac: 0,
        weather_condition: if rng.gen_bool(0.8) { "Sunny" } else { "Overcast" }.to_string(),
        rain: if rng.gen_bool(0.05) { "Light" } else { "None" }.to_string(),
        temp_min: rng.gen_range(12.0..24.0),
        temp_max: rng.gen_range(28.0..46.0),
        toolbox_talks: vec!["Heat stress awareness".to_string(), "Line crossing safety".to_string()],
    }
}

fn receiver_for_day(rng: &mut StdRng, date: NaiveDate) -> ReceiverProductionRecord {
    ReceiverProductionRecord {
        date,
        receiver_type: "Nodes".to_string(),
        layout: rng.gen_range(1500..2500),
        pickup: rng.gen_range(1200..2200),
        node_download: rng.gen_range(1000..2000),
        node_charged: rng.gen_range(1000..2000),
        node_failure: rng.gen_range(0..25),
        node_repair: rng.gen_range(0..20),
        qc_field: rng.gen_range(93.0..99.5),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);

    let store = ReportStore::open(&args.data_dir)
        .with_context(|| format!("Failed to open record store at {}", args.data_dir.display()))?;

    let project = demo_project(&args.project);
    store
        .upsert_project(&project)
        .context("Failed to store project")?;

    for offset in 0..args.days {
        let date = args.start + Duration::days(i64::from(offset));

        for source in &project.source_types {
            let scale = if source.name == "Vibes A" { 1.0 } else { 0.7 };
            let record = production_for_day(&mut rng, date, &source.name, scale);
            store
                .upsert_production(&project.name, &record)
                .context("Failed to store production record")?;
        }

        store
            .upsert_time(&project.name, &time_for_day(&mut rng, date))
            .context("Failed to store time breakdown")?;
        store
            .upsert_hse(&project.name, &hse_for_day(&mut rng, date))
            .context("Failed to store HSE record")?;
        store
            .upsert_receiver(&project.name, &receiver_for_day(&mut rng, date))
            .context("Failed to store receiver record")?;
    }

    store.flush().context("Failed to flush store")?;
    info!(
        project = %project.name,
        days = args.days,
        data_dir = %args.data_dir.display(),
        "Demo history seeded"
    );
    Ok(())
}

//! seisreport: Land-seismic crew field reporting
//!
//! Ingested daily crew reports become per-day records in an embedded
//! store; the rollup engine aggregates them into day / week-to-date /
//! month-to-date / project-to-date figures for dashboards and the
//! daily/weekly/monthly spreadsheet reports.
//!
//! ## Architecture
//!
//! - **Rollup Engine** (`report`): pure aggregation — TCF/CTM/rate
//!   contract calculations, four-period window sums, multi-source-type
//!   combination, chart series, completion estimate
//! - **Record Store** (`storage`): sled-backed per-day records with
//!   chronological window queries
//! - **API** (`api`): read-only JSON endpoints over the engine
//! - **Config** (`config`): contract constants and rollup behavior

pub mod api;
pub mod config;
pub mod report;
pub mod storage;
pub mod types;

// Re-export crew configuration
pub use config::CrewConfig;

// Re-export commonly used types
pub use types::{
    DomainTotals, HseDayDetail, HseTotals, HseWeatherRecord, Period, ProdTotals,
    ProductionRecord, Project, ReceiverProductionRecord, ReceiverTotals, ReceiverType,
    ReportTotals, Series, SourceType, Terrain, TerrainCounts, TerrainSums, TimeBreakdownRecord,
    TimeBucket, TimeBuckets, TimeGroup, TimeTotals,
};

// Re-export the rollup engine surface
pub use report::{
    calc_report_totals, collate_week_data, estimate_completion, project_status,
    CompletionEstimate, CtmScaling, MissingWindowPolicy, ProjectHistory, RateMethod,
    ReportError, RollupOptions, TerrainCoefficients,
};

// Re-export storage
pub use storage::{ReportStore, StoreError};

//! Shared data structures for the field reporting pipeline
//!
//! - Per-day records as ingested from daily crew reports
//! - Project and contractual parameter types
//! - Derived rollup aggregates and series (never persisted)

mod aggregates;
mod project;
mod records;

pub use aggregates::{
    DomainTotals, HseDayDetail, HseTotals, Period, ProdTotals, ReceiverTotals, ReportTotals,
    Series, TerrainSums, TimeTotals,
};
pub use project::{Project, ReceiverType, SourceType};
pub use records::{
    HseWeatherRecord, ProductionRecord, ReceiverProductionRecord, Terrain, TerrainCounts,
    TimeBreakdownRecord, TimeBucket, TimeBuckets, TimeGroup,
};

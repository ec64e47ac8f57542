//! Persistence for projects and daily report records
//!
//! The rollup engine never talks to this module directly — callers fetch
//! record windows here and hand plain slices to `report`.

mod store;

pub use store::{ReportStore, StoreError};

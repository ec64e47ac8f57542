//! Record store
//!
//! Persists projects and per-day records to sled. Keys are
//! project-scoped with big-endian day numbers so a prefix scan yields a
//! project's records in natural chronological order — exactly the
//! "records up to and including date X, ascending" shape the rollup
//! engine consumes.
//!
//! Ingestion overwrites on re-insert: one row per (day, source/receiver
//! type) is an invariant of the key layout, not of caller discipline.

use chrono::{Datelike, NaiveDate};
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::types::{
    HseWeatherRecord, ProductionRecord, Project, ReceiverProductionRecord, TimeBreakdownRecord,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Sled-backed store for projects and daily report records.
#[derive(Clone)]
pub struct ReportStore {
    db: sled::Db,
    projects: sled::Tree,
    production: sled::Tree,
    time: sled::Tree,
    hse: sled::Tree,
    receiver: sled::Tree,
}

impl ReportStore {
    /// Open or create the store at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        Ok(Self {
            projects: db.open_tree("projects")?,
            production: db.open_tree("production")?,
            time: db.open_tree("time_breakdown")?,
            hse: db.open_tree("hse_weather")?,
            receiver: db.open_tree("receiver_production")?,
            db,
        })
    }

    /// Flush pending writes to disk. Sled also flushes in the background;
    /// this is for shutdown and tests.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    // ========================================================================
    // Projects
    // ========================================================================

    pub fn upsert_project(&self, project: &Project) -> Result<(), StoreError> {
        let value = serde_json::to_vec(project)?;
        self.projects.insert(project.name.as_bytes(), value)?;
        Ok(())
    }

    pub fn get_project(&self, name: &str) -> Result<Option<Project>, StoreError> {
        match self.projects.get(name.as_bytes())? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    /// All project names, lexicographic.
    pub fn list_projects(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for item in self.projects.iter() {
            let (key, _) = item?;
            names.push(String::from_utf8_lossy(&key).into_owned());
        }
        Ok(names)
    }

    // ========================================================================
    // Record upserts (create-or-replace per day and type)
    // ========================================================================

    pub fn upsert_production(
        &self,
        project: &str,
        record: &ProductionRecord,
    ) -> Result<(), StoreError> {
        let key = record_key(project, record.date, &record.source_type);
        self.production.insert(key, serde_json::to_vec(record)?)?;
        Ok(())
    }

    pub fn upsert_time(
        &self,
        project: &str,
        record: &TimeBreakdownRecord,
    ) -> Result<(), StoreError> {
        let key = record_key(project, record.date, "");
        self.time.insert(key, serde_json::to_vec(record)?)?;
        Ok(())
    }

    pub fn upsert_hse(&self, project: &str, record: &HseWeatherRecord) -> Result<(), StoreError> {
        let key = record_key(project, record.date, "");
        self.hse.insert(key, serde_json::to_vec(record)?)?;
        Ok(())
    }

    pub fn upsert_receiver(
        &self,
        project: &str,
        record: &ReceiverProductionRecord,
    ) -> Result<(), StoreError> {
        let key = record_key(project, record.date, &record.receiver_type);
        self.receiver.insert(key, serde_json::to_vec(record)?)?;
        Ok(())
    }

    // ========================================================================
    // Window queries
    // ========================================================================

    /// Production records for `project` up to and including `date`,
    /// ascending by date.
    pub fn production_up_to(
        &self,
        project: &str,
        date: NaiveDate,
    ) -> Result<Vec<ProductionRecord>, StoreError> {
        records_up_to(&self.production, project, date, |r: &ProductionRecord| r.date)
    }

    pub fn time_up_to(
        &self,
        project: &str,
        date: NaiveDate,
    ) -> Result<Vec<TimeBreakdownRecord>, StoreError> {
        records_up_to(&self.time, project, date, |r: &TimeBreakdownRecord| r.date)
    }

    pub fn hse_up_to(
        &self,
        project: &str,
        date: NaiveDate,
    ) -> Result<Vec<HseWeatherRecord>, StoreError> {
        records_up_to(&self.hse, project, date, |r: &HseWeatherRecord| r.date)
    }

    pub fn receiver_up_to(
        &self,
        project: &str,
        date: NaiveDate,
    ) -> Result<Vec<ReceiverProductionRecord>, StoreError> {
        records_up_to(&self.receiver, project, date, |r: &ReceiverProductionRecord| {
            r.date
        })
    }

    /// Most recent date with any production or time record for the
    /// project; the dashboard opens on this date.
    pub fn latest_report_date(&self, project: &str) -> Result<Option<NaiveDate>, StoreError> {
        let latest_prod = last_date(&self.production, project, |r: &ProductionRecord| r.date)?;
        let latest_time = last_date(&self.time, project, |r: &TimeBreakdownRecord| r.date)?;
        Ok(latest_prod.max(latest_time))
    }
}

// ============================================================================
// Key layout
// ============================================================================

/// `{project}\0{day_be}{qualifier}` — the big-endian day number keeps a
/// prefix scan chronological; the qualifier separates per-type rows
/// sharing a date.
fn record_key(project: &str, date: NaiveDate, qualifier: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(project.len() + 1 + 4 + qualifier.len());
    key.extend_from_slice(project.as_bytes());
    key.push(0);
    key.extend_from_slice(&date.num_days_from_ce().to_be_bytes());
    key.extend_from_slice(qualifier.as_bytes());
    key
}

fn project_prefix(project: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(project.len() + 1);
    prefix.extend_from_slice(project.as_bytes());
    prefix.push(0);
    prefix
}

fn records_up_to<T, F>(
    tree: &sled::Tree,
    project: &str,
    date: NaiveDate,
    record_date: F,
) -> Result<Vec<T>, StoreError>
where
    T: DeserializeOwned,
    F: Fn(&T) -> NaiveDate,
{
    let mut records = Vec::new();
    for item in tree.scan_prefix(project_prefix(project)) {
        let (_, value) = item?;
        let record: T = serde_json::from_slice(&value)?;
        if record_date(&record) > date {
            // Keys are chronological within the project prefix.
            break;
        }
        records.push(record);
    }
    Ok(records)
}

fn last_date<T, F>(
    tree: &sled::Tree,
    project: &str,
    record_date: F,
) -> Result<Option<NaiveDate>, StoreError>
where
    T: DeserializeOwned,
    F: Fn(&T) -> NaiveDate,
{
    let mut latest = None;
    for item in tree.scan_prefix(project_prefix(project)) {
        let (_, value) = item?;
        let record: T = serde_json::from_slice(&value)?;
        let date = Some(record_date(&record));
        if date > latest {
            latest = date;
        }
    }
    Ok(latest)
}

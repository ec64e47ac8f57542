//! Report & rollup endpoints
//!
//! Thin layer over the rollup engine: resolve the project, fetch the
//! record window from the store, run the pure aggregation and serialize
//! the result. Undefined values serialize as `null` and render as blank
//! report cells downstream.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::report::{
    self, CompletionEstimate, ProjectHistory, ProjectStatus, ReportError, WeekCollation,
};
use crate::storage::{ReportStore, StoreError};
use crate::types::{Project, ReportTotals, Series};

/// Shared handler state.
#[derive(Clone)]
pub struct DashboardState {
    pub store: Arc<ReportStore>,
}

/// Query parameters shared by the report endpoints.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub project: String,
    /// Reference date; defaults to the latest reported date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("project '{0}' not found")]
    ProjectNotFound(String),

    #[error("project '{0}' has no reports yet")]
    NoReports(String),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::ProjectNotFound(_) | Self::NoReports(_) => StatusCode::NOT_FOUND,
            Self::Report(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

// ============================================================================
// Health
// ============================================================================

/// GET /api/v1/health
pub async fn get_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "seisreport",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ============================================================================
// Projects
// ============================================================================

/// GET /api/v1/projects
pub async fn list_projects(
    State(state): State<DashboardState>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.store.list_projects()?))
}

// ============================================================================
// Rollup report
// ============================================================================

/// Full rollup response: every period crossed with every domain, the
/// project status block and the reference date the report was built for.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub project: String,
    pub crew: String,
    pub totals: ReportTotals,
    pub status: ProjectStatus,
    pub est_completion_display: String,
}

/// GET /api/v1/report?project=Block+9&date=2023-03-20
pub async fn get_report(
    State(state): State<DashboardState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse>, ApiError> {
    let (project, reference) = resolve(&state, &query)?;
    let config = crate::config::get();

    let production = state.store.production_up_to(&project.name, reference)?;
    let time = state.store.time_up_to(&project.name, reference)?;
    let hse = state.store.hse_up_to(&project.name, reference)?;
    let receiver = state.store.receiver_up_to(&project.name, reference)?;

    let history = ProjectHistory {
        production: &production,
        time: &time,
        hse: &hse,
        receiver: &receiver,
    };

    let totals = report::calc_report_totals(
        &project,
        history,
        reference,
        &config.rollup,
        &config.terrain,
    )?;
    let status = report::project_status(&project, &production, reference, &config.rollup);
    let est_completion_display = status.est_completion.to_string();

    Ok(Json(ReportResponse {
        project: project.name.clone(),
        crew: project.crew.clone(),
        totals,
        status,
        est_completion_display,
    }))
}

// ============================================================================
// Series
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SeriesResponse {
    pub project: String,
    pub series: Series,
    pub cumulative_total: Vec<f64>,
}

/// GET /api/v1/series?project=Block+9&date=2023-03-20
///
/// Per-day series for the production, target and time charts.
pub async fn get_series(
    State(state): State<DashboardState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<SeriesResponse>, ApiError> {
    let (project, reference) = resolve(&state, &query)?;
    let config = crate::config::get();

    let production = state.store.production_up_to(&project.name, reference)?;
    let time = state.store.time_up_to(&project.name, reference)?;

    let history = ProjectHistory {
        production: &production,
        time: &time,
        hse: &[],
        receiver: &[],
    };

    let series = report::calc_series(&project, history, &config.rollup, &config.terrain);
    let cumulative_total = report::cumulative(&series.total);

    Ok(Json(SeriesResponse {
        project: project.name.clone(),
        series,
        cumulative_total,
    }))
}

// ============================================================================
// Weekly report
// ============================================================================

#[derive(Debug, Serialize)]
pub struct WeeklyResponse {
    pub project: String,
    pub crew: String,
    pub reference_date: NaiveDate,
    pub collation: WeekCollation,
    pub status: ProjectStatus,
}

/// GET /api/v1/weekly?project=Block+9&date=2023-03-20
///
/// Day and trailing-week tables for the weekly report.
pub async fn get_weekly(
    State(state): State<DashboardState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<WeeklyResponse>, ApiError> {
    let (project, reference) = resolve(&state, &query)?;
    let config = crate::config::get();

    let production = state.store.production_up_to(&project.name, reference)?;
    let time = state.store.time_up_to(&project.name, reference)?;
    let receiver = state.store.receiver_up_to(&project.name, reference)?;

    let history = ProjectHistory {
        production: &production,
        time: &time,
        hse: &[],
        receiver: &receiver,
    };

    let collation = report::collate_week_data(
        &project,
        history,
        reference,
        &config.rollup,
        &config.terrain,
    )?;
    let status = report::project_status(&project, &production, reference, &config.rollup);

    Ok(Json(WeeklyResponse {
        project: project.name.clone(),
        crew: project.crew.clone(),
        reference_date: reference,
        collation,
        status,
    }))
}

// ============================================================================
// Completion estimate
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub project: String,
    pub estimate: CompletionEstimate,
    pub display: String,
}

/// GET /api/v1/completion?project=Block+9&date=2023-03-20
pub async fn get_completion(
    State(state): State<DashboardState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<CompletionResponse>, ApiError> {
    let (project, reference) = resolve(&state, &query)?;
    let config = crate::config::get();

    let production = state.store.production_up_to(&project.name, reference)?;
    let status = report::project_status(&project, &production, reference, &config.rollup);

    Ok(Json(CompletionResponse {
        project: project.name.clone(),
        display: status.est_completion.to_string(),
        estimate: status.est_completion,
    }))
}

// ============================================================================
// Shared resolution
// ============================================================================

/// Resolve the project and reference date for a query; without an explicit
/// date the latest reported date is used.
fn resolve(state: &DashboardState, query: &ReportQuery) -> Result<(Project, NaiveDate), ApiError> {
    let project = state
        .store
        .get_project(&query.project)?
        .ok_or_else(|| ApiError::ProjectNotFound(query.project.clone()))?;

    let reference = match query.date {
        Some(date) => date,
        None => state
            .store
            .latest_report_date(&project.name)?
            .ok_or_else(|| ApiError::NoReports(project.name.clone()))?,
    };

    Ok((project, reference))
}

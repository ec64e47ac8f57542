//! API route definitions
//!
//! Organizes endpoints for the crew reporting dashboard:
//! - /api/v1/health - service liveness
//! - /api/v1/projects - known projects
//! - /api/v1/report - full period rollup for a reference date
//! - /api/v1/series - per-day chart series
//! - /api/v1/weekly - weekly report collation
//! - /api/v1/completion - estimated completion date

use axum::{routing::get, Router};

use super::handlers::{self, DashboardState};

/// Create all API routes for the dashboard
pub fn api_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/projects", get(handlers::list_projects))
        .route("/report", get(handlers::get_report))
        .route("/series", get(handlers::get_series))
        .route("/weekly", get(handlers::get_weekly))
        .route("/completion", get(handlers::get_completion))
        .with_state(state)
}

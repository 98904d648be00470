//! Web API module for Autodiag
//!
//! Provides REST API endpoints for:
//! - Diagnosis (`POST /diagnose`)
//! - Health checks

pub mod diagnose;
pub mod health;

use axum::Router;
use std::sync::Arc;

pub use diagnose::{diagnose_routes, run_diagnosis, DiagnoseResponse, DiagnoseState};
pub use health::health_routes;

/// Create the API router with all endpoints
pub fn api_router(state: Arc<DiagnoseState>) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(diagnose_routes(state))
}

use axum::{Json, Router, extract::State, routing::get};
use std::sync::Arc;

use crate::db::models::{DashboardStats, LogEntryWithService};
use crate::db::services;
use crate::web::{AppError, AppState};

async fn dashboard_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<DashboardStats>, AppError> {
    Ok(Json(services::get_dashboard_stats(&app_state.db_pool).await?))
}

async fn log_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<LogEntryWithService>>, AppError> {
    Ok(Json(services::list_log_entries_with_service(&app_state.db_pool).await?))
}

pub fn create_dashboard_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(dashboard_handler))
        .route("/log", get(log_handler))
}

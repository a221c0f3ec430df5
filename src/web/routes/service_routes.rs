use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use std::sync::Arc;
use tracing::info;

use crate::db::models::Service;
use crate::db::services;
use crate::web::models::{
    AuthenticatedUser, CreateServiceRequest, CreateServiceResponse, MessageResponse,
    SecretResponse, ServiceTokensResponse, present,
};
use crate::web::{AppError, AppState};

async fn create_service_handler(
    Extension(user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<Json<CreateServiceResponse>, AppError> {
    let (Some(name), Some(url)) = (present(payload.name), present(payload.url)) else {
        return Err(AppError::InvalidInput("Please enter all fields".to_string()));
    };

    let service = app_state
        .notification_service
        .directory
        .create_service(&name, &url)
        .await?;
    info!(subject = %user.subject, service_id = service.id, "Service created via API.");
    Ok(Json(CreateServiceResponse {
        id: service.id,
        secret: service.secret,
    }))
}

async fn reset_secret_handler(
    Extension(user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(service_id): Path<i64>,
) -> Result<Json<SecretResponse>, AppError> {
    let secret = app_state
        .notification_service
        .gate
        .rotate_secret(service_id)
        .await?;
    info!(subject = %user.subject, service_id, "Service secret reset via API.");
    Ok(Json(SecretResponse { secret }))
}

async fn list_services_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<Service>>, AppError> {
    let services = app_state
        .notification_service
        .directory
        .list_services()
        .await?;
    Ok(Json(services))
}

async fn delete_service_handler(
    State(app_state): State<Arc<AppState>>,
    Path(service_id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    app_state
        .notification_service
        .directory
        .delete_service(service_id)
        .await?;
    Ok(Json(MessageResponse::new("Service deleted successfully")))
}

async fn service_tokens_handler(
    State(app_state): State<Arc<AppState>>,
    Path(service_id): Path<i64>,
) -> Result<Json<ServiceTokensResponse>, AppError> {
    let service = services::get_service_by_id(&app_state.db_pool, service_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;
    let tokens = app_state
        .notification_service
        .registry
        .list_by_service(service_id)
        .await?;
    Ok(Json(ServiceTokensResponse { service, tokens }))
}

pub fn create_service_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create-service", post(create_service_handler))
        .route("/reset-secret/{service_id}", post(reset_secret_handler))
        .route("/services", get(list_services_handler))
        .route("/services/{service_id}", delete(delete_service_handler))
        .route("/services/{service_id}/tokens", get(service_tokens_handler))
}

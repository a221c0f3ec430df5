use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::db::enums::PlatformVariant;
use crate::db::models::EndpointWithService;
use crate::db::services;
use crate::web::models::{MessageResponse, RegisterTokenRequest, UnregisterTokenRequest, present};
use crate::web::{AppError, AppState};

// --- Route Handlers ---

async fn register_token_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<RegisterTokenRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let (Some(token), Some(service_id), Some(variant)) = (
        present(payload.token),
        payload.service_id,
        present(payload.variant),
    ) else {
        return Err(AppError::InvalidInput(
            "Token, type and serviceId are required".to_string(),
        ));
    };
    let service_id = service_id.parse()?;

    app_state
        .notification_service
        .registry
        .register(&token, service_id, PlatformVariant::from(variant.as_str()))
        .await?;
    Ok(Json(MessageResponse::new("Token registered successfully")))
}

async fn unregister_token_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<UnregisterTokenRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let (Some(token), Some(service_id)) = (present(payload.token), payload.service_id) else {
        return Err(AppError::InvalidInput(
            "Token and serviceId are required".to_string(),
        ));
    };
    let service_id = service_id.parse()?;

    app_state
        .notification_service
        .registry
        .unregister(&token, service_id)
        .await?;
    Ok(Json(MessageResponse::new("Token unregistered successfully")))
}

async fn list_tokens_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<EndpointWithService>>, AppError> {
    let tokens = services::list_endpoints_with_service(&app_state.db_pool).await?;
    Ok(Json(tokens))
}

async fn delete_token_handler(
    State(app_state): State<Arc<AppState>>,
    Path(token_id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    app_state
        .notification_service
        .registry
        .delete_by_id(token_id)
        .await?;
    Ok(Json(MessageResponse::new("Token deleted successfully")))
}

/// Called by client applications; no session required.
pub fn create_public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register-token", post(register_token_handler))
        .route(
            "/unregister-token",
            post(unregister_token_handler).delete(unregister_token_handler),
        )
        .route(
            "/tokens",
            post(register_token_handler).delete(unregister_token_handler),
        )
}

pub fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tokens", get(list_tokens_handler))
        .route("/tokens/{token_id}", delete(delete_token_handler))
}

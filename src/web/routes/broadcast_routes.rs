use axum::{Json, Router, extract::State, routing::post};
use std::sync::Arc;

use crate::notifications::models::Message;
use crate::web::models::{BroadcastRequest, BroadcastResponse, present};
use crate::web::{AppError, AppState};

/// Sends to every endpoint of the service named in the request, authorized by
/// the service secret. Answers once all deliveries have settled.
async fn broadcast_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<BroadcastRequest>,
) -> Result<Json<BroadcastResponse>, AppError> {
    let (Some(title), Some(body), Some(service_id), Some(secret)) = (
        present(payload.title),
        present(payload.body),
        payload.service_id,
        present(payload.secret),
    ) else {
        return Err(AppError::InvalidInput(
            "Title, body, serviceId, and secret are required".to_string(),
        ));
    };
    let service_id = service_id.parse()?;
    let message = Message::new(title, body)?;

    let result = app_state
        .notification_service
        .authorized_broadcast(service_id, &secret, message)
        .await?;
    Ok(Json(result.into()))
}

pub fn create_public_router() -> Router<Arc<AppState>> {
    Router::new().route("/broadcast", post(broadcast_handler))
}

/// The dashboard's test send. Same contract as `/broadcast`, behind a session.
pub fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new().route("/test-notification", post(broadcast_handler))
}

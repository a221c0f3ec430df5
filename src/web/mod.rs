use axum::{
    Router,
    http::Method,
    middleware as axum_middleware,
    routing::get,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::notifications::service::NotificationService;
use crate::server::config::ServerConfig;
use crate::web::{middleware::auth, routes::*};

pub use error::AppError;

pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub notification_service: Arc<NotificationService>,
    pub config: Arc<ServerConfig>,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn create_axum_router(
    db_pool: SqlitePool,
    notification_service: Arc<NotificationService>,
    config: Arc<ServerConfig>,
) -> Router {
    let app_state = Arc::new(AppState {
        db_pool,
        notification_service,
        config,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    let protected = service_routes::create_service_router()
        .merge(token_routes::create_protected_router())
        .merge(broadcast_routes::create_protected_router())
        .merge(dashboard_routes::create_dashboard_router())
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::auth));

    Router::new()
        .route("/health", get(health_check_handler))
        .merge(token_routes::create_public_router())
        .merge(broadcast_routes::create_public_router())
        .merge(protected)
        .with_state(app_state)
        .layer(cors)
}

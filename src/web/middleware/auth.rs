use axum::{
    body::Body as AxumBody,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::warn;

use crate::services::auth_service::verify_session_token;
use crate::web::models::AuthenticatedUser;
use crate::web::{AppState, error::AppError};

/// Requires a valid session token, from the `Authorization: Bearer` header or
/// the `token` cookie.
pub async fn auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request<AxumBody>,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|s| s.to_string())
        .or_else(|| jar.get("token").map(|c| c.value().to_string()))
        .ok_or_else(|| AppError::Unauthorized("No token provided".to_string()))?;

    let claims = verify_session_token(&token, &state.config.jwt_secret).map_err(|e| {
        warn!(error = ?e, "Session token rejected.");
        AppError::Unauthorized("Invalid or expired token".to_string())
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        subject: claims.sub,
    });
    Ok(next.run(req).await)
}

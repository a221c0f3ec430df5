use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims of an admin session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Token creation failed: {0}")]
    Creation(jsonwebtoken::errors::Error),
    #[error("Invalid or expired token")]
    Invalid(jsonwebtoken::errors::Error),
}

/// Issues an HS256 session token for `subject` that expires after `ttl`.
pub fn issue_session_token(subject: &str, jwt_secret: &str, ttl: Duration) -> Result<String, SessionError> {
    let now = Utc::now();
    let claims = Claims {
        sub: subject.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )
    .map_err(SessionError::Creation)
}

/// Checks signature and expiry.
pub fn verify_session_token(token: &str, jwt_secret: &str) -> Result<Claims, SessionError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(SessionError::Invalid)
}

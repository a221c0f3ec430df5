use serde::{Deserialize, Serialize};

use crate::db::models::{Endpoint, Service};
use crate::notifications::models::BroadcastResult;
use crate::web::error::AppError;

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub subject: String,
}

/// `serviceId` as clients send it: a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ServiceIdParam {
    Number(i64),
    Text(String),
}

impl ServiceIdParam {
    pub fn parse(&self) -> Result<i64, AppError> {
        match self {
            ServiceIdParam::Number(id) => Ok(*id),
            ServiceIdParam::Text(raw) => raw
                .trim()
                .parse()
                .map_err(|_| AppError::InvalidInput("serviceId must be an integer".to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTokenRequest {
    pub token: Option<String>,
    pub service_id: Option<ServiceIdParam>,
    #[serde(rename = "type")]
    pub variant: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnregisterTokenRequest {
    pub token: Option<String>,
    pub service_id: Option<ServiceIdParam>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub service_id: Option<ServiceIdParam>,
    pub secret: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub name: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateServiceResponse {
    pub id: i64,
    pub secret: String,
}

#[derive(Debug, Serialize)]
pub struct SecretResponse {
    pub secret: String,
}

#[derive(Debug, Serialize)]
pub struct ServiceTokensResponse {
    pub service: Service,
    pub tokens: Vec<Endpoint>,
}

#[derive(Debug, Serialize)]
pub struct BroadcastResponse {
    pub message: String,
    pub recipients: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl From<BroadcastResult> for BroadcastResponse {
    fn from(result: BroadcastResult) -> Self {
        Self {
            message: result.summary(),
            recipients: result.recipients(),
            succeeded: result.succeeded,
            failed: result.failed,
        }
    }
}

/// A present, non-blank string field, or `None`.
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use super::envelope::Envelope;

pub mod fcm;
pub mod unconfigured;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Push gateway is not configured")]
    NotConfigured,
    #[error("Gateway rejected the message: {0}")]
    Rejected(String),
    #[error("Gateway authentication failed: {0}")]
    Authentication(String),
    #[error("Invalid gateway credentials: {0}")]
    InvalidCredentials(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Delivers one envelope to one device token.
///
/// Every call settles exactly once, with an opaque receipt on success or the
/// gateway's error. Implementations own their own timeout policy.
#[async_trait]
pub trait PushGateway: Send + Sync {
    async fn send(&self, envelope: &Envelope, token: &str) -> Result<String, GatewayError>;
}

/// Builds the gateway for the configured service account, or a gateway that
/// rejects every send when none is configured.
pub fn load_gateway(service_account: Option<&str>) -> Result<Arc<dyn PushGateway>, GatewayError> {
    match service_account {
        Some(path) => {
            let gateway = fcm::FcmGateway::from_service_account_file(Path::new(path))?;
            info!(project_id = %gateway.project_id(), "FCM gateway initialized.");
            Ok(Arc::new(gateway))
        }
        None => {
            warn!("No FCM service account configured. Continuing without push delivery.");
            Ok(Arc::new(unconfigured::UnconfiguredGateway))
        }
    }
}

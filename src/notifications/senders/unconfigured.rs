use async_trait::async_trait;

use super::{GatewayError, PushGateway};
use crate::notifications::envelope::Envelope;

/// Stands in when no gateway credentials are available. Every send fails, so
/// broadcasts still settle and report their recipients as failed.
pub struct UnconfiguredGateway;

#[async_trait]
impl PushGateway for UnconfiguredGateway {
    async fn send(&self, _envelope: &Envelope, _token: &str) -> Result<String, GatewayError> {
        Err(GatewayError::NotConfigured)
    }
}

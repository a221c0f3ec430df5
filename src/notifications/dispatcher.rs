use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

use super::envelope;
use super::models::{BroadcastResult, DispatchOutcome, Message};
use super::senders::PushGateway;
use crate::db::models::Endpoint;

/// Fans one message out to a set of endpoints and joins on every send.
#[derive(Clone)]
pub struct Dispatcher {
    gateway: Arc<dyn PushGateway>,
}

impl Dispatcher {
    pub fn new(gateway: Arc<dyn PushGateway>) -> Self {
        Self { gateway }
    }

    /// Sends to all `endpoints` concurrently and returns once every send has
    /// settled. A failed send is recorded as a failure and never cancels the
    /// others. Each send runs on its own task, so dropping this future does not
    /// abort sends already handed to the gateway.
    pub async fn dispatch(
        &self,
        endpoints: Vec<Endpoint>,
        message: &Message,
        target_url: &str,
    ) -> BroadcastResult {
        if endpoints.is_empty() {
            return BroadcastResult::no_recipients();
        }

        let (tokens, sends): (Vec<_>, Vec<_>) = endpoints
            .into_iter()
            .map(|endpoint| {
                let envelope = envelope::build(message, &endpoint.variant, target_url);
                let gateway = Arc::clone(&self.gateway);
                let token = endpoint.token.clone();
                let send = tokio::spawn(async move { gateway.send(&envelope, &token).await });
                (endpoint.token, send)
            })
            .unzip();

        let settled = join_all(sends).await;

        let outcomes = tokens
            .into_iter()
            .zip(settled)
            .map(|(token, result)| match result {
                Ok(Ok(receipt)) => {
                    debug!(token = %token, receipt = %receipt, "Notification delivered.");
                    DispatchOutcome::delivered(token, receipt)
                }
                Ok(Err(e)) => {
                    warn!(token = %token, error = %e, "Error sending notification to token.");
                    DispatchOutcome::failed(token, e.to_string())
                }
                Err(e) => {
                    warn!(token = %token, error = %e, "Send task did not complete.");
                    DispatchOutcome::failed(token, format!("Send task failed: {e}"))
                }
            })
            .collect();

        BroadcastResult::from_outcomes(outcomes)
    }
}

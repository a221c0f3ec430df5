use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::NotificationError;
use super::authorization::AuthorizationGate;
use super::directory::ServiceDirectory;
use super::dispatcher::Dispatcher;
use super::locks::ServiceLocks;
use super::models::{BroadcastPhase, BroadcastResult, Message};
use super::registry::EndpointRegistry;
use super::senders::PushGateway;
use crate::db::enums::LogType;
use crate::db::models::Service;
use crate::db::services as db;

/// Entry point for everything the HTTP layer does with services, endpoints
/// and broadcasts.
pub struct NotificationService {
    pool: SqlitePool,
    pub registry: EndpointRegistry,
    pub gate: AuthorizationGate,
    pub directory: ServiceDirectory,
    dispatcher: Dispatcher,
}

impl NotificationService {
    pub fn new(pool: SqlitePool, gateway: Arc<dyn PushGateway>) -> Self {
        let locks = ServiceLocks::new();
        Self {
            registry: EndpointRegistry::new(pool.clone(), locks.clone()),
            gate: AuthorizationGate::new(pool.clone(), locks.clone()),
            directory: ServiceDirectory::new(pool.clone(), locks),
            dispatcher: Dispatcher::new(gateway),
            pool,
        }
    }

    /// Broadcast on behalf of a caller presenting the service's shared secret.
    /// Authorization failures return before anything is sent.
    pub async fn authorized_broadcast(
        &self,
        service_id: i64,
        secret: &str,
        message: Message,
    ) -> Result<BroadcastResult, NotificationError> {
        enter(service_id, BroadcastPhase::Idle);
        enter(service_id, BroadcastPhase::Authorizing);
        let service = match self.gate.authorize(service_id, secret).await {
            Ok(service) => service,
            Err(e) => {
                enter(service_id, rejection_phase(&e));
                return Err(e);
            }
        };
        self.dispatch_to_service(service, message).await
    }

    async fn dispatch_to_service(
        &self,
        service: Service,
        message: Message,
    ) -> Result<BroadcastResult, NotificationError> {
        let service_id = service.id;
        enter(service_id, BroadcastPhase::Resolving);
        let endpoints = match self.registry.list_by_service(service_id).await {
            Ok(endpoints) => endpoints,
            Err(e) => {
                enter(service_id, BroadcastPhase::Failed);
                return Err(e);
            }
        };

        if endpoints.is_empty() {
            info!(service_id, "No tokens found for service.");
            let result = BroadcastResult::no_recipients();
            enter(service_id, BroadcastPhase::Done { succeeded: 0, failed: 0 });
            return Ok(result);
        }

        enter(service_id, BroadcastPhase::Dispatching { in_flight: endpoints.len() });
        // Run the fan-out and its log entry on a separate task so both finish
        // even if the caller stops waiting.
        let dispatcher = self.dispatcher.clone();
        let pool = self.pool.clone();
        let run = tokio::spawn(async move {
            let result = dispatcher.dispatch(endpoints, &message, &service.url).await;
            enter(service_id, BroadcastPhase::Aggregating);
            record_summary(&pool, service_id, &message, &result).await;
            result
        });

        let result = run
            .await
            .map_err(|e| NotificationError::Internal(format!("Broadcast task failed: {e}")))?;
        enter(
            service_id,
            BroadcastPhase::Done {
                succeeded: result.succeeded,
                failed: result.failed,
            },
        );
        info!(
            service_id,
            succeeded = result.succeeded,
            failed = result.failed,
            "Broadcast finished."
        );
        Ok(result)
    }
}

fn enter(service_id: i64, phase: BroadcastPhase) {
    debug!(service_id, phase = ?phase, terminal = phase.is_terminal(), "Broadcast phase.");
}

fn rejection_phase(err: &NotificationError) -> BroadcastPhase {
    match err {
        NotificationError::NotFound(_) => BroadcastPhase::NotFound,
        NotificationError::Forbidden => BroadcastPhase::Unauthorized,
        _ => BroadcastPhase::Failed,
    }
}

// The deliveries already happened, so a failed log write is reported but not
// propagated.
async fn record_summary(pool: &SqlitePool, service_id: i64, message: &Message, result: &BroadcastResult) {
    let content = format!(
        "Broadcast \"{}\": {} delivered, {} failed",
        message.title, result.succeeded, result.failed
    );
    let log_type = if result.failed > 0 && result.succeeded == 0 {
        LogType::Error
    } else {
        LogType::Info
    };
    if let Err(e) = db::create_log_entry(pool, log_type, &content, Some(service_id)).await {
        error!(service_id, error = %e, "Failed to insert log entry.");
    }
}

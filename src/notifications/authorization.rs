use sqlx::SqlitePool;
use tracing::{info, warn};

use super::NotificationError;
use super::locks::ServiceLocks;
use crate::db::enums::LogType;
use crate::db::models::Service;
use crate::db::services as db;

/// Bytes of randomness in a service secret (256 bits).
pub const SECRET_BYTES: usize = 32;

/// A fresh hex-encoded service secret.
pub fn generate_secret() -> String {
    hex::encode(rand::random::<[u8; SECRET_BYTES]>())
}

/// Checks broadcast requests against the per-service shared secret.
#[derive(Clone)]
pub struct AuthorizationGate {
    pool: SqlitePool,
    locks: ServiceLocks,
}

impl AuthorizationGate {
    pub fn new(pool: SqlitePool, locks: ServiceLocks) -> Self {
        Self { pool, locks }
    }

    /// Returns the service when `supplied_secret` is exactly its stored secret.
    pub async fn authorize(
        &self,
        service_id: i64,
        supplied_secret: &str,
    ) -> Result<Service, NotificationError> {
        let service = db::get_service_by_id(&self.pool, service_id)
            .await?
            .ok_or_else(|| NotificationError::NotFound("Service not found".to_string()))?;

        if service.secret != supplied_secret {
            warn!(service_id, "Rejected request with invalid secret.");
            return Err(NotificationError::Forbidden);
        }
        Ok(service)
    }

    /// Replaces the service's secret. The previous secret stops working as soon
    /// as this returns.
    pub async fn rotate_secret(&self, service_id: i64) -> Result<String, NotificationError> {
        let _guard = self.locks.lock(service_id).await;
        let mut tx = self.pool.begin().await?;

        let secret = generate_secret();
        if db::update_service_secret(&mut *tx, service_id, &secret).await? == 0 {
            return Err(NotificationError::NotFound("Service not found".to_string()));
        }
        db::create_log_entry(&mut *tx, LogType::Info, "Secret reset", Some(service_id)).await?;
        tx.commit().await?;

        info!(service_id, "Service secret rotated.");
        Ok(secret)
    }
}

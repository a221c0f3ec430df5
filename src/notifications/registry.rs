use sqlx::SqlitePool;
use tracing::{info, warn};

use super::locks::ServiceLocks;
use super::{NotificationError, require_non_empty};
use crate::db::enums::{LogType, PlatformVariant};
use crate::db::models::Endpoint;
use crate::db::services as db;

/// Device endpoints per service.
///
/// Each mutation and its log entry commit in one transaction, under the
/// owning service's writer lock.
#[derive(Clone)]
pub struct EndpointRegistry {
    pool: SqlitePool,
    locks: ServiceLocks,
}

impl EndpointRegistry {
    pub fn new(pool: SqlitePool, locks: ServiceLocks) -> Self {
        Self { pool, locks }
    }

    /// Registers `token` for `service_id`. A token already known anywhere in the
    /// system fails with `Conflict` and leaves the existing row untouched.
    pub async fn register(
        &self,
        token: &str,
        service_id: i64,
        variant: PlatformVariant,
    ) -> Result<Endpoint, NotificationError> {
        require_non_empty("token", token)?;
        require_non_empty("type", variant.as_str())?;

        let _guard = self.locks.lock(service_id).await;
        let mut tx = self.pool.begin().await?;

        let endpoint = db::insert_endpoint(&mut *tx, token, service_id, &variant)
            .await
            .map_err(classify_insert_error)?;
        db::create_log_entry(
            &mut *tx,
            LogType::Info,
            &format!("Token registered ({token})"),
            Some(service_id),
        )
        .await?;
        tx.commit().await?;

        info!(service_id, variant = %variant, token = %token, "Token registered.");
        Ok(endpoint)
    }

    /// Removes `token` only if it is owned by `service_id`.
    pub async fn unregister(&self, token: &str, service_id: i64) -> Result<(), NotificationError> {
        require_non_empty("token", token)?;

        let _guard = self.locks.lock(service_id).await;
        let mut tx = self.pool.begin().await?;

        let removed = db::delete_endpoint_for_service(&mut *tx, token, service_id).await?;
        if removed == 0 {
            return Err(NotificationError::NotFound(
                "Token not found for the service".to_string(),
            ));
        }
        db::create_log_entry(
            &mut *tx,
            LogType::Info,
            &format!("Token unregistered ({token})"),
            Some(service_id),
        )
        .await?;
        tx.commit().await?;

        info!(service_id, token = %token, "Token unregistered.");
        Ok(())
    }

    /// Endpoints of a service in insertion order. Empty when it has none.
    pub async fn list_by_service(&self, service_id: i64) -> Result<Vec<Endpoint>, NotificationError> {
        Ok(db::list_endpoints_by_service(&self.pool, service_id).await?)
    }

    /// Administrative removal by row id.
    pub async fn delete_by_id(&self, endpoint_id: i64) -> Result<(), NotificationError> {
        let endpoint = db::get_endpoint_by_id(&self.pool, endpoint_id)
            .await?
            .ok_or_else(|| NotificationError::NotFound("Token not found".to_string()))?;

        let _guard = self.locks.lock(endpoint.service_id).await;
        let mut tx = self.pool.begin().await?;

        // Someone else may have removed it while we waited for the lock.
        if db::delete_endpoint_by_id(&mut *tx, endpoint_id).await? == 0 {
            return Err(NotificationError::NotFound("Token not found".to_string()));
        }
        db::create_log_entry(
            &mut *tx,
            LogType::Warning,
            &format!("Token deleted (ID: {endpoint_id})"),
            Some(endpoint.service_id),
        )
        .await?;
        tx.commit().await?;

        warn!(endpoint_id, service_id = endpoint.service_id, "Token deleted by administrator.");
        Ok(())
    }
}

fn classify_insert_error(err: sqlx::Error) -> NotificationError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return NotificationError::Conflict;
        }
        if db_err.is_foreign_key_violation() {
            return NotificationError::NotFound("Service not found".to_string());
        }
    }
    NotificationError::Store(err)
}

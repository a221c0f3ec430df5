use sqlx::SqlitePool;
use tracing::{info, warn};

use super::authorization::generate_secret;
use super::locks::ServiceLocks;
use super::{NotificationError, require_non_empty};
use crate::db::enums::LogType;
use crate::db::models::Service;
use crate::db::services as db;

/// Creation and removal of client services.
#[derive(Clone)]
pub struct ServiceDirectory {
    pool: SqlitePool,
    locks: ServiceLocks,
}

impl ServiceDirectory {
    pub fn new(pool: SqlitePool, locks: ServiceLocks) -> Self {
        Self { pool, locks }
    }

    /// Creates a service with a freshly generated secret.
    pub async fn create_service(&self, name: &str, url: &str) -> Result<Service, NotificationError> {
        require_non_empty("name", name)?;
        require_non_empty("url", url)?;

        let mut tx = self.pool.begin().await?;
        let service = db::create_service(&mut *tx, name.trim(), url.trim(), &generate_secret()).await?;
        db::create_log_entry(
            &mut *tx,
            LogType::Info,
            &format!("Service created ({})", service.name),
            Some(service.id),
        )
        .await?;
        tx.commit().await?;

        info!(service_id = service.id, name = %service.name, "Service created.");
        Ok(service)
    }

    pub async fn list_services(&self) -> Result<Vec<Service>, NotificationError> {
        Ok(db::list_services(&self.pool).await?)
    }

    /// Deletes a service and, through the foreign key, all of its endpoints.
    pub async fn delete_service(&self, service_id: i64) -> Result<(), NotificationError> {
        let _guard = self.locks.lock(service_id).await;
        let mut tx = self.pool.begin().await?;

        if db::delete_service(&mut *tx, service_id).await? == 0 {
            return Err(NotificationError::NotFound("Service not found".to_string()));
        }
        // The row is gone, so the entry cannot reference it.
        db::create_log_entry(
            &mut *tx,
            LogType::Warning,
            &format!("Service deleted (ID: {service_id})"),
            None,
        )
        .await?;
        tx.commit().await?;

        warn!(service_id, "Service deleted.");
        Ok(())
    }
}

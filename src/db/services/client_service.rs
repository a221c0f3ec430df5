use chrono::Utc;
use sqlx::{Result, SqliteExecutor};

use crate::db::models::{DashboardStats, Service};

/// Inserts a new service row.
pub async fn create_service<'e, E>(executor: E, name: &str, url: &str, secret: &str) -> Result<Service>
where
    E: SqliteExecutor<'e>,
{
    let now = Utc::now();
    sqlx::query_as::<_, Service>(
        r#"
        INSERT INTO services (name, url, secret, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, name, url, secret, created_at
        "#,
    )
    .bind(name)
    .bind(url)
    .bind(secret)
    .bind(now)
    .fetch_one(executor)
    .await
}

pub async fn get_service_by_id<'e, E>(executor: E, service_id: i64) -> Result<Option<Service>>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Service>(
        "SELECT id, name, url, secret, created_at FROM services WHERE id = ?",
    )
    .bind(service_id)
    .fetch_optional(executor)
    .await
}

pub async fn list_services<'e, E>(executor: E) -> Result<Vec<Service>>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Service>(
        "SELECT id, name, url, secret, created_at FROM services ORDER BY id ASC",
    )
    .fetch_all(executor)
    .await
}

/// Replaces a service's secret. Returns the number of rows touched (0 or 1).
pub async fn update_service_secret<'e, E>(executor: E, service_id: i64, secret: &str) -> Result<u64>
where
    E: SqliteExecutor<'e>,
{
    let rows_affected = sqlx::query("UPDATE services SET secret = ? WHERE id = ?")
        .bind(secret)
        .bind(service_id)
        .execute(executor)
        .await?
        .rows_affected();
    Ok(rows_affected)
}

/// Deletes a service. The ON DELETE CASCADE on fcm_tokens removes its endpoints.
pub async fn delete_service<'e, E>(executor: E, service_id: i64) -> Result<u64>
where
    E: SqliteExecutor<'e>,
{
    let rows_affected = sqlx::query("DELETE FROM services WHERE id = ?")
        .bind(service_id)
        .execute(executor)
        .await?
        .rows_affected();
    Ok(rows_affected)
}

pub async fn get_dashboard_stats<'e, E>(executor: E) -> Result<DashboardStats>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, DashboardStats>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM services) AS services_count,
            (SELECT COUNT(*) FROM fcm_tokens) AS tokens_count
        "#,
    )
    .fetch_one(executor)
    .await
}

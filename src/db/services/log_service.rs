use chrono::Utc;
use sqlx::{Result, SqliteExecutor, SqlitePool};
use std::collections::HashMap;

use crate::db::enums::LogType;
use crate::db::models::{LogEntry, LogEntryWithService};

use super::client_service::list_services;

/// Appends a log entry. `updated_at` is stamped equal to `created_at`.
pub async fn create_log_entry<'e, E>(
    executor: E,
    log_type: LogType,
    content: &str,
    service_id: Option<i64>,
) -> Result<LogEntry>
where
    E: SqliteExecutor<'e>,
{
    let now = Utc::now();
    sqlx::query_as::<_, LogEntry>(
        r#"
        INSERT INTO log (type, content, service_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, type, content, service_id, created_at, updated_at
        "#,
    )
    .bind(log_type)
    .bind(content)
    .bind(service_id)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await
}

/// Newest first.
pub async fn list_log_entries<'e, E>(executor: E) -> Result<Vec<LogEntry>>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, LogEntry>(
        r#"
        SELECT id, type, content, service_id, created_at, updated_at
        FROM log
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(executor)
    .await
}

/// Log entries enriched with the service record they refer to, if it still exists.
pub async fn list_log_entries_with_service(pool: &SqlitePool) -> Result<Vec<LogEntryWithService>> {
    let entries = list_log_entries(pool).await?;
    let services: HashMap<_, _> = list_services(pool)
        .await?
        .into_iter()
        .map(|service| (service.id, service))
        .collect();

    Ok(entries
        .into_iter()
        .map(|entry| {
            let service = entry.service_id.and_then(|id| services.get(&id).cloned());
            LogEntryWithService { entry, service }
        })
        .collect())
}

use sqlx::{Result, SqliteExecutor};

use crate::db::enums::PlatformVariant;
use crate::db::models::{Endpoint, EndpointRow, EndpointWithService, EndpointWithServiceRow};

const ENDPOINT_COLUMNS: &str = "id, token, serviceId AS service_id, type AS variant";

pub async fn get_endpoint_by_token<'e, E>(executor: E, token: &str) -> Result<Option<Endpoint>>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query_as::<_, EndpointRow>(&format!(
        "SELECT {ENDPOINT_COLUMNS} FROM fcm_tokens WHERE token = ?"
    ))
    .bind(token)
    .fetch_optional(executor)
    .await?;
    Ok(row.map(Endpoint::from))
}

pub async fn get_endpoint_by_id<'e, E>(executor: E, endpoint_id: i64) -> Result<Option<Endpoint>>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query_as::<_, EndpointRow>(&format!(
        "SELECT {ENDPOINT_COLUMNS} FROM fcm_tokens WHERE id = ?"
    ))
    .bind(endpoint_id)
    .fetch_optional(executor)
    .await?;
    Ok(row.map(Endpoint::from))
}

pub async fn insert_endpoint<'e, E>(
    executor: E,
    token: &str,
    service_id: i64,
    variant: &PlatformVariant,
) -> Result<Endpoint>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query_as::<_, EndpointRow>(&format!(
        "INSERT INTO fcm_tokens (token, serviceId, type) VALUES (?, ?, ?) RETURNING {ENDPOINT_COLUMNS}"
    ))
    .bind(token)
    .bind(service_id)
    .bind(variant.as_str())
    .fetch_one(executor)
    .await?;
    Ok(Endpoint::from(row))
}

/// Deletes the endpoint only if `token` belongs to `service_id`.
pub async fn delete_endpoint_for_service<'e, E>(executor: E, token: &str, service_id: i64) -> Result<u64>
where
    E: SqliteExecutor<'e>,
{
    let rows_affected = sqlx::query("DELETE FROM fcm_tokens WHERE token = ? AND serviceId = ?")
        .bind(token)
        .bind(service_id)
        .execute(executor)
        .await?
        .rows_affected();
    Ok(rows_affected)
}

pub async fn delete_endpoint_by_id<'e, E>(executor: E, endpoint_id: i64) -> Result<u64>
where
    E: SqliteExecutor<'e>,
{
    let rows_affected = sqlx::query("DELETE FROM fcm_tokens WHERE id = ?")
        .bind(endpoint_id)
        .execute(executor)
        .await?
        .rows_affected();
    Ok(rows_affected)
}

/// All endpoints of a service in insertion order.
pub async fn list_endpoints_by_service<'e, E>(executor: E, service_id: i64) -> Result<Vec<Endpoint>>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query_as::<_, EndpointRow>(&format!(
        "SELECT {ENDPOINT_COLUMNS} FROM fcm_tokens WHERE serviceId = ? ORDER BY id ASC"
    ))
    .bind(service_id)
    .fetch_all(executor)
    .await?;
    Ok(rows.into_iter().map(Endpoint::from).collect())
}

/// Every endpoint joined with its owning service, newest first.
pub async fn list_endpoints_with_service<'e, E>(executor: E) -> Result<Vec<EndpointWithService>>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query_as::<_, EndpointWithServiceRow>(
        r#"
        SELECT t.id, t.token, t.serviceId AS service_id, t.type AS variant,
               s.name AS service_name, s.url AS service_url
        FROM fcm_tokens t
        JOIN services s ON t.serviceId = s.id
        ORDER BY t.id DESC
        "#,
    )
    .fetch_all(executor)
    .await?;
    Ok(rows.into_iter().map(EndpointWithService::from).collect())
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::enums::{LogType, PlatformVariant};

/// A client service that owns endpoints and may broadcast to them.
/// Corresponds to the `services` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub secret: String,
    pub created_at: DateTime<Utc>,
}

/// A registered device token.
/// Corresponds to the `fcm_tokens` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub id: i64,
    pub token: String,
    pub service_id: i64,
    #[serde(rename = "type")]
    pub variant: PlatformVariant,
}

#[derive(FromRow)]
pub(crate) struct EndpointRow {
    pub id: i64,
    pub token: String,
    pub service_id: i64,
    pub variant: String,
}

impl From<EndpointRow> for Endpoint {
    fn from(row: EndpointRow) -> Self {
        Endpoint {
            id: row.id,
            token: row.token,
            service_id: row.service_id,
            variant: PlatformVariant::from(row.variant),
        }
    }
}

/// An endpoint together with the name and url of its owning service, for admin listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointWithService {
    #[serde(flatten)]
    pub endpoint: Endpoint,
    pub service_name: String,
    pub service_url: String,
}

#[derive(FromRow)]
pub(crate) struct EndpointWithServiceRow {
    pub id: i64,
    pub token: String,
    pub service_id: i64,
    pub variant: String,
    pub service_name: String,
    pub service_url: String,
}

impl From<EndpointWithServiceRow> for EndpointWithService {
    fn from(row: EndpointWithServiceRow) -> Self {
        EndpointWithService {
            endpoint: Endpoint {
                id: row.id,
                token: row.token,
                service_id: row.service_id,
                variant: PlatformVariant::from(row.variant),
            },
            service_name: row.service_name,
            service_url: row.service_url,
        }
    }
}

/// Append-only record of registry mutations and dispatch summaries.
/// Corresponds to the `log` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub log_type: LogType,
    pub content: String,
    pub service_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntryWithService {
    #[serde(flatten)]
    pub entry: LogEntry,
    pub service: Option<Service>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub services_count: i64,
    pub tokens_count: i64,
}

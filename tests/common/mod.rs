use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use pushcast::db;
use pushcast::notifications::envelope::Envelope;
use pushcast::notifications::senders::{GatewayError, PushGateway};
use pushcast::notifications::service::NotificationService;
use pushcast::server::config::ServerConfig;
use pushcast::services::auth_service::issue_session_token;
use pushcast::web::create_axum_router;
use serde_json::Value;
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test-jwt-secret";

/// Accepts every token except the ones listed and records what it was asked to send.
#[derive(Default)]
pub struct RecordingGateway {
    pub rejected: HashSet<String>,
    pub sent: Mutex<Vec<String>>,
}

#[async_trait]
impl PushGateway for RecordingGateway {
    async fn send(&self, _envelope: &Envelope, token: &str) -> Result<String, GatewayError> {
        self.sent.lock().unwrap().push(token.to_string());
        if self.rejected.contains(token) {
            return Err(GatewayError::Rejected("UNREGISTERED".to_string()));
        }
        Ok(format!("projects/test/messages/{token}"))
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub gateway: Arc<RecordingGateway>,
}

pub async fn test_app(rejected: &[&str]) -> TestApp {
    let pool = db::connect_in_memory().await.expect("in-memory database");
    let gateway = Arc::new(RecordingGateway {
        rejected: rejected.iter().map(|t| t.to_string()).collect(),
        ..Default::default()
    });
    let config = ServerConfig {
        jwt_secret: JWT_SECRET.to_string(),
        database_url: "sqlite::memory:".to_string(),
        bind_address: "127.0.0.1".to_string(),
        http_port: 0,
        log_dir: "logs".to_string(),
        fcm_service_account: None,
        session_ttl_secs: 3600,
    };
    let service = Arc::new(NotificationService::new(pool.clone(), gateway.clone()));
    let router = create_axum_router(pool.clone(), service, Arc::new(config));
    TestApp {
        router,
        pool,
        gateway,
    }
}

pub fn session_token() -> String {
    issue_session_token("admin", JWT_SECRET, chrono::Duration::hours(1)).expect("session token")
}

pub fn json_request(method: &str, uri: &str, body: Value, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

pub fn empty_request(method: &str, uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

/// Sends the request and returns the status with the body parsed as JSON
/// (non-JSON bodies come back as a JSON string).
pub async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

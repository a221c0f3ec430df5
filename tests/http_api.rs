mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::{call, empty_request, json_request, session_token, test_app};
use pushcast::db::services;
use serde_json::json;

async fn create_service(app: &common::TestApp, name: &str) -> (i64, String) {
    let token = session_token();
    let (status, body) = call(
        &app.router,
        json_request(
            "POST",
            "/create-service",
            json!({ "name": name, "url": format!("https://{name}.example") }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    (
        body["id"].as_i64().unwrap(),
        body["secret"].as_str().unwrap().to_string(),
    )
}

async fn register(app: &common::TestApp, token: &str, service_id: i64, variant: &str) -> StatusCode {
    let (status, _) = call(
        &app.router,
        json_request(
            "POST",
            "/register-token",
            json!({ "token": token, "serviceId": service_id, "type": variant }),
            None,
        ),
    )
    .await;
    status
}

#[tokio::test]
async fn health_is_public() {
    let app = test_app(&[]).await;
    let (status, body) = call(&app.router, empty_request("GET", "/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("OK"));
}

#[tokio::test]
async fn register_token_validation_and_conflict() {
    let app = test_app(&[]).await;
    let (service_id, _) = create_service(&app, "shop").await;

    let (status, body) = call(
        &app.router,
        json_request("POST", "/register-token", json!({ "token": "t1" }), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Token, type and serviceId are required");

    assert_eq!(register(&app, "t1", service_id, "web").await, StatusCode::OK);

    let (status, body) = call(
        &app.router,
        json_request(
            "POST",
            "/tokens",
            json!({ "token": "t1", "serviceId": service_id.to_string(), "type": "android" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Token already registered");

    assert_eq!(register(&app, "t2", 999, "web").await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unregister_only_from_owning_service() {
    let app = test_app(&[]).await;
    let (first, _) = create_service(&app, "first").await;
    let (second, _) = create_service(&app, "second").await;
    assert_eq!(register(&app, "t1", first, "web").await, StatusCode::OK);

    let (status, body) = call(
        &app.router,
        json_request("DELETE", "/unregister-token", json!({ "token": "t1", "serviceId": second }), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Token not found for the service");

    let (status, _) = call(
        &app.router,
        json_request("POST", "/unregister-token", json!({ "token": "t1", "serviceId": first }), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(services::list_endpoints_by_service(&app.pool, first).await.unwrap().is_empty());
}

#[tokio::test]
async fn broadcast_rejections() {
    let app = test_app(&[]).await;
    let (service_id, secret) = create_service(&app, "news").await;
    assert_eq!(register(&app, "t1", service_id, "web").await, StatusCode::OK);

    let cases = [
        (json!({ "title": "Hi", "body": "There", "serviceId": service_id }), StatusCode::BAD_REQUEST),
        (
            json!({ "title": "Hi", "body": "There", "serviceId": 404, "secret": secret }),
            StatusCode::NOT_FOUND,
        ),
        (
            json!({ "title": "Hi", "body": "There", "serviceId": service_id, "secret": "wrong" }),
            StatusCode::FORBIDDEN,
        ),
    ];
    for (payload, expected) in cases {
        let (status, _) = call(&app.router, json_request("POST", "/broadcast", payload, None)).await;
        assert_eq!(status, expected);
    }
    assert!(app.gateway.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn broadcast_reports_aggregate_counts() {
    let app = test_app(&["t2"]).await;
    let (service_id, secret) = create_service(&app, "news").await;
    for (token, variant) in [("t1", "web"), ("t2", "android"), ("t3", "android")] {
        assert_eq!(register(&app, token, service_id, variant).await, StatusCode::OK);
    }

    let (status, body) = call(
        &app.router,
        json_request(
            "POST",
            "/broadcast",
            json!({ "title": "Hi", "body": "There", "serviceId": service_id, "secret": secret }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recipients"], 3);
    assert_eq!(body["succeeded"], 2);
    assert_eq!(body["failed"], 1);
    assert_eq!(app.gateway.sent.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn broadcast_to_service_without_endpoints() {
    let app = test_app(&[]).await;
    let (service_id, secret) = create_service(&app, "quiet").await;

    let (status, body) = call(
        &app.router,
        json_request(
            "POST",
            "/broadcast",
            json!({ "title": "Hi", "body": "There", "serviceId": service_id, "secret": secret }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recipients"], 0);
    assert_eq!(body["failed"], 0);
}

#[tokio::test]
async fn admin_routes_require_session() {
    let app = test_app(&[]).await;
    let payload = json!({ "name": "x", "url": "https://x.example" });

    let (status, body) = call(&app.router, json_request("POST", "/create-service", payload.clone(), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "No token provided");

    let (status, body) = call(
        &app.router,
        json_request("POST", "/create-service", payload, Some("not-a-jwt")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");

    let (status, _) = call(&app.router, empty_request("GET", "/tokens", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let app = test_app(&[]).await;
    let request = Request::builder()
        .method("GET")
        .uri("/dashboard")
        .header(header::COOKIE, format!("token={}", session_token()))
        .body(Body::empty())
        .unwrap();

    let (status, body) = call(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["servicesCount"], 0);
}

#[tokio::test]
async fn reset_secret_invalidates_previous_secret() {
    let app = test_app(&[]).await;
    let token = session_token();
    let (service_id, old_secret) = create_service(&app, "rotating").await;

    let (status, _) = call(&app.router, empty_request("POST", "/reset-secret/999", Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(
        &app.router,
        empty_request("POST", &format!("/reset-secret/{service_id}"), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let new_secret = body["secret"].as_str().unwrap().to_string();
    assert_ne!(new_secret, old_secret);

    let broadcast = |secret: String| {
        json_request(
            "POST",
            "/broadcast",
            json!({ "title": "Hi", "body": "There", "serviceId": service_id, "secret": secret }),
            None,
        )
    };
    let (status, _) = call(&app.router, broadcast(old_secret)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app.router, broadcast(new_secret)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn admin_token_and_service_management() {
    let app = test_app(&[]).await;
    let token = session_token();
    let (service_id, secret) = create_service(&app, "managed").await;
    assert_eq!(register(&app, "t1", service_id, "web").await, StatusCode::OK);
    assert_eq!(register(&app, "t2", service_id, "android").await, StatusCode::OK);

    let (status, body) = call(&app.router, empty_request("GET", "/tokens", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let tokens = body.as_array().unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0]["serviceName"], "managed");

    let (status, body) = call(
        &app.router,
        empty_request("GET", &format!("/services/{service_id}/tokens"), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tokens"].as_array().unwrap().len(), 2);
    let first_id = body["tokens"][0]["id"].as_i64().unwrap();

    let (status, _) = call(
        &app.router,
        empty_request("DELETE", &format!("/tokens/{first_id}"), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let test_send = |secret: Option<&str>| {
        let mut payload = json!({ "title": "Ping", "body": "Test", "serviceId": service_id });
        if let Some(secret) = secret {
            payload["secret"] = json!(secret);
        }
        json_request("POST", "/test-notification", payload, Some(&token))
    };
    let (status, body) = call(&app.router, test_send(None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Title, body, serviceId, and secret are required");
    let (status, _) = call(&app.router, test_send(Some("wrong"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = call(&app.router, test_send(Some(&secret))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["succeeded"], 1);

    let (status, _) = call(
        &app.router,
        empty_request("DELETE", &format!("/services/{service_id}"), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app.router, empty_request("GET", "/dashboard", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["servicesCount"], 0);
    assert_eq!(body["tokensCount"], 0);

    let (status, body) = call(&app.router, empty_request("GET", "/log", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries[0]["content"], format!("Service deleted (ID: {service_id})"));
    assert_eq!(entries[0]["type"], "warning");
}

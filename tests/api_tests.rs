use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use bingorr::config::Config;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Default API key seeded by migration (must match m20260301_initial.rs)
const DEFAULT_ADMIN_API_KEY: &str = "bingorr_default_api_key_please_regenerate";

async fn spawn_app() -> Router {
    let db_path =
        std::env::temp_dir().join(format!("bingorr-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let state = bingorr::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    bingorr::api::router(state).await
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    api_key: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = api_key {
        builder = builder.header("X-Api-Key", key);
    }

    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn signup(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/signup",
        None,
        Some(serde_json::json!({"username": username, "password": "correct-horse"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "signup failed: {body}");
    body["data"]["api_key"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_auth_required() {
    let app = spawn_app().await;

    let (status, _) = send(&app, "GET", "/api/cards/mine", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/cards/mine", Some("wrong-key"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Valid key but no card yet: authenticated, so 404 rather than 401
    let (status, _) = send(
        &app,
        "GET",
        "/api/cards/mine",
        Some(DEFAULT_ADMIN_API_KEY),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_signup_and_login_flow() {
    let app = spawn_app().await;

    let api_key = signup(&app, "alice").await;

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&api_key), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["is_superuser"], false);

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({"username": "alice", "password": "correct-horse"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["api_key"].as_str().unwrap(), api_key);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({"username": "alice", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_validation() {
    let app = spawn_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(serde_json::json!({"username": "bob", "password": "short"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(serde_json::json!({"username": "not a name", "password": "correct-horse"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    signup(&app, "carol").await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(serde_json::json!({"username": "carol", "password": "correct-horse"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_api_key_regeneration() {
    let app = spawn_app().await;

    let old_key = signup(&app, "mallory").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/api-key/regenerate",
        Some(&old_key),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let new_key = body["data"]["api_key"].as_str().unwrap().to_string();
    assert_ne!(new_key, old_key);

    // Old key stops working, new key is live
    let (status, _) = send(&app, "GET", "/api/auth/me", Some(&old_key), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&new_key), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "mallory");
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "ok");
}

#[tokio::test]
async fn test_admin_routes_require_superuser() {
    let app = spawn_app().await;

    let (status, _) = send(&app, "GET", "/api/admin/settings", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let player_key = signup(&app, "dave").await;
    let (status, _) = send(&app, "GET", "/api/admin/settings", Some(&player_key), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "GET",
        "/api/admin/settings",
        Some(DEFAULT_ADMIN_API_KEY),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["board_size"], 5);
    assert_eq!(body["data"]["allowed_sizes"], serde_json::json!([5, 7, 9]));
}

#[tokio::test]
async fn test_leaderboard_is_public() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/leaderboard", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], serde_json::json!([]));
}

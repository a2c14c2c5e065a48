//! End-to-end tests for card creation, marking and the leaderboard.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use bingorr::config::Config;
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let db_path =
        std::env::temp_dir().join(format!("bingorr-card-test-{}.db", uuid::Uuid::new_v4()));

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

fn full_entries(side: i64) -> serde_json::Value {
    let center = side / 2;
    let mut cells = Vec::new();
    for row in 0..side {
        for col in 0..side {
            if !(row == center && col == center) {
                cells.push(serde_json::json!({
                    "row": row,
                    "col": col,
                    "text": format!("goal {row}-{col}"),
                }));
            }
        }
    }
    serde_json::json!({ "cells": cells })
}

async fn create_card(app: &Router, api_key: &str, side: i64) {
    let (status, body) = send(app, "POST", "/api/cards", Some(api_key), Some(full_entries(side))).await;
    assert_eq!(status, StatusCode::OK, "card creation failed: {body}");
}

/// Non-free cell ids from a grid JSON, row-major order.
fn non_free_cell_ids(grid: &serde_json::Value) -> Vec<i64> {
    grid.as_array()
        .unwrap()
        .iter()
        .flat_map(|row| row.as_array().unwrap())
        .filter(|cell| !cell["is_free"].as_bool().unwrap())
        .map(|cell| cell["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_create_card_builds_a_complete_grid() {
    let app = spawn_app().await;
    let key = signup(&app, "alice").await;

    create_card(&app, &key, 5).await;

    let (status, body) = send(&app, "GET", "/api/cards/mine", Some(&key), None).await;
    assert_eq!(status, StatusCode::OK);

    let card = &body["data"]["card"];
    assert_eq!(card["username"], "alice");
    assert_eq!(card["board_size"], 5);
    assert_eq!(card["marked_count"], 0);

    let grid = body["data"]["grid"].as_array().unwrap();
    assert_eq!(grid.len(), 5);
    for (r, row) in grid.iter().enumerate() {
        let row = row.as_array().unwrap();
        assert_eq!(row.len(), 5);
        for (c, cell) in row.iter().enumerate() {
            let is_center = r == 2 && c == 2;
            assert_eq!(cell["is_free"].as_bool().unwrap(), is_center);
            assert_eq!(cell["is_marked"].as_bool().unwrap(), is_center);
            if is_center {
                assert_eq!(cell["text"], "FREE");
            }
        }
    }
}

#[tokio::test]
async fn test_create_card_validates_the_whole_entry_set() {
    let app = spawn_app().await;
    let key = signup(&app, "bob").await;

    // One position missing
    let mut payload = full_entries(5);
    payload["cells"].as_array_mut().unwrap().remove(0);
    let (status, body) = send(&app, "POST", "/api/cards", Some(&key), Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("missing text for (0, 0)")
    );

    // Oversized text
    let mut payload = full_entries(5);
    payload["cells"][0]["text"] = serde_json::json!("x".repeat(101));
    let (status, _) = send(&app, "POST", "/api/cards", Some(&key), Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was persisted along the way
    let (status, _) = send(&app, "GET", "/api/cards/mine", Some(&key), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_second_card_is_a_conflict() {
    let app = spawn_app().await;
    let key = signup(&app, "carol").await;

    create_card(&app, &key, 5).await;

    let (_, before) = send(&app, "GET", "/api/cards/mine", Some(&key), None).await;
    let card_id = before["data"]["card"]["id"].as_i64().unwrap();

    let (status, _) = send(&app, "POST", "/api/cards", Some(&key), Some(full_entries(5))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The existing card is untouched
    let (_, after) = send(&app, "GET", "/api/cards/mine", Some(&key), None).await;
    assert_eq!(after["data"]["card"]["id"].as_i64().unwrap(), card_id);
}

#[tokio::test]
async fn test_marking_is_idempotent_and_monotonic() {
    let app = spawn_app().await;
    let key = signup(&app, "dave").await;
    create_card(&app, &key, 5).await;

    let (_, body) = send(&app, "GET", "/api/cards/mine", Some(&key), None).await;
    let ids = non_free_cell_ids(&body["data"]["grid"]);
    let target = ids[0];

    let uri = format!("/api/cards/cells/{target}/mark");
    let (status, body) = send(&app, "POST", &uri, Some(&key), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_marked"], true);

    // Second mark of the same cell: same state, not an error
    let (status, body) = send(&app, "POST", &uri, Some(&key), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_marked"], true);

    let (_, body) = send(&app, "GET", "/api/cards/mine", Some(&key), None).await;
    assert_eq!(body["data"]["card"]["marked_count"], 1);

    // Marking more cells only ever grows the count
    for (expected, id) in ids.iter().skip(1).take(3).enumerate() {
        let uri = format!("/api/cards/cells/{id}/mark");
        let (status, _) = send(&app, "POST", &uri, Some(&key), None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, "GET", "/api/cards/mine", Some(&key), None).await;
        assert_eq!(
            body["data"]["card"]["marked_count"].as_i64().unwrap(),
            expected as i64 + 2
        );
    }
}

#[tokio::test]
async fn test_marking_the_free_cell_is_a_noop() {
    let app = spawn_app().await;
    let key = signup(&app, "erin").await;
    create_card(&app, &key, 5).await;

    let (_, body) = send(&app, "GET", "/api/cards/mine", Some(&key), None).await;
    let free_id = body["data"]["grid"][2][2]["id"].as_i64().unwrap();

    let uri = format!("/api/cards/cells/{free_id}/mark");
    let (status, body) = send(&app, "POST", &uri, Some(&key), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_free"], true);
    assert_eq!(body["data"]["is_marked"], true);

    // The free cell never counts towards the score
    let (_, body) = send(&app, "GET", "/api/cards/mine", Some(&key), None).await;
    assert_eq!(body["data"]["card"]["marked_count"], 0);
}

#[tokio::test]
async fn test_foreign_and_unknown_cells_are_not_accessible() {
    let app = spawn_app().await;
    let owner_key = signup(&app, "frank").await;
    let other_key = signup(&app, "grace").await;
    create_card(&app, &owner_key, 5).await;

    let (_, body) = send(&app, "GET", "/api/cards/mine", Some(&owner_key), None).await;
    let target = non_free_cell_ids(&body["data"]["grid"])[0];

    let uri = format!("/api/cards/cells/{target}/mark");
    let (status, _) = send(&app, "POST", &uri, Some(&other_key), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/api/cards/cells/999999/mark", Some(&owner_key), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The owner's cell is still unmarked
    let (_, body) = send(&app, "GET", "/api/cards/mine", Some(&owner_key), None).await;
    assert_eq!(body["data"]["card"]["marked_count"], 0);
}

#[tokio::test]
async fn test_public_card_view() {
    let app = spawn_app().await;
    let key = signup(&app, "heidi").await;
    create_card(&app, &key, 5).await;

    // No authentication needed to look at someone's card
    let (status, body) = send(&app, "GET", "/api/cards/heidi", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["card"]["username"], "heidi");
    assert_eq!(body["data"]["grid"].as_array().unwrap().len(), 5);

    let (status, _) = send(&app, "GET", "/api/cards/nobody", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_leaderboard_orders_by_count_then_username() {
    let app = spawn_app().await;

    // filled counts: a=5, b=3, c=5, d=0 -> expect a, c, b, d
    let marks = [("a", 5), ("b", 3), ("c", 5), ("d", 0)];
    for (username, count) in marks {
        let key = signup(&app, username).await;
        create_card(&app, &key, 5).await;

        let (_, body) = send(&app, "GET", "/api/cards/mine", Some(&key), None).await;
        let ids = non_free_cell_ids(&body["data"]["grid"]);
        for id in ids.iter().take(count) {
            let uri = format!("/api/cards/cells/{id}/mark");
            let (status, _) = send(&app, "POST", &uri, Some(&key), None).await;
            assert_eq!(status, StatusCode::OK);
        }
    }

    let (status, body) = send(&app, "GET", "/api/leaderboard", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let order: Vec<(String, i64)> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            (
                e["username"].as_str().unwrap().to_string(),
                e["filled_count"].as_i64().unwrap(),
            )
        })
        .collect();

    assert_eq!(
        order,
        vec![
            ("a".to_string(), 5),
            ("c".to_string(), 5),
            ("b".to_string(), 3),
            ("d".to_string(), 0),
        ]
    );
}

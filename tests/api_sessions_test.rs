//! Tests for session creation, lookup, settings and removal.

mod common;

use axum::http::StatusCode;
use common::{fixtures, TestApp};
use pixgrid::models::AppConfig;
use pixgrid::services::SessionStore;
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_create_session_with_defaults() {
    let app = TestApp::with_config(fixtures::nearest_config());

    let response = app
        .post_bytes("/api/sessions", fixtures::quadrants_png(64))
        .await;
    common::assert_status(&response, StatusCode::CREATED);

    let json: serde_json::Value = response.json();
    assert_eq!(json["id"].as_str().unwrap().len(), 16);
    assert_eq!(json["width"], 32);
    assert_eq!(json["height"], 32);
    assert_eq!(json["colors"], 8);
    assert_eq!(json["mode"], "custom");
    assert_eq!(json["outline"], true);
    assert_eq!(json["dither"], "floyd-steinberg");
    assert_eq!(json["output_width"], 32 * 20 + 40);
    assert_eq!(json["bounds"]["colors_max"], 64);

    assert_eq!(app.sessions.len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_session_derives_palette() {
    let app = TestApp::with_config(fixtures::nearest_config());

    let response = app
        .post_bytes(
            "/api/sessions?width=8&height=8&colors=6",
            fixtures::quadrants_png(40),
        )
        .await;
    common::assert_status(&response, StatusCode::CREATED);

    let white = fixtures::hex(fixtures::WHITE);
    assert_eq!(
        common::palette_of(&response),
        vec![
            fixtures::hex(fixtures::RED),
            fixtures::hex(fixtures::GREEN),
            fixtures::hex(fixtures::BLUE),
            white.clone(),
            white.clone(),
            white,
        ]
    );
}

#[tokio::test]
async fn test_create_session_accepts_jpeg() {
    let app = TestApp::new();
    let jpeg = fixtures::encode(&fixtures::gradient(48, 48), image::ImageFormat::Jpeg);

    let response = app
        .post_bytes("/api/sessions?width=16&height=12&colors=4", jpeg)
        .await;
    common::assert_status(&response, StatusCode::CREATED);
    assert_eq!(common::palette_of(&response).len(), 4);
}

#[tokio::test]
async fn test_create_session_rejects_undecodable_upload() {
    let app = TestApp::new();

    let response = app
        .post_bytes("/api/sessions", b"this is not an image".to_vec())
        .await;
    common::assert_json_error(&response, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = response.json();
    assert!(json["error"].as_str().unwrap().starts_with("Invalid image"));

    assert_eq!(app.sessions.len().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_session_rejects_empty_upload() {
    let app = TestApp::new();
    let response = app.post_bytes("/api/sessions", Vec::new()).await;
    common::assert_json_error(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_session_rejects_oversized_upload() {
    let app = TestApp::with_config(AppConfig {
        max_upload_bytes: 1024,
        optimize_png: false,
        ..AppConfig::default()
    });

    let response = app.post_bytes("/api/sessions", vec![0u8; 4096]).await;
    common::assert_json_error(&response, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_create_session_validates_editor_bounds() {
    let app = TestApp::new();

    let response = app
        .post_bytes("/api/sessions?width=200", fixtures::quadrants_png(40))
        .await;
    common::assert_json_error(&response, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = response.json();
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("width must be between 8 and 120"));

    for query in ["width=7", "height=121", "colors=1", "colors=65", "width=0"] {
        let response = app
            .post_bytes(&format!("/api/sessions?{query}"), fixtures::quadrants_png(40))
            .await;
        common::assert_json_error(&response, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_create_session_validates_auto_bounds() {
    let app = TestApp::new();

    // fine for the editor, too small for auto mode
    for query in ["mode=auto&colors=2", "mode=auto&width=8"] {
        let response = app
            .post_bytes(&format!("/api/sessions?{query}"), fixtures::quadrants_png(40))
            .await;
        common::assert_json_error(&response, StatusCode::BAD_REQUEST);
    }

    let response = app
        .post_bytes(
            "/api/sessions?mode=auto&colors=200&width=16&height=16",
            fixtures::quadrants_png(40),
        )
        .await;
    common::assert_status(&response, StatusCode::CREATED);
    let json: serde_json::Value = response.json();
    assert_eq!(json["mode"], "auto");
    assert_eq!(json["dither"], "none");
}

#[tokio::test]
async fn test_create_session_rejects_unknown_mode() {
    let app = TestApp::new();
    let response = app
        .post_bytes("/api/sessions?mode=fancy", fixtures::quadrants_png(40))
        .await;
    common::assert_json_error(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_session() {
    let app = TestApp::new();
    let id = app
        .create_session("width=10&height=12&colors=3", fixtures::quadrants_png(40))
        .await;

    let response = app.get(&format!("/api/sessions/{id}")).await;
    common::assert_ok(&response);
    let json: serde_json::Value = response.json();
    assert_eq!(json["id"], id.as_str());
    assert_eq!(json["width"], 10);
    assert_eq!(json["height"], 12);
    assert_eq!(json["output_height"], 12 * 20 + 40);
    assert_eq!(common::palette_of(&response).len(), 3);
}

#[tokio::test]
async fn test_get_unknown_session() {
    let app = TestApp::new();
    let response = app.get("/api/sessions/0123456789ABCDEF").await;
    common::assert_json_error(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_settings() {
    let app = TestApp::new();
    let id = app.create_session("", fixtures::quadrants_png(40)).await;

    let response = app
        .put_json(
            &format!("/api/sessions/{id}/settings"),
            &json!({"width": 16, "outline": false, "dither": "atkinson", "resample": "nearest"}),
        )
        .await;
    common::assert_ok(&response);

    let json: serde_json::Value = response.json();
    assert_eq!(json["width"], 16);
    assert_eq!(json["height"], 32);
    assert_eq!(json["outline"], false);
    assert_eq!(json["dither"], "atkinson");
    assert_eq!(json["resample"], "nearest");
    assert_eq!(json["output_width"], 16 * 20 + 40);

    // persisted
    let json: serde_json::Value = app.get(&format!("/api/sessions/{id}")).await.json();
    assert_eq!(json["width"], 16);
}

#[tokio::test]
async fn test_update_settings_switches_mode() {
    let app = TestApp::new();
    let id = app.create_session("", fixtures::quadrants_png(40)).await;

    let response = app
        .put_json(&format!("/api/sessions/{id}/settings"), &json!({"mode": "auto"}))
        .await;
    common::assert_ok(&response);
    let json: serde_json::Value = response.json();
    assert_eq!(json["mode"], "auto");
    assert_eq!(json["dither"], "none");
    assert_eq!(json["bounds"]["grid_min"], 16);
}

#[tokio::test]
async fn test_update_settings_rejects_invalid_values() {
    let app = TestApp::new();
    let id = app.create_session("", fixtures::quadrants_png(40)).await;
    let path = format!("/api/sessions/{id}/settings");

    let response = app.put_json(&path, &json!({"colors": 100})).await;
    common::assert_json_error(&response, StatusCode::BAD_REQUEST);

    let response = app.put_json(&path, &json!({"resample": "bicubic"})).await;
    common::assert_json_error(&response, StatusCode::BAD_REQUEST);

    // rejected updates leave the session untouched
    let json: serde_json::Value = app.get(&format!("/api/sessions/{id}")).await.json();
    assert_eq!(json["colors"], 8);
    assert_eq!(json["resample"], "lanczos");
}

#[tokio::test]
async fn test_update_settings_unknown_session() {
    let app = TestApp::new();
    let response = app
        .put_json("/api/sessions/MISSING/settings", &json!({"width": 10}))
        .await;
    common::assert_json_error(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_session() {
    let app = TestApp::new();
    let id = app.create_session("", fixtures::quadrants_png(40)).await;

    let response = app.delete(&format!("/api/sessions/{id}")).await;
    common::assert_status(&response, StatusCode::NO_CONTENT);
    assert_eq!(app.sessions.len().await.unwrap(), 0);

    let response = app.delete(&format!("/api/sessions/{id}")).await;
    common::assert_json_error(&response, StatusCode::NOT_FOUND);

    let response = app.get(&format!("/api/sessions/{id}")).await;
    common::assert_json_error(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.get("/health").await;
    common::assert_ok(&response);
    assert_eq!(response.text(), "OK");
}

#[tokio::test]
async fn test_image_over_dimension_limit_is_rejected() {
    let app = TestApp::with_config(AppConfig {
        max_image_dimension: 32,
        optimize_png: false,
        ..AppConfig::default()
    });

    let response = app
        .post_bytes("/api/sessions", fixtures::quadrants_png(40))
        .await;
    common::assert_json_error(&response, StatusCode::BAD_REQUEST);
    assert!(app.sessions.is_empty().await.unwrap());

    app.create_session("", fixtures::quadrants_png(32)).await;
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::new();
    let response = app.get("/api/nothing-here").await;
    common::assert_json_error(&response, StatusCode::NOT_FOUND);
}

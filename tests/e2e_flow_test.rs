//! Full user flow: upload, edit, download, reset, download again.

mod common;

use axum::http::StatusCode;
use common::{fixtures, TestApp};
use pixgrid::services::SessionStore;
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_full_editing_flow() {
    let app = TestApp::with_config(fixtures::nearest_config());

    // upload
    let response = app
        .post_bytes(
            "/api/sessions?width=8&height=8&colors=5",
            fixtures::quadrants_png(80),
        )
        .await;
    common::assert_status(&response, StatusCode::CREATED);
    let json: serde_json::Value = response.json();
    let id = json["id"].as_str().unwrap().to_string();
    let derived = common::palette_of(&response);
    assert_eq!(derived.len(), 5);
    assert_eq!(derived[4], fixtures::hex(fixtures::WHITE));

    let original_png = app.get(&format!("/api/sessions/{id}/image.png")).await;
    common::assert_png(&original_png);

    // recolor green and blue
    for (index, color) in [(1, "#008000"), (2, "#000080")] {
        let response = app
            .put_json(
                &format!("/api/sessions/{id}/palette/{index}"),
                &json!({"color": color}),
            )
            .await;
        common::assert_ok(&response);
    }

    let edited = app.get(&format!("/api/sessions/{id}/image.png")).await;
    common::assert_png(&edited);
    assert_ne!(edited.bytes(), original_png.bytes());
    let image = fixtures::decode_png(edited.bytes());
    assert_eq!(image.get_pixel(40, 40).0, fixtures::RED);
    assert_eq!(image.get_pixel(120, 40).0, [0, 128, 0]);
    assert_eq!(image.get_pixel(40, 120).0, [0, 0, 128]);

    // reset and download again
    let response = app.delete(&format!("/api/sessions/{id}/palette")).await;
    common::assert_ok(&response);
    assert_eq!(common::palette_of(&response), derived);

    let restored = app.get(&format!("/api/sessions/{id}/image.png")).await;
    assert_eq!(restored.bytes(), original_png.bytes());

    // done
    let response = app.delete(&format!("/api/sessions/{id}")).await;
    common::assert_status(&response, StatusCode::NO_CONTENT);
    assert!(app.sessions.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_auto_mode_flow() {
    let app = TestApp::new();

    let id = app
        .create_session(
            "width=20&height=16&colors=12&mode=auto",
            fixtures::gradient_png(100, 80),
        )
        .await;

    let response = app.get(&format!("/api/sessions/{id}/image.png")).await;
    common::assert_png(&response);
    let image = fixtures::decode_png(response.bytes());
    assert_eq!(image.dimensions(), (20 * 20 + 40, 16 * 20 + 40));

    // switching to the editor keeps the session usable
    let response = app
        .put_json(
            &format!("/api/sessions/{id}/settings"),
            &json!({"mode": "custom", "colors": 8}),
        )
        .await;
    common::assert_ok(&response);
    assert_eq!(common::palette_of(&response).len(), 8);
}

//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use pixgrid::models::AppConfig;
use pixgrid::rendering::LabelFont;
use pixgrid::server::{build_router, create_app_state_with_font, AppState};
use pixgrid::services::InMemorySessionStore;

/// Test application with router and direct access to services
pub struct TestApp {
    router: axum::Router,
    pub sessions: Arc<InMemorySessionStore>,
    pub config: Arc<AppConfig>,
}

impl TestApp {
    /// Create a test application with default config.
    ///
    /// Uses the bitmap label font so output does not depend on installed
    /// fonts, and skips oxipng to keep tests fast.
    pub fn new() -> Self {
        Self::with_config(AppConfig {
            optimize_png: false,
            ..AppConfig::default()
        })
    }

    pub fn with_config(config: AppConfig) -> Self {
        let state = Self::create_state(config);

        // Keep references for test assertions
        let sessions = state.sessions.clone();
        let config = state.config.clone();

        // Build router using shared server module (same as production)
        let router = build_router(state);

        Self {
            router,
            sessions,
            config,
        }
    }

    /// Create state for custom router configuration
    pub fn create_state(config: AppConfig) -> AppState {
        create_app_state_with_font(config, LabelFont::bitmap())
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request with a raw body
    pub async fn post_bytes(&self, path: &str, body: Vec<u8>) -> TestResponse {
        let request = Request::post(path)
            .header("Content-Type", "application/octet-stream")
            .body(Body::from(body))
            .unwrap();
        self.request(request).await
    }

    /// Make a PUT request with JSON body
    pub async fn put_json(&self, path: &str, body: &serde_json::Value) -> TestResponse {
        let request = Request::put(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request(Request::delete(path).body(Body::empty()).unwrap())
            .await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Upload an image and return the new session id
    pub async fn create_session(&self, query: &str, image: Vec<u8>) -> String {
        let response = self
            .post_bytes(&format!("/api/sessions?{query}"), image)
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "create failed: {}",
            response.text()
        );
        let json: serde_json::Value = response.json();
        json["id"].as_str().unwrap().to_string()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get raw body bytes
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }

    /// Header value as string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

//! Common test utilities for in-process API testing.
//!
//! This module provides a test fixture that builds the router around either
//! the mock codec or the real one, plus a small multipart body builder.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use pixshift_core::{testing::MockCodec, Config, ImageCodec, RustCodec};

/// Re-export fixtures for test convenience
pub use pixshift_core::testing::fixtures;

/// Boundary used by [`MultipartBody`].
pub const BOUNDARY: &str = "pixshift-test-boundary";

/// Test fixture wrapping an in-process router.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_upload() {
///     let fixture = TestFixture::new();
///     let body = MultipartBody::new()
///         .file("a.png", "image/png", &fixtures::sample_png(4, 4))
///         .text("targetFormat", "webp");
///     let response = fixture.upload(body).await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock codec, when the fixture was built with one
    pub codec: Option<Arc<MockCodec>>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestFixture {
    /// Fixture backed by [`MockCodec`] with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Fixture backed by [`MockCodec`] with custom configuration.
    pub fn with_config(config: Config) -> Self {
        let codec = Arc::new(MockCodec::new());
        let router = build_router(config, Arc::clone(&codec) as Arc<dyn ImageCodec>);
        Self {
            router,
            codec: Some(codec),
        }
    }

    /// Fixture backed by the real image codec.
    pub fn with_real_codec() -> Self {
        let config = Config::default();
        let codec: Arc<dyn ImageCodec> = Arc::new(RustCodec::new(config.codec.clone()));
        Self {
            router: build_router(config, codec),
            codec: None,
        }
    }

    pub fn mock(&self) -> &MockCodec {
        self.codec.as_deref().expect("fixture was built with the real codec")
    }

    /// POST a multipart body to the default upload route.
    pub async fn upload(&self, body: MultipartBody) -> TestResponse {
        self.post_multipart("/api/upload", body).await
    }

    pub async fn post_multipart(&self, path: &str, body: MultipartBody) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", MultipartBody::content_type())
            .body(Body::from(body.finish()))
            .unwrap();
        self.send(request).await
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Send a request with raw string body and custom content type.
    pub async fn request_raw(
        &self,
        method: &str,
        path: &str,
        body: &str,
        content_type: &str,
    ) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", content_type)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send an arbitrary request to the test server.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

fn build_router(config: Config, codec: Arc<dyn ImageCodec>) -> Router {
    let state = pixshift_server::build_state(config, codec);
    pixshift_server::api::create_router(state).expect("Failed to build router")
}

/// Builder for `multipart/form-data` request bodies.
#[derive(Debug, Default)]
pub struct MultipartBody {
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content_type() -> String {
        format!("multipart/form-data; boundary={}", BOUNDARY)
    }

    /// Adds a `files` part.
    pub fn file(self, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.part(
            &format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{}\"\r\nContent-Type: {}",
                file_name, content_type
            ),
            data,
        )
    }

    /// Adds a `files` part with no Content-Type header.
    pub fn file_without_type(self, file_name: &str, data: &[u8]) -> Self {
        self.part(
            &format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{}\"",
                file_name
            ),
            data,
        )
    }

    /// Adds a plain text field.
    pub fn text(self, name: &str, value: &str) -> Self {
        self.part(
            &format!("Content-Disposition: form-data; name=\"{}\"", name),
            value.as_bytes(),
        )
    }

    fn part(mut self, headers: &str, data: &[u8]) -> Self {
        self.buf
            .extend_from_slice(format!("--{}\r\n{}\r\n\r\n", BOUNDARY, headers).as_bytes());
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.buf
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        self.buf
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

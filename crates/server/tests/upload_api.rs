//! In-process tests of the upload API using the mock codec.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::{engine::general_purpose::STANDARD as Base64, Engine as _};

use common::{MultipartBody, TestFixture};
use pixshift_core::{CodecError, Config, SupportedFormat};

const ORIGIN: &str = "http://localhost:5173";

#[tokio::test]
async fn test_upload_without_files_is_rejected() {
    let fixture = TestFixture::new();

    let response = fixture
        .upload(MultipartBody::new().text("targetFormat", "webp"))
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "No files uploaded");
    assert_eq!(fixture.mock().encode_count().await, 0);
}

#[tokio::test]
async fn test_unknown_target_format_is_rejected() {
    let fixture = TestFixture::new();

    let response = fixture
        .upload(
            MultipartBody::new()
                .file("a.png", "image/png", b"first")
                .text("targetFormat", "bmp"),
        )
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Unsupported format: bmp");
    assert_eq!(fixture.mock().encode_count().await, 0);
}

#[tokio::test]
async fn test_missing_target_format_is_rejected() {
    let fixture = TestFixture::new();

    let response = fixture
        .upload(MultipartBody::new().file("a.png", "image/png", b"first"))
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .starts_with("Unsupported format"));
}

#[tokio::test]
async fn test_missing_files_reported_before_bad_format() {
    let fixture = TestFixture::new();

    let response = fixture
        .upload(MultipartBody::new().text("targetFormat", "bmp"))
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "No files uploaded");
}

#[tokio::test]
async fn test_successful_batch_shape() {
    let fixture = TestFixture::new();

    let response = fixture
        .upload(
            MultipartBody::new()
                .file("holiday.photo.png", "image/png", b"first-file")
                .file("scan.jpeg", "image/jpeg", b"second")
                .text("targetFormat", "webp"),
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["message"], "Files converted successfully");

    let files = response.body["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);

    let first = &files[0];
    assert_eq!(first["name"], "holiday.webp");
    assert_eq!(first["originalName"], "holiday.photo.png");
    assert_eq!(first["type"], "image/webp");

    let data = Base64.decode(first["data"].as_str().unwrap()).unwrap();
    assert_eq!(data, b"MOCK:webp:640:480:q80");
    assert_eq!(first["size"], data.len());

    let metadata = &first["metadata"];
    assert_eq!(metadata["original"]["format"], "png");
    assert_eq!(metadata["original"]["width"], 640);
    assert_eq!(metadata["original"]["height"], 480);
    assert_eq!(metadata["original"]["size"], b"first-file".len());
    assert_eq!(metadata["converted"]["format"], "webp");
    assert_eq!(metadata["converted"]["width"], 640);
    assert_eq!(metadata["converted"]["size"], data.len());

    assert_eq!(files[1]["name"], "scan.webp");
    assert_eq!(files[1]["originalName"], "scan.jpeg");
}

#[tokio::test]
async fn test_jpg_and_jpeg_share_mime_type() {
    let fixture = TestFixture::new();

    for (target, extension) in [("jpg", "jpg"), ("jpeg", "jpeg")] {
        let response = fixture
            .upload(
                MultipartBody::new()
                    .file("a.png", "image/png", b"input")
                    .text("targetFormat", target),
            )
            .await;

        assert_status!(response, StatusCode::OK);
        let file = &response.body["files"][0];
        assert_eq!(file["type"], "image/jpeg");
        assert_eq!(file["name"], format!("a.{}", extension));
        assert_eq!(file["metadata"]["converted"]["format"], "jpeg");
    }
}

#[tokio::test]
async fn test_quality_and_lossless_forwarded_to_codec() {
    let fixture = TestFixture::new();

    let response = fixture
        .upload(
            MultipartBody::new()
                .file("a.png", "image/png", b"input")
                .text("targetFormat", "avif")
                .text("quality", "55")
                .text("lossless", "true"),
        )
        .await;
    assert_status!(response, StatusCode::OK);

    let encodes = fixture.mock().recorded_encodes().await;
    assert_eq!(encodes.len(), 1);
    assert_eq!(encodes[0].format, SupportedFormat::Avif);
    assert_eq!(encodes[0].options.quality, 55);
    assert!(encodes[0].options.lossless);
}

#[tokio::test]
async fn test_quality_form_values_are_normalized() {
    let fixture = TestFixture::new();

    for (raw, expected) in [("abc", 80), ("0", 80), ("500", 100), ("42px", 42)] {
        let response = fixture
            .upload(
                MultipartBody::new()
                    .file("a.png", "image/png", b"input")
                    .text("targetFormat", "jpg")
                    .text("quality", raw)
                    .text("lossless", "yes"),
            )
            .await;
        assert_status!(response, StatusCode::OK);

        let encodes = fixture.mock().recorded_encodes().await;
        let last = encodes.last().unwrap();
        assert_eq!(last.options.quality, expected, "quality {:?}", raw);
        assert!(!last.options.lossless);
    }
}

#[tokio::test]
async fn test_unknown_fields_are_ignored() {
    let fixture = TestFixture::new();

    let response = fixture
        .upload(
            MultipartBody::new()
                .text("comment", "hello")
                .file("a.png", "image/png", b"input")
                .text("targetFormat", "png"),
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["files"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_file_type_fails_whole_batch() {
    let fixture = TestFixture::new();

    let response = fixture
        .upload(
            MultipartBody::new()
                .file("a.png", "image/png", b"first")
                .file("notes.txt", "text/plain", b"hello")
                .file("c.png", "image/png", b"third")
                .text("targetFormat", "webp"),
        )
        .await;

    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "Error processing files");
    assert_eq!(
        response.body["details"],
        "notes.txt: Invalid file type: text/plain"
    );
    assert!(response.body.get("files").is_none());
}

#[tokio::test]
async fn test_part_without_content_type_is_rejected() {
    let fixture = TestFixture::new();

    let response = fixture
        .upload(
            MultipartBody::new()
                .file_without_type("a.png", b"first")
                .text("targetFormat", "webp"),
        )
        .await;

    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.body["details"],
        "a.png: Invalid file type: application/octet-stream"
    );
}

#[tokio::test]
async fn test_gif_input_rejected_by_default() {
    let fixture = TestFixture::new();

    let response = fixture
        .upload(
            MultipartBody::new()
                .file("anim.gif", "image/gif", b"gif")
                .text("targetFormat", "png"),
        )
        .await;

    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(fixture.mock().encode_count().await, 0);
}

#[tokio::test]
async fn test_accepted_input_types_can_be_configured() {
    let mut config = Config::default();
    config.conversion.accepted_input_types =
        Some(vec!["image/png".to_string(), "image/gif".to_string()]);
    let fixture = TestFixture::with_config(config);

    let response = fixture
        .upload(
            MultipartBody::new()
                .file("anim.gif", "image/GIF", b"gif")
                .text("targetFormat", "png"),
        )
        .await;
    assert_status!(response, StatusCode::OK);

    let response = fixture
        .upload(
            MultipartBody::new()
                .file("a.webp", "image/webp", b"webp")
                .text("targetFormat", "png"),
        )
        .await;
    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_encode_failure_discards_other_results() {
    let fixture = TestFixture::new();
    fixture
        .mock()
        .fail_encode_on(
            b"broken",
            CodecError::encode_failed(SupportedFormat::WebP, "encoder exploded"),
        )
        .await;

    let response = fixture
        .upload(
            MultipartBody::new()
                .file("good.png", "image/png", b"fine")
                .file("bad.png", "image/png", b"broken")
                .text("targetFormat", "webp"),
        )
        .await;

    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    let details = response.body["details"].as_str().unwrap();
    assert!(details.starts_with("bad.png: "), "details: {}", details);
    assert!(details.contains("encoder exploded"));
    assert!(response.body.get("files").is_none());
}

#[tokio::test]
async fn test_undecodable_input_fails_batch() {
    let fixture = TestFixture::new();
    fixture
        .mock()
        .fail_inspect_on(b"garbage", CodecError::UnrecognizedFormat)
        .await;

    let response = fixture
        .upload(
            MultipartBody::new()
                .file("weird.png", "image/png", b"garbage")
                .text("targetFormat", "jpg"),
        )
        .await;

    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(fixture.mock().encode_count().await, 0);
}

#[tokio::test]
async fn test_non_multipart_body_is_bad_request() {
    let fixture = TestFixture::new();

    let response = fixture
        .request_raw("POST", "/api/upload", "{}", "application/json")
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn test_oversized_body_is_client_error() {
    let mut config = Config::default();
    config.server.max_upload_bytes = 1024;
    let fixture = TestFixture::with_config(config);

    let response = fixture
        .upload(
            MultipartBody::new()
                .file("big.png", "image/png", &vec![0u8; 8 * 1024])
                .text("targetFormat", "webp"),
        )
        .await;

    assert!(
        response.status.is_client_error(),
        "unexpected status {}",
        response.status
    );
    assert_eq!(fixture.mock().encode_count().await, 0);
}

#[tokio::test]
async fn test_custom_base_path() {
    let mut config = Config::default();
    config.server.base_path = "/v2".to_string();
    let fixture = TestFixture::with_config(config);

    let body = || {
        MultipartBody::new()
            .file("a.png", "image/png", b"input")
            .text("targetFormat", "png")
    };

    let response = fixture.post_multipart("/v2/upload", body()).await;
    assert_status!(response, StatusCode::OK);

    let response = fixture.post_multipart("/api/upload", body()).await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight() {
    let fixture = TestFixture::new();

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/upload")
        .header("Origin", ORIGIN)
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let response = fixture.send(request).await;

    assert_status!(response, StatusCode::OK);
    let headers = &response.headers;
    assert_eq!(headers["access-control-allow-origin"], ORIGIN);
    assert_eq!(headers["access-control-allow-credentials"], "true");
    assert_eq!(headers["access-control-max-age"], "600");
    assert!(headers["access-control-allow-methods"]
        .to_str()
        .unwrap()
        .contains("POST"));
    assert!(headers["access-control-allow-headers"]
        .to_str()
        .unwrap()
        .to_ascii_lowercase()
        .contains("content-type"));
}

#[tokio::test]
async fn test_cors_headers_on_upload_response() {
    let fixture = TestFixture::new();

    let body = MultipartBody::new()
        .file("a.png", "image/png", b"input")
        .text("targetFormat", "webp");
    let request = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header("Origin", ORIGIN)
        .header("Content-Type", MultipartBody::content_type())
        .body(Body::from(body.finish()))
        .unwrap();
    let response = fixture.send(request).await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.headers["access-control-allow-origin"], ORIGIN);
    assert!(response.headers["access-control-expose-headers"]
        .to_str()
        .unwrap()
        .to_ascii_lowercase()
        .contains("content-length"));
}

#[tokio::test]
async fn test_cors_other_origin_not_allowed() {
    let fixture = TestFixture::new();

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/upload")
        .header("Origin", "http://evil.example")
        .header("Access-Control-Request-Method", "POST")
        .body(Body::empty())
        .unwrap();
    let response = fixture.send(request).await;

    assert!(response
        .headers
        .get("access-control-allow-origin")
        .is_none());
}

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/health").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["codec"], "mock");
    let formats = response.body["formats"].as_array().unwrap();
    assert_eq!(formats.len(), 5);
}

#[tokio::test]
async fn test_metrics_exposed() {
    let fixture = TestFixture::new();

    fixture.get("/api/health").await;
    fixture
        .upload(
            MultipartBody::new()
                .file("a.png", "image/png", b"input")
                .text("targetFormat", "png"),
        )
        .await;

    let response = fixture.get("/api/metrics").await;
    assert_status!(response, StatusCode::OK);

    let text = response.body.as_str().unwrap();
    assert!(text.contains("pixshift_http_requests_total"));
    assert!(text.contains("pixshift_conversions_total"));
    assert!(text.contains("upload\""));
}

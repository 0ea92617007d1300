//! JSON response bodies for the upload endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pixshift_core::{BatchFailure, ConversionError, ConvertedFileResult};
use serde::Serialize;

pub const SUCCESS_MESSAGE: &str = "Files converted successfully";
pub const BATCH_ERROR_MESSAGE: &str = "Error processing files";

/// Details shown for failures that are not the client's fault.
const INTERNAL_DETAILS: &str = "Internal conversion error";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub files: Vec<ConvertedFileResult>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }
}

/// 200 with every converted file, in submission order.
pub fn success(files: Vec<ConvertedFileResult>) -> Response {
    (
        StatusCode::OK,
        Json(UploadResponse {
            message: SUCCESS_MESSAGE.to_string(),
            files,
        }),
    )
        .into_response()
}

/// 400 for a request rejected before any file is converted.
pub fn validation_error(error: &ConversionError) -> Response {
    bad_request(StatusCode::BAD_REQUEST, error.to_string())
}

/// Malformed request bodies. `status` is usually 400 but may carry the
/// multipart layer's own code (413 for an oversized body).
pub fn bad_request(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

/// 500 for a batch aborted by its first failing file.
pub fn batch_error(failure: &BatchFailure) -> Response {
    let details = if failure.is_internal() {
        format!("{}: {}", failure.file_name, INTERNAL_DETAILS)
    } else {
        failure.to_string()
    };

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: BATCH_ERROR_MESSAGE.to_string(),
            details: Some(details),
        }),
    )
        .into_response()
}

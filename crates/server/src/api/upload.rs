//! `POST {base}/upload`: multipart batch conversion.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

use pixshift_core::{validate_upload, ConversionOptions, UploadedFile};

use super::response;
use crate::state::AppState;

/// Content type assumed for parts that do not declare one.
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Fields collected from the multipart body.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub files: Vec<UploadedFile>,
    pub target_format: Option<String>,
    pub quality: Option<String>,
    pub lossless: Option<String>,
}

impl UploadForm {
    /// Reads every part of the body. Unknown fields are skipped.
    pub async fn parse(multipart: &mut Multipart) -> Result<Self, MultipartError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "files" => {
                    let file_name = field.file_name().unwrap_or("").to_string();
                    let content_type = field
                        .content_type()
                        .unwrap_or(DEFAULT_CONTENT_TYPE)
                        .to_string();
                    let data = field.bytes().await?;
                    form.files
                        .push(UploadedFile::new(file_name, content_type, data));
                }
                "targetFormat" => form.target_format = Some(field.text().await?),
                "quality" => form.quality = Some(field.text().await?),
                "lossless" => form.lossless = Some(field.text().await?),
                other => {
                    debug!(field = other, "Ignoring unknown multipart field");
                }
            }
        }

        Ok(form)
    }
}

/// Convert every uploaded file to the requested format.
///
/// Responds 400 when the request itself is unusable and 500 when any
/// single file fails; in that case no converted file is returned.
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected non-multipart upload");
            return response::bad_request(rejection.status(), rejection.body_text());
        }
    };

    let form = match UploadForm::parse(&mut multipart).await {
        Ok(form) => form,
        Err(e) => {
            warn!(error = %e.body_text(), "Failed to read multipart body");
            return response::bad_request(e.status(), e.body_text());
        }
    };

    let target = form.target_format.as_deref().unwrap_or("");
    let format = match validate_upload(form.files.len(), target, state.registry()) {
        Ok(format) => format,
        Err(e) => {
            debug!(error = %e, files = form.files.len(), "Upload rejected");
            return response::validation_error(&e);
        }
    };

    let options = ConversionOptions::from_form(form.quality.as_deref(), form.lossless.as_deref());

    match state
        .pipeline()
        .convert_batch(form.files, format, options)
        .await
    {
        Ok(results) => response::success(results),
        Err(failure) => response::batch_error(&failure),
    }
}

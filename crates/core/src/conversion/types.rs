//! Types for the conversion module.

use base64::engine::general_purpose::STANDARD as Base64;
use base64::Engine as _;
use bytes::Bytes;
use serde::Serialize;

use crate::codec::ImageInfo;
use crate::format::SupportedFormat;

/// A file received in an upload request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied file name.
    pub name: String,
    /// Declared MIME type of the part.
    pub content_type: String,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }
}

/// Codec facts plus the byte size of the buffer they describe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizedImageInfo {
    #[serde(flatten)]
    pub info: ImageInfo,
    pub size: usize,
}

/// Before/after metadata of one conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionMetadata {
    pub original: SizedImageInfo,
    pub converted: SizedImageInfo,
}

/// One converted file, ready to be serialized into the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedFileResult {
    /// Output name: original base name plus the new extension.
    pub name: String,
    pub original_name: String,
    /// Encoded output, base64 (standard alphabet, padded).
    pub data: String,
    /// Output size in bytes.
    pub size: usize,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub metadata: ConversionMetadata,
}

impl ConvertedFileResult {
    pub fn new(
        file: &UploadedFile,
        format: SupportedFormat,
        output: &[u8],
        original: ImageInfo,
        converted: ImageInfo,
    ) -> Self {
        Self {
            name: output_file_name(&file.name, format),
            original_name: file.name.clone(),
            data: Base64.encode(output),
            size: output.len(),
            mime_type: format.mime_type().to_string(),
            metadata: ConversionMetadata {
                original: SizedImageInfo {
                    info: original,
                    size: file.data.len(),
                },
                converted: SizedImageInfo {
                    info: converted,
                    size: output.len(),
                },
            },
        }
    }
}

/// Keeps the text before the first `.` and appends the target extension.
pub fn output_file_name(original: &str, format: SupportedFormat) -> String {
    let base = original.split('.').next().unwrap_or_default();
    format!("{}.{}", base, format.extension().to_lowercase())
}

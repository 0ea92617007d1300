//! Error types for the conversion module.

use std::fmt;
use thiserror::Error;

use crate::codec::CodecError;

/// Errors raised while validating or converting an upload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConversionError {
    /// The request carried no files.
    #[error("No files uploaded")]
    NoFiles,

    /// The requested target format is not in the registry.
    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    /// A file declared a content type outside the accepted input policy.
    #[error("Invalid file type: {content_type}")]
    UnsupportedFileType { content_type: String },

    /// The codec failed to inspect or encode a buffer.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Unexpected failure in orchestration.
    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

impl ConversionError {
    /// Creates a new internal error.
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }

    /// Whether this error rejects the request as a whole, before any file is touched.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::NoFiles | Self::UnsupportedFormat { .. })
    }
}

/// Step of the per-file pipeline where a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStage {
    TypeCheck,
    InspectOriginal,
    Encode,
    InspectConverted,
}

impl ConversionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TypeCheck => "type_check",
            Self::InspectOriginal => "inspect_original",
            Self::Encode => "encode",
            Self::InspectConverted => "inspect_converted",
        }
    }
}

impl fmt::Display for ConversionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First per-file failure of a batch, which aborts the whole batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{file_name}: {error}")]
pub struct BatchFailure {
    pub file_name: String,
    pub stage: ConversionStage,
    #[source]
    pub error: ConversionError,
}

impl BatchFailure {
    pub fn new(
        file_name: impl Into<String>,
        stage: ConversionStage,
        error: impl Into<ConversionError>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            stage,
            error: error.into(),
        }
    }

    /// Whether the failure is an unexpected internal one rather than a bad input or codec error.
    pub fn is_internal(&self) -> bool {
        matches!(
            self.error,
            ConversionError::Internal { .. } | ConversionError::Codec(CodecError::TaskFailed { .. })
        )
    }
}

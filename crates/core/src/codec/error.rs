//! Error types for the codec module.

use thiserror::Error;

use crate::format::SupportedFormat;

/// Errors reported by an [`ImageCodec`](super::ImageCodec).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The buffer is not in any image format the codec recognizes.
    #[error("Unrecognized image format")]
    UnrecognizedFormat,

    /// The buffer was recognized but could not be decoded.
    #[error("Failed to decode image: {reason}")]
    DecodeFailed { reason: String },

    /// Encoding to the target format failed.
    #[error("Failed to encode {format}: {reason}")]
    EncodeFailed {
        format: SupportedFormat,
        reason: String,
    },

    /// The codec cannot handle this case at all.
    #[error("Unsupported operation: {reason}")]
    Unsupported { reason: String },

    /// The codec call did not finish in time.
    #[error("Codec call timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// The worker running the codec call panicked or was cancelled.
    #[error("Codec task failed: {reason}")]
    TaskFailed { reason: String },
}

impl CodecError {
    /// Creates a new decode failed error.
    pub fn decode_failed(reason: impl Into<String>) -> Self {
        Self::DecodeFailed {
            reason: reason.into(),
        }
    }

    /// Creates a new encode failed error.
    pub fn encode_failed(format: SupportedFormat, reason: impl Into<String>) -> Self {
        Self::EncodeFailed {
            format,
            reason: reason.into(),
        }
    }

    /// Creates a new unsupported error.
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::Unsupported {
            reason: reason.into(),
        }
    }

    /// Whether the input itself is at fault, as opposed to the codec.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::UnrecognizedFormat | Self::DecodeFailed { .. } | Self::Unsupported { .. }
        )
    }
}

//! Trait definitions for the codec module.

use async_trait::async_trait;
use bytes::Bytes;

use super::error::CodecError;
use super::types::{ConversionOptions, ImageInfo};
use crate::format::SupportedFormat;

/// Capability that decodes and re-encodes image buffers.
///
/// Calls either succeed with a complete result or fail; there is no partial
/// output. Implementations must not block the async runtime.
#[async_trait]
pub trait ImageCodec: Send + Sync {
    /// Returns the name of this codec implementation.
    fn name(&self) -> &str;

    /// Reports format and dimensions of an encoded buffer.
    async fn inspect(&self, data: Bytes) -> Result<ImageInfo, CodecError>;

    /// Re-encodes a buffer into the target format.
    async fn encode(
        &self,
        data: Bytes,
        format: SupportedFormat,
        options: &ConversionOptions,
    ) -> Result<Bytes, CodecError>;
}

//! Mock codec for testing.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::codec::{CodecError, ConversionOptions, ImageCodec, ImageInfo};
use crate::format::SupportedFormat;

/// Prefix of every buffer produced by [`MockCodec::encode`].
const OUTPUT_PREFIX: &str = "MOCK:";

/// A recorded encode call for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEncode {
    pub input_len: usize,
    pub format: SupportedFormat,
    pub options: ConversionOptions,
}

/// Mock implementation of the ImageCodec trait.
///
/// Provides controllable behavior for testing:
/// - Track encode calls for assertions
/// - Fail inspect/encode for specific input buffers
/// - Simulate slow encodes and observe concurrency
///
/// Inputs it did not produce are reported with the default info (a 640x480
/// png unless changed). Outputs are small marker buffers that `inspect`
/// reports in the target format with the source dimensions.
///
/// # Example
///
/// ```rust,ignore
/// use pixshift_core::testing::MockCodec;
///
/// let codec = MockCodec::new();
/// codec.fail_encode_on(b"bad", CodecError::encode_failed(SupportedFormat::Png, "boom")).await;
///
/// let out = codec.encode(data, SupportedFormat::WebP, &options).await?;
/// assert_eq!(codec.encode_count().await, 1);
/// ```
#[derive(Debug)]
pub struct MockCodec {
    /// Recorded encode calls.
    encodes: Arc<RwLock<Vec<RecordedEncode>>>,
    /// Inputs whose inspection fails.
    inspect_failures: Arc<RwLock<HashMap<Vec<u8>, CodecError>>>,
    /// Inputs whose encoding fails.
    encode_failures: Arc<RwLock<HashMap<Vec<u8>, CodecError>>>,
    /// Info reported for buffers not produced by this mock.
    default_info: Arc<RwLock<ImageInfo>>,
    /// Simulated encode duration.
    encode_delay: Arc<RwLock<Duration>>,
    /// If set, outputs are reported in this format instead of the target.
    output_format_override: Arc<RwLock<Option<String>>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl Default for MockCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCodec {
    /// Create a new mock codec.
    pub fn new() -> Self {
        Self {
            encodes: Arc::new(RwLock::new(Vec::new())),
            inspect_failures: Arc::new(RwLock::new(HashMap::new())),
            encode_failures: Arc::new(RwLock::new(HashMap::new())),
            default_info: Arc::new(RwLock::new(ImageInfo {
                format: "png".to_string(),
                width: 640,
                height: 480,
            })),
            encode_delay: Arc::new(RwLock::new(Duration::ZERO)),
            output_format_override: Arc::new(RwLock::new(None)),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Get all recorded encode calls.
    pub async fn recorded_encodes(&self) -> Vec<RecordedEncode> {
        self.encodes.read().await.clone()
    }

    /// Get the number of encode calls performed.
    pub async fn encode_count(&self) -> usize {
        self.encodes.read().await.len()
    }

    /// Make `inspect` fail for this exact input.
    pub async fn fail_inspect_on(&self, data: &[u8], error: CodecError) {
        self.inspect_failures.write().await.insert(data.to_vec(), error);
    }

    /// Make `encode` fail for this exact input.
    pub async fn fail_encode_on(&self, data: &[u8], error: CodecError) {
        self.encode_failures.write().await.insert(data.to_vec(), error);
    }

    /// Set the info reported for inputs the mock did not produce.
    pub async fn set_default_info(&self, info: ImageInfo) {
        *self.default_info.write().await = info;
    }

    /// Set the simulated encode duration.
    pub async fn set_encode_delay(&self, delay: Duration) {
        *self.encode_delay.write().await = delay;
    }

    /// Report every output in `format`, regardless of the requested target.
    pub async fn set_output_format_override(&self, format: impl Into<String>) {
        *self.output_format_override.write().await = Some(format.into());
    }

    /// Highest number of encodes observed running at the same time.
    pub fn max_concurrent_encodes(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn parse_output(data: &[u8]) -> Option<ImageInfo> {
        let text = std::str::from_utf8(data).ok()?.strip_prefix(OUTPUT_PREFIX)?;
        let mut parts = text.split(':');
        let format = parts.next()?.to_string();
        let width = parts.next()?.parse().ok()?;
        let height = parts.next()?.parse().ok()?;
        Some(ImageInfo {
            format,
            width,
            height,
        })
    }

    async fn info_for(&self, data: &[u8]) -> ImageInfo {
        match Self::parse_output(data) {
            Some(info) => info,
            None => self.default_info.read().await.clone(),
        }
    }
}

#[async_trait]
impl ImageCodec for MockCodec {
    fn name(&self) -> &str {
        "mock"
    }

    async fn inspect(&self, data: Bytes) -> Result<ImageInfo, CodecError> {
        if let Some(err) = self.inspect_failures.read().await.get(data.as_ref()) {
            return Err(err.clone());
        }
        Ok(self.info_for(&data).await)
    }

    async fn encode(
        &self,
        data: Bytes,
        format: SupportedFormat,
        options: &ConversionOptions,
    ) -> Result<Bytes, CodecError> {
        self.encodes.write().await.push(RecordedEncode {
            input_len: data.len(),
            format,
            options: *options,
        });

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = *self.encode_delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(err) = self.encode_failures.read().await.get(data.as_ref()) {
            return Err(err.clone());
        }

        let source = self.info_for(&data).await;
        let reported = match self.output_format_override.read().await.as_ref() {
            Some(f) => f.clone(),
            None => format.codec_name().to_string(),
        };
        let output = format!(
            "{}{}:{}:{}:q{}",
            OUTPUT_PREFIX, reported, source.width, source.height, options.quality
        );
        Ok(Bytes::from(output))
    }
}

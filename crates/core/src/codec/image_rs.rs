//! Pure Rust codec built on the `image` crate, with dedicated encoders where
//! `image` has no quality knob.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Sniff container | `image::guess_format` |
//! | Dimensions (JPEG, PNG, WebP, GIF) | decoder header via `ImageReader::into_dimensions` |
//! | Dimensions (AVIF) | `avif-parse` container metadata |
//! | Decode (JPEG, PNG, WebP, GIF) | `image::load_from_memory_with_format` |
//! | Decode (AVIF) | `avif-parse` + rav1d |
//! | Encode → JPEG | mozjpeg, optimized Huffman tables, progressive |
//! | Encode → PNG | `PngEncoder`, quality mapped to a zlib level, adaptive filtering |
//! | Encode → WebP | libwebp via `webp`, lossy at the requested quality or lossless |
//! | Encode → AVIF | `AvifEncoder` (rav1e) |

use async_trait::async_trait;
use bytes::Bytes;
use image::codecs::avif::AvifEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageFormat, ImageReader};
use std::borrow::Cow;
use std::io::Cursor;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::{timeout, Duration};
use tracing::trace;

use super::avif::{decode_avif, inspect_avif};
use super::config::CodecConfig;
use super::error::CodecError;
use super::traits::ImageCodec;
use super::types::{ConversionOptions, ImageInfo};
use crate::format::SupportedFormat;

/// Codec running `image`-crate work on the blocking thread pool.
pub struct RustCodec {
    config: CodecConfig,
    jobs: Arc<Semaphore>,
}

impl RustCodec {
    /// Creates a new codec with the given configuration.
    pub fn new(config: CodecConfig) -> Self {
        let jobs = Arc::new(Semaphore::new(config.max_concurrent_jobs.max(1)));
        Self { config, jobs }
    }

    /// Creates a codec with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(CodecConfig::default())
    }

    /// Runs CPU-bound work off the async runtime, bounded by the configured timeout.
    ///
    /// Waiting for a job slot counts towards the timeout.
    async fn run_blocking<T, F>(&self, work: F) -> Result<T, CodecError>
    where
        F: FnOnce() -> Result<T, CodecError> + Send + 'static,
        T: Send + 'static,
    {
        let timeout_secs = self.config.timeout_secs;
        let jobs = Arc::clone(&self.jobs);
        let run = async move {
            let permit = jobs
                .acquire_owned()
                .await
                .map_err(|e| CodecError::TaskFailed {
                    reason: e.to_string(),
                })?;
            // A timed-out task cannot be stopped; the permit is released only
            // when the blocking work returns.
            let task = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                work()
            });
            task.await.map_err(|join_err| CodecError::TaskFailed {
                reason: join_err.to_string(),
            })?
        };

        match timeout(Duration::from_secs(timeout_secs), run).await {
            Ok(result) => result,
            Err(_) => Err(CodecError::Timeout { timeout_secs }),
        }
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl ImageCodec for RustCodec {
    fn name(&self) -> &str {
        "image-rs"
    }

    async fn inspect(&self, data: Bytes) -> Result<ImageInfo, CodecError> {
        self.run_blocking(move || inspect_buffer(&data)).await
    }

    async fn encode(
        &self,
        data: Bytes,
        format: SupportedFormat,
        options: &ConversionOptions,
    ) -> Result<Bytes, CodecError> {
        let options = *options;
        let avif_speed = self.config.avif_speed;
        self.run_blocking(move || {
            let image = decode_buffer(&data)?;
            let encoded = encode_image(&image, format, &options, avif_speed)?;
            trace!(
                format = %format,
                quality = options.quality,
                lossless = options.lossless,
                input_bytes = data.len(),
                output_bytes = encoded.len(),
                "Encoded image"
            );
            Ok(Bytes::from(encoded))
        })
        .await
    }
}

/// Lowercase name reported in [`ImageInfo::format`].
fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Png => "png",
        ImageFormat::WebP => "webp",
        ImageFormat::Avif => "avif",
        ImageFormat::Gif => "gif",
        other => other.extensions_str().first().copied().unwrap_or("unknown"),
    }
}

fn inspect_buffer(data: &[u8]) -> Result<ImageInfo, CodecError> {
    let format = image::guess_format(data).map_err(|_| CodecError::UnrecognizedFormat)?;
    if format == ImageFormat::Avif {
        return inspect_avif(data);
    }

    let (width, height) = ImageReader::with_format(Cursor::new(data), format)
        .into_dimensions()
        .map_err(|e| CodecError::decode_failed(e.to_string()))?;

    Ok(ImageInfo {
        format: format_name(format).to_string(),
        width,
        height,
    })
}

fn decode_buffer(data: &[u8]) -> Result<DynamicImage, CodecError> {
    let format = image::guess_format(data).map_err(|_| CodecError::UnrecognizedFormat)?;
    if format == ImageFormat::Avif {
        return decode_avif(data);
    }
    image::load_from_memory_with_format(data, format)
        .map_err(|e| CodecError::decode_failed(e.to_string()))
}

/// WebP and AVIF encoders only take 8-bit RGB(A).
fn to_8bit(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => Cow::Borrowed(image),
        _ if image.color().has_alpha() => Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8())),
        _ => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
    }
}

/// Maps quality 1..=100 onto zlib levels 1..=9; higher quality spends more effort.
fn png_compression_level(quality: u8) -> u8 {
    let quality = quality.clamp(1, 100) as u32;
    (1 + (quality - 1) * 8 / 99) as u8
}

fn encode_image(
    image: &DynamicImage,
    format: SupportedFormat,
    options: &ConversionOptions,
    avif_speed: u8,
) -> Result<Vec<u8>, CodecError> {
    match format {
        SupportedFormat::Jpg | SupportedFormat::Jpeg => encode_jpeg(image, options.quality),
        SupportedFormat::Png => {
            let mut buf = Cursor::new(Vec::new());
            let encoder = PngEncoder::new_with_quality(
                &mut buf,
                CompressionType::Level(png_compression_level(options.quality)),
                FilterType::Adaptive,
            );
            image
                .write_with_encoder(encoder)
                .map_err(|e| CodecError::encode_failed(format, e.to_string()))?;
            Ok(buf.into_inner())
        }
        SupportedFormat::WebP => encode_webp(image, options),
        SupportedFormat::Avif => {
            // rav1e has no lossless mode; the closest is maximum quality
            let quality = if options.lossless { 100 } else { options.quality };
            let mut buf = Cursor::new(Vec::new());
            let encoder = AvifEncoder::new_with_speed_quality(&mut buf, avif_speed, quality);
            to_8bit(image)
                .write_with_encoder(encoder)
                .map_err(|e| CodecError::encode_failed(format, e.to_string()))?;
            Ok(buf.into_inner())
        }
    }
}

/// mozjpeg with optimized Huffman tables and progressive scans.
fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, CodecError> {
    // JPEG has no alpha channel
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();

    // mozjpeg reports libjpeg errors by unwinding
    let result = catch_unwind(AssertUnwindSafe(|| -> std::io::Result<Vec<u8>> {
        let mut compress = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        compress.set_size(width as usize, height as usize);
        compress.set_quality(quality as f32);
        compress.set_optimize_coding(true);
        compress.set_progressive_mode();

        let mut started = compress.start_compress(Vec::new())?;
        started.write_scanlines(rgb.as_raw())?;
        started.finish()
    }));

    match result {
        Ok(Ok(data)) => Ok(data),
        Ok(Err(e)) => Err(CodecError::encode_failed(SupportedFormat::Jpeg, e.to_string())),
        Err(_) => Err(CodecError::encode_failed(
            SupportedFormat::Jpeg,
            "mozjpeg aborted",
        )),
    }
}

/// libwebp: lossy VP8 at the requested quality, or VP8L when lossless.
fn encode_webp(image: &DynamicImage, options: &ConversionOptions) -> Result<Vec<u8>, CodecError> {
    let image = to_8bit(image);
    let encoder = webp::Encoder::from_image(&image)
        .map_err(|e| CodecError::encode_failed(SupportedFormat::WebP, e))?;
    let memory = encoder
        .encode_simple(options.lossless, options.quality as f32)
        .map_err(|e| CodecError::encode_failed(SupportedFormat::WebP, format!("{e:?}")))?;
    Ok(memory.to_vec())
}

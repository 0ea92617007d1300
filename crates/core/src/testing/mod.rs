//! Testing utilities and mock implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use pixshift_core::testing::{fixtures, MockCodec};
//!
//! let codec = Arc::new(MockCodec::new());
//! let png = fixtures::sample_png(64, 48);
//! ```

mod mock_codec;

pub use mock_codec::{MockCodec, RecordedEncode};

/// Sample images encoded with the `image` crate.
pub mod fixtures {
    use image::codecs::avif::AvifEncoder;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    /// Deterministic RGB test pattern: gradients plus a checker texture,
    /// busy enough that lossy quality settings change the output size.
    pub fn pattern_rgb(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let checker = if (x / 4 + y / 4) % 2 == 0 { 40 } else { 0 };
            Rgb([
                ((x * 255) / width.max(1)) as u8,
                ((y * 255) / height.max(1)) as u8,
                (((x ^ y) * 7) % 216) as u8 + checker,
            ])
        })
    }

    /// Same pattern with a horizontal alpha ramp.
    pub fn pattern_rgba(width: u32, height: u32) -> RgbaImage {
        let rgb = pattern_rgb(width, height);
        RgbaImage::from_fn(width, height, |x, y| {
            let Rgb([r, g, b]) = *rgb.get_pixel(x, y);
            Rgba([r, g, b, ((x * 255) / width.max(1)) as u8])
        })
    }

    fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        image
            .write_to(&mut buf, format)
            .expect("fixture encoding failed");
        buf.into_inner()
    }

    /// PNG-encoded test pattern.
    pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
        encode(DynamicImage::ImageRgb8(pattern_rgb(width, height)), ImageFormat::Png)
    }

    /// PNG-encoded test pattern with transparency.
    pub fn sample_png_with_alpha(width: u32, height: u32) -> Vec<u8> {
        encode(DynamicImage::ImageRgba8(pattern_rgba(width, height)), ImageFormat::Png)
    }

    /// JPEG-encoded test pattern.
    pub fn sample_jpeg(width: u32, height: u32) -> Vec<u8> {
        encode(DynamicImage::ImageRgb8(pattern_rgb(width, height)), ImageFormat::Jpeg)
    }

    /// Lossless WebP-encoded test pattern.
    pub fn sample_webp(width: u32, height: u32) -> Vec<u8> {
        encode(DynamicImage::ImageRgb8(pattern_rgb(width, height)), ImageFormat::WebP)
    }

    /// AVIF-encoded test pattern, at the fastest encoder speed.
    pub fn sample_avif(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        let encoder = AvifEncoder::new_with_speed_quality(&mut buf, 10, 90);
        DynamicImage::ImageRgb8(pattern_rgb(width, height))
            .write_with_encoder(encoder)
            .expect("fixture encoding failed");
        buf.into_inner()
    }

    /// GIF-encoded test pattern.
    pub fn sample_gif(width: u32, height: u32) -> Vec<u8> {
        encode(DynamicImage::ImageRgba8(pattern_rgba(width, height)), ImageFormat::Gif)
    }
}

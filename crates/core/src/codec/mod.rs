//! Codec module for decoding and re-encoding images.
//!
//! The pipeline only talks to the [`ImageCodec`] trait, so the concrete
//! backend can be swapped or mocked without touching conversion logic.
//!
//! # Example
//!
//! ```ignore
//! use pixshift_core::codec::{ConversionOptions, ImageCodec, RustCodec};
//! use pixshift_core::SupportedFormat;
//!
//! let codec = RustCodec::with_defaults();
//!
//! let info = codec.inspect(data.clone()).await?;
//! println!("{}x{} {}", info.width, info.height, info.format);
//!
//! let webp = codec
//!     .encode(data, SupportedFormat::WebP, &ConversionOptions::new(80, true))
//!     .await?;
//! ```

mod avif;
mod config;
mod error;
mod image_rs;
mod traits;
mod types;

pub use config::CodecConfig;
pub use error::CodecError;
pub use image_rs::RustCodec;
pub use traits::ImageCodec;
pub use types::{ConversionOptions, ImageInfo, DEFAULT_QUALITY};

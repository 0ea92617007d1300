//! Conversion module: upload validation and the batch pipeline.
//!
//! # Example
//!
//! ```ignore
//! use pixshift_core::conversion::{validate_upload, ConversionPipeline, UploadedFile};
//! use pixshift_core::{AcceptedInputTypes, ConversionOptions, FormatRegistry, RustCodec};
//!
//! let registry = FormatRegistry::new();
//! let pipeline = ConversionPipeline::new(
//!     Arc::new(RustCodec::with_defaults()),
//!     AcceptedInputTypes::from_registry(&registry),
//! );
//!
//! let format = validate_upload(files.len(), "webp", &registry)?;
//! let results = pipeline
//!     .convert_batch(files, format, ConversionOptions::from_form(Some("75"), None))
//!     .await?;
//! ```

mod error;
mod pipeline;
mod types;
mod validate;

pub use error::{BatchFailure, ConversionError, ConversionStage};
pub use pipeline::ConversionPipeline;
pub use types::{
    output_file_name, ConversionMetadata, ConvertedFileResult, SizedImageInfo, UploadedFile,
};
pub use validate::validate_upload;

pub mod codec;
pub mod config;
pub mod conversion;
pub mod format;
pub mod metrics;
pub mod testing;

pub use codec::{
    CodecConfig, CodecError, ConversionOptions, ImageCodec, ImageInfo, RustCodec, DEFAULT_QUALITY,
};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, ConversionConfig, CorsConfig, ServerConfig,
};
pub use conversion::{
    output_file_name, validate_upload, BatchFailure, ConversionError, ConversionPipeline,
    ConversionStage, ConvertedFileResult, UploadedFile,
};
pub use format::{AcceptedInputTypes, FormatRegistry, SupportedFormat};

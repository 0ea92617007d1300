use super::error::ConversionError;
use crate::format::{FormatRegistry, SupportedFormat};

/// Rejects an upload that has no files or asks for an unknown target format.
///
/// The file count is checked first, so an empty request with a bad format
/// reports the missing files.
pub fn validate_upload(
    file_count: usize,
    target_format: &str,
    registry: &FormatRegistry,
) -> Result<SupportedFormat, ConversionError> {
    if file_count == 0 {
        return Err(ConversionError::NoFiles);
    }

    registry
        .lookup(target_format)
        .ok_or_else(|| ConversionError::UnsupportedFormat {
            format: target_format.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_upload() {
        let registry = FormatRegistry::new();
        assert_eq!(
            validate_upload(2, "webp", &registry),
            Ok(SupportedFormat::WebP)
        );
    }

    #[test]
    fn test_no_files() {
        let registry = FormatRegistry::new();
        assert_eq!(
            validate_upload(0, "webp", &registry),
            Err(ConversionError::NoFiles)
        );
    }

    #[test]
    fn test_unsupported_format() {
        let registry = FormatRegistry::new();
        let err = validate_upload(1, "bmp", &registry).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported format: bmp");
    }

    #[test]
    fn test_no_files_checked_before_format() {
        let registry = FormatRegistry::new();
        assert_eq!(
            validate_upload(0, "bmp", &registry),
            Err(ConversionError::NoFiles)
        );
    }
}

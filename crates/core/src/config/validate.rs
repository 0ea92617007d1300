use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0, upload limit is not 0
/// - Base path starts with `/`, is not the root and has no trailing `/`
/// - CORS origin is a single, concrete, header-safe value
/// - Codec timeout and job limit are not 0, AVIF speed is within 1..=10
/// - Accepted input types, when given, are non-empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let invalid = |msg: &str| Err(ConfigError::ValidationError(msg.to_string()));

    // Server validation
    if config.server.port == 0 {
        return invalid("server.port cannot be 0");
    }
    if config.server.max_upload_bytes == 0 {
        return invalid("server.max_upload_bytes cannot be 0");
    }
    let base_path = &config.server.base_path;
    if !base_path.starts_with('/') || base_path.len() < 2 || base_path.ends_with('/') {
        return invalid("server.base_path must start with '/', not be '/', and not end with '/'");
    }

    // CORS validation
    let origin = &config.cors.allowed_origin;
    if origin.is_empty() {
        return invalid("cors.allowed_origin cannot be empty");
    }
    if origin == "*" {
        return invalid("cors.allowed_origin must name a single origin, not '*'");
    }
    if !origin.chars().all(|c| c.is_ascii_graphic()) {
        return invalid("cors.allowed_origin contains invalid characters");
    }

    // Codec validation
    if config.codec.timeout_secs == 0 {
        return invalid("codec.timeout_secs cannot be 0");
    }
    if !(1..=10).contains(&config.codec.avif_speed) {
        return invalid("codec.avif_speed must be between 1 and 10");
    }
    if config.codec.max_concurrent_jobs == 0 {
        return invalid("codec.max_concurrent_jobs cannot be 0");
    }

    // Conversion validation
    if let Some(types) = &config.conversion.accepted_input_types {
        if types.iter().all(|t| t.trim().is_empty()) {
            return invalid("conversion.accepted_input_types cannot be empty");
        }
    }

    Ok(())
}

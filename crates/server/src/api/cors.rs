use axum::http::{header, HeaderValue, Method};
use pixshift_core::CorsConfig;
use std::time::Duration;
use tower_http::cors::CorsLayer;

/// Builds the cross-origin policy: one origin, POST only.
pub fn cors_layer(config: &CorsConfig) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(&config.allowed_origin)
        .map_err(|e| anyhow::anyhow!("Invalid CORS origin {:?}: {}", config.allowed_origin, e))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(config.max_age_secs)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_builds() {
        assert!(cors_layer(&CorsConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_origin_rejected() {
        let config = CorsConfig {
            allowed_origin: "http://bad\norigin".to_string(),
            ..CorsConfig::default()
        };
        assert!(cors_layer(&config).is_err());
    }
}

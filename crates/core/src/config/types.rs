use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::codec::CodecConfig;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub codec: CodecConfig,
    #[serde(default)]
    pub conversion: ConversionConfig,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path prefix all routes are mounted under.
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_path: default_base_path(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    3000
}

fn default_base_path() -> String {
    "/api".to_string()
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

/// Cross-origin policy for browser clients.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CorsConfig {
    /// The single origin allowed to call the API.
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
    /// How long browsers may cache preflight results, in seconds.
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: default_allowed_origin(),
            max_age_secs: default_max_age(),
        }
    }
}

fn default_allowed_origin() -> String {
    "http://localhost:5173".to_string()
}

fn default_max_age() -> u64 {
    600
}

/// Conversion policy configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ConversionConfig {
    /// Declared MIME types accepted as input. When unset, the output
    /// format registry's MIME types are used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_input_types: Option<Vec<String>>,
}

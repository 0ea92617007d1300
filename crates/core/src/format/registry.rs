//! Target formats and their canonical MIME types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output encoding a batch can be converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedFormat {
    WebP,
    Avif,
    Jpg,
    Jpeg,
    Png,
}

impl SupportedFormat {
    /// Every format, in registry order.
    pub const ALL: [SupportedFormat; 5] = [
        SupportedFormat::WebP,
        SupportedFormat::Avif,
        SupportedFormat::Jpg,
        SupportedFormat::Jpeg,
        SupportedFormat::Png,
    ];

    /// Identifier as accepted in the `targetFormat` form field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WebP => "webp",
            Self::Avif => "avif",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }

    /// File extension used for converted output names.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// Canonical MIME type of encoded output. `jpg` and `jpeg` share one.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::WebP => "image/webp",
            Self::Avif => "image/avif",
            Self::Jpg | Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Name a codec reports for data encoded in this format.
    pub fn codec_name(&self) -> &'static str {
        match self {
            Self::Jpg | Self::Jpeg => "jpeg",
            other => other.as_str(),
        }
    }

    /// Whether the encoder for this format reacts to the lossless flag.
    ///
    /// For AVIF this means maximum quality, not a bit-exact encoding.
    pub fn supports_lossless(&self) -> bool {
        matches!(self, Self::WebP | Self::Avif)
    }
}

impl fmt::Display for SupportedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no supported format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFormat(pub String);

impl fmt::Display for UnknownFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown format: {}", self.0)
    }
}

impl std::error::Error for UnknownFormat {}

impl FromStr for SupportedFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

/// Immutable lookup table from target format identifier to MIME type.
///
/// Built once at startup and shared by reference; it is the single source of
/// truth for whether a target format is supported.
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    formats: Vec<SupportedFormat>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self {
            formats: SupportedFormat::ALL.to_vec(),
        }
    }

    /// Resolves a target format identifier. Lookup is exact and case-sensitive.
    pub fn lookup(&self, format: &str) -> Option<SupportedFormat> {
        self.formats.iter().copied().find(|f| f.as_str() == format)
    }

    /// MIME type for a target format identifier, if supported.
    pub fn mime_type_for(&self, format: &str) -> Option<&'static str> {
        self.lookup(format).map(|f| f.mime_type())
    }

    pub fn formats(&self) -> &[SupportedFormat] {
        &self.formats
    }

    /// Distinct MIME types across all formats.
    pub fn mime_types(&self) -> Vec<&'static str> {
        let mut types: Vec<&'static str> = Vec::new();
        for format in &self.formats {
            let mime = format.mime_type();
            if !types.contains(&mime) {
                types.push(mime);
            }
        }
        types
    }
}

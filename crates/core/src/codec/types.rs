//! Types for the codec module.

use serde::{Deserialize, Serialize};

/// Quality used when the request gives none (or an unusable one).
pub const DEFAULT_QUALITY: u8 = 80;

/// Basic facts a codec reports about an encoded buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Lowercase format name, e.g. `jpeg`, `png`, `webp`, `avif`.
    pub format: String,
    pub width: u32,
    pub height: u32,
}

/// Encoder settings applied uniformly to every file of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOptions {
    /// Encoder quality, 1..=100.
    pub quality: u8,
    /// Request lossless output where the target format supports it.
    ///
    /// WebP switches to its lossless bitstream. AVIF has no lossless encoder
    /// here: the flag raises quality to 100, which still subsamples chroma
    /// (4:2:0), so the result is near-lossless only. JPEG and PNG ignore it.
    pub lossless: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            lossless: false,
        }
    }
}

impl ConversionOptions {
    pub fn new(quality: u8, lossless: bool) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            lossless,
        }
    }

    /// Builds options from the raw `quality` and `lossless` form values.
    ///
    /// Quality takes the leading integer of the value; absent, non-numeric or
    /// zero falls back to [`DEFAULT_QUALITY`], anything else is clamped to
    /// 1..=100. Lossless is set only by the exact literal `"true"`.
    pub fn from_form(quality: Option<&str>, lossless: Option<&str>) -> Self {
        let quality = match quality.and_then(leading_integer) {
            None | Some(0) => DEFAULT_QUALITY,
            Some(q) => q.clamp(1, 100) as u8,
        };
        Self {
            quality,
            lossless: lossless == Some("true"),
        }
    }
}

/// Parses an optionally signed run of digits at the start of `raw`.
fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    rest[..end].parse::<i64>().ok().map(|v| sign * v)
}

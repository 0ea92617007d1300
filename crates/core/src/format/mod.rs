//! Supported output formats and accepted input types.

mod accepted;
mod registry;

pub use accepted::AcceptedInputTypes;
pub use registry::{FormatRegistry, SupportedFormat, UnknownFormat};

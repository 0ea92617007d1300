use std::sync::Arc;
use pixshift_core::{Config, ConversionPipeline, FormatRegistry};

/// Shared application state
pub struct AppState {
    config: Config,
    registry: Arc<FormatRegistry>,
    pipeline: ConversionPipeline,
}

impl AppState {
    pub fn new(config: Config, registry: Arc<FormatRegistry>, pipeline: ConversionPipeline) -> Self {
        Self {
            config,
            registry,
            pipeline,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &FormatRegistry {
        self.registry.as_ref()
    }

    pub fn pipeline(&self) -> &ConversionPipeline {
        &self.pipeline
    }
}

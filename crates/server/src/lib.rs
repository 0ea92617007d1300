//! HTTP front end for the pixshift image converter.
//!
//! The binary wires configuration, the codec and the conversion pipeline
//! into [`state::AppState`] and serves [`api::create_router`].

pub mod api;
pub mod metrics;
pub mod state;

use std::sync::Arc;

use pixshift_core::{
    AcceptedInputTypes, Config, ConversionPipeline, FormatRegistry, ImageCodec,
};

use state::AppState;

/// Assembles application state around `codec` using the policies in `config`.
pub fn build_state(config: Config, codec: Arc<dyn ImageCodec>) -> Arc<AppState> {
    let registry = Arc::new(FormatRegistry::new());
    let accepted = match &config.conversion.accepted_input_types {
        Some(types) => AcceptedInputTypes::new(types.iter()),
        None => AcceptedInputTypes::from_registry(&registry),
    };
    let pipeline = ConversionPipeline::new(codec, accepted);

    Arc::new(AppState::new(config, registry, pipeline))
}

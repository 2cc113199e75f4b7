//! Response sources for Metisium: the streamed (language model) and
//! synthetic (canned reply) variants behind one `ResponseSource` trait.

pub mod gemini_api_model;
pub mod language_model;
pub mod source;
pub mod sse;
pub mod streamed_source;
pub mod synthetic_source;
pub mod unavailable_model;

pub use gemini_api_model::GeminiApiModel;
pub use language_model::LanguageModel;
pub use source::{FragmentStream, ResponseSource};
pub use streamed_source::StreamedSource;
pub use synthetic_source::SyntheticSource;
pub use unavailable_model::UnavailableModel;

use metis_core::config::ModelConfig;
use std::sync::Arc;

/// Picks the language model described by `config`.
///
/// Without an API key the returned model is unavailable and every combined
/// reply degrades to the fallback message.
pub fn model_from_config(config: &ModelConfig) -> Arc<dyn LanguageModel> {
    match GeminiApiModel::from_config(config) {
        Some(model) => {
            tracing::info!(model = model.model(), "using Gemini model");
            Arc::new(model)
        }
        None => {
            tracing::warn!("no Gemini API key configured; combined replies will fall back");
            Arc::new(UnavailableModel::new("no API key configured"))
        }
    }
}

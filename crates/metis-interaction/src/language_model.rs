//! Language-model service abstraction.

use crate::source::FragmentStream;
use async_trait::async_trait;
use metis_core::Result;

/// A text-generation service that streams its answer.
///
/// No retry is attempted by callers; a failure ends the reply.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn stream_generate(&self, prompt: &str, system_instruction: &str)
    -> Result<FragmentStream>;
}

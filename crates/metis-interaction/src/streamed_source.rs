//! Response source backed by a language model.

use crate::language_model::LanguageModel;
use crate::source::{FragmentStream, ResponseSource};
use async_trait::async_trait;
use metis_core::Result;
use std::sync::Arc;

/// Forwards the fragments of one `stream_generate` call unmodified.
pub struct StreamedSource {
    model: Arc<dyn LanguageModel>,
    prompt: String,
    system_instruction: String,
}

impl StreamedSource {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        prompt: impl Into<String>,
        system_instruction: impl Into<String>,
    ) -> Self {
        Self {
            model,
            prompt: prompt.into(),
            system_instruction: system_instruction.into(),
        }
    }
}

#[async_trait]
impl ResponseSource for StreamedSource {
    async fn open(&self) -> Result<FragmentStream> {
        tracing::debug!(
            prompt_len = self.prompt.len(),
            instruction_len = self.system_instruction.len(),
            "opening model stream"
        );
        self.model
            .stream_generate(&self.prompt, &self.system_instruction)
            .await
    }
}

//! Stand-in used when no model service is configured.

use crate::language_model::LanguageModel;
use crate::source::FragmentStream;
use async_trait::async_trait;
use metis_core::{MetisError, Result};

/// Fails every request, so combined replies fall back to the apology.
#[derive(Debug, Clone)]
pub struct UnavailableModel {
    reason: String,
}

impl UnavailableModel {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl LanguageModel for UnavailableModel {
    async fn stream_generate(&self, _prompt: &str, _system_instruction: &str) -> Result<FragmentStream> {
        Err(MetisError::upstream(None, self.reason.clone()))
    }
}

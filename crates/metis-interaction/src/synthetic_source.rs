//! Character-by-character emitter over a precomputed reply.

use crate::source::{FragmentStream, ResponseSource};
use async_trait::async_trait;
use futures::stream;
use metis_core::Result;
use metis_core::response::CannedResponses;
use std::time::Duration;

/// Emits a fixed text one character per tick. Never fails.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    text: String,
    interval: Duration,
}

impl SyntheticSource {
    pub fn new(text: impl Into<String>, interval: Duration) -> Self {
        Self {
            text: text.into(),
            interval,
        }
    }

    /// Builds the source for an agent's canned reply under `role`.
    pub fn canned(
        table: &CannedResponses,
        agent_id: &str,
        role: &str,
        interval: Duration,
    ) -> Self {
        Self::new(table.lookup(agent_id, role), interval)
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[async_trait]
impl ResponseSource for SyntheticSource {
    async fn open(&self) -> Result<FragmentStream> {
        let chars: Vec<char> = self.text.chars().collect();
        let interval = self.interval;

        let fragments = stream::unfold(chars.into_iter(), move |mut chars| async move {
            let next = chars.next()?;
            tokio::time::sleep(interval).await;
            Some((Ok(next.to_string()), chars))
        });
        Ok(Box::pin(fragments))
    }
}

//! Generation ids and liveness tokens.
//!
//! Exactly one generation is current at a time. Minting a new id implicitly
//! cancels every older one: their tokens stop being live, and any future
//! racing on [`LivenessToken::superseded`] wakes up.

use metis_core::routing::GenerationMode;
use tokio::sync::watch;

/// Process-wide monotonic generation counter.
#[derive(Debug)]
pub struct GenerationCounter {
    current: watch::Sender<u64>,
}

impl GenerationCounter {
    pub fn new() -> Self {
        let (current, _) = watch::channel(0);
        Self { current }
    }

    /// Starts a new generation and returns its token.
    pub fn mint(&self) -> LivenessToken {
        let id = self.bump();
        LivenessToken {
            id,
            current: self.current.subscribe(),
        }
    }

    /// Invalidates the current generation without starting a new one.
    pub fn bump(&self) -> u64 {
        let mut id = 0;
        self.current.send_modify(|current| {
            *current += 1;
            id = *current;
        });
        id
    }

    pub fn current(&self) -> u64 {
        *self.current.borrow()
    }
}

impl Default for GenerationCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Handed to every future of a generation.
#[derive(Debug, Clone)]
pub struct LivenessToken {
    id: u64,
    current: watch::Receiver<u64>,
}

impl LivenessToken {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// True while no newer generation has been minted.
    pub fn is_live(&self) -> bool {
        *self.current.borrow() == self.id
    }

    /// Resolves once the generation is no longer current.
    pub async fn superseded(&self) {
        let mut current = self.current.clone();
        let id = self.id;
        if current.wait_for(|value| *value != id).await.is_err() {
            // Counter dropped: nothing can supersede us any more.
            std::future::pending::<()>().await;
        }
    }
}

/// An ephemeral record of one generation, used for logging and outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub id: u64,
    pub conversation_id: String,
    pub mode: GenerationMode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_minting_supersedes_previous_token() {
        let counter = GenerationCounter::new();
        let first = counter.mint();
        assert!(first.is_live());

        let second = counter.mint();
        assert!(!first.is_live());
        assert!(second.is_live());
        assert!(second.id() > first.id());

        counter.bump();
        assert!(!second.is_live());
        assert_eq!(counter.current(), second.id() + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_wakes_on_bump() {
        let counter = GenerationCounter::new();
        let token = counter.mint();

        let pending = tokio::time::timeout(Duration::from_secs(5), token.superseded()).await;
        assert!(pending.is_err(), "live token must not resolve");

        counter.bump();
        tokio::time::timeout(Duration::from_secs(5), token.superseded())
            .await
            .expect("superseded token resolves");
    }
}

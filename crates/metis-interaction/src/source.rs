//! The response source abstraction.

use async_trait::async_trait;
use futures::Stream;
use metis_core::Result;
use std::pin::Pin;

/// A lazy, finite sequence of text increments.
///
/// An `Err` item means the stream terminated abnormally; consumers stop
/// reading after the first one.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Produces the reply of one agent (or of the orchestrator) as a stream.
///
/// Each source describes a single reply. Opening it twice is allowed but
/// yields two independent streams; the coordinator never does so.
#[async_trait]
pub trait ResponseSource: Send + Sync {
    /// Starts producing increments.
    ///
    /// Fails when the reply cannot be started at all, for example when the
    /// model service rejects the request.
    async fn open(&self) -> Result<FragmentStream>;
}

//! GeminiApiModel - streaming REST implementation for Gemini.
//!
//! Calls `streamGenerateContent?alt=sse` and turns the event stream into
//! text fragments.

use crate::language_model::LanguageModel;
use crate::source::FragmentStream;
use crate::sse::SseDecoder;
use async_trait::async_trait;
use futures::{Stream, StreamExt, stream};
use metis_core::config::ModelConfig;
use metis_core::{MetisError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt::Display;
use std::pin::Pin;

/// Language model that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiApiModel {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiApiModel {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
        }
    }

    /// Builds the model from configuration. Returns `None` when no API key
    /// can be resolved.
    pub fn from_config(config: &ModelConfig) -> Option<Self> {
        let api_key = config.resolve_api_key()?;
        Some(Self::new(api_key, &config.model, &config.base_url))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/{model}:streamGenerateContent?alt=sse&key={api_key}",
            self.base_url.trim_end_matches('/'),
            model = self.model,
            api_key = self.api_key
        )
    }
}

#[async_trait]
impl LanguageModel for GeminiApiModel {
    async fn stream_generate(
        &self,
        prompt: &str,
        system_instruction: &str,
    ) -> Result<FragmentStream> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            system_instruction: (!system_instruction.trim().is_empty()).then(|| Content {
                role: None,
                parts: vec![Part {
                    text: system_instruction.to_string(),
                }],
            }),
        };

        let response = self
            .client
            .post(self.stream_url())
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                MetisError::upstream(
                    err.status().map(|s| s.as_u16()),
                    format!("Gemini API request failed: {err}"),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            tracing::warn!(status = status.as_u16(), model = %self.model, "Gemini request rejected");
            return Err(map_http_error(status, body_text));
        }

        tracing::debug!(model = %self.model, "Gemini stream opened");
        Ok(sse_fragments(response.bytes_stream()))
    }
}

/// Turns a byte stream of Gemini SSE events into text fragments.
pub fn sse_fragments<S, B, E>(bytes: S) -> FragmentStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    struct State<B, E> {
        bytes: Pin<Box<dyn Stream<Item = std::result::Result<B, E>> + Send>>,
        decoder: SseDecoder,
        pending: VecDeque<Result<String>>,
        done: bool,
    }

    let state = State {
        bytes: Box::pin(bytes),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        done: false,
    };

    let fragments = stream::unfold(state, |mut st| async move {
        loop {
            if let Some(item) = st.pending.pop_front() {
                if item.is_err() {
                    st.pending.clear();
                    st.done = true;
                }
                return Some((item, st));
            }
            if st.done {
                return None;
            }

            let payloads = match st.bytes.next().await {
                Some(Ok(chunk)) => st.decoder.push(chunk.as_ref()),
                Some(Err(err)) => {
                    st.done = true;
                    let message = format!("Gemini stream interrupted: {err}");
                    return Some((Err(MetisError::upstream(None, message)), st));
                }
                None => {
                    st.done = true;
                    st.decoder.finish().into_iter().collect()
                }
            };

            for payload in payloads {
                match parse_event(&payload) {
                    Ok(Some(text)) => st.pending.push_back(Ok(text)),
                    Ok(None) => {}
                    Err(err) => st.pending.push_back(Err(err)),
                }
            }
        }
    });

    Box::pin(fragments)
}

/// Extracts the text of one streamed `GenerateContentResponse`.
fn parse_event(payload: &str) -> Result<Option<String>> {
    let event: StreamEvent = serde_json::from_str(payload).map_err(|err| {
        MetisError::upstream(None, format!("Failed to parse Gemini event: {err}"))
    })?;

    if let Some(error) = event.error {
        return Err(MetisError::upstream(
            error.code.and_then(|c| u16::try_from(c).ok()),
            error_message(error.status, error.message, payload),
        ));
    }

    let text: String = event
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    Ok((!text.is_empty()).then_some(text))
}

fn map_http_error(status: StatusCode, body: String) -> MetisError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| error_message(wrapper.error.status, wrapper.error.message, &body))
        .unwrap_or_else(|_| body.clone());
    MetisError::upstream(Some(status.as_u16()), message)
}

fn error_message(status: Option<String>, message: Option<String>, raw: &str) -> String {
    let status_text = status.unwrap_or_default();
    let msg = message.unwrap_or_else(|| raw.to_string());
    if status_text.is_empty() {
        msg
    } else {
        format!("{status_text}: {msg}")
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct StreamEvent {
    candidates: Option<Vec<Candidate>>,
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: Option<i64>,
    message: Option<String>,
    status: Option<String>,
}

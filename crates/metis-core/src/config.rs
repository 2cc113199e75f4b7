//! Configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer. Every field has a
//! default so a missing or partial file still yields a working engine.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_MODEL_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_COMBINED_FALLBACK: &str =
    "Sorry, I encountered an error trying to generate a combined response.";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RootConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

/// Timing and wording of the generation engine.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Delay before the first targeted agent joins
    pub first_agent_delay_ms: u64,
    /// Extra delay added for each subsequent agent
    pub agent_delay_step_ms: u64,
    /// Interval between characters of a synthetic reply
    pub char_interval_ms: u64,
    /// Reply committed when the combined stream fails
    pub combined_fallback_message: String,
    /// Name the orchestrator uses for itself in its instruction
    pub orchestrator_name: String,
}

impl EngineConfig {
    /// Start delay of the agent dispatched at `index` (0-based).
    pub fn stagger_delay(&self, index: usize) -> Duration {
        Duration::from_millis(self.first_agent_delay_ms + self.agent_delay_step_ms * index as u64)
    }

    pub fn char_interval(&self) -> Duration {
        Duration::from_millis(self.char_interval_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            first_agent_delay_ms: 1000,
            agent_delay_step_ms: 500,
            char_interval_ms: 30,
            combined_fallback_message: DEFAULT_COMBINED_FALLBACK.to_string(),
            orchestrator_name: "Metisium".to_string(),
        }
    }
}

/// Language-model service settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ModelConfig {
    pub model: String,
    pub base_url: String,
    /// API key. When unset, `GEMINI_API_KEY` and then `API_KEY` are read
    /// from the environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl ModelConfig {
    /// Resolves the API key from the config or the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_MODEL_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stagger_delay_grows_by_step() {
        let engine = EngineConfig::default();
        assert_eq!(engine.stagger_delay(0), Duration::from_millis(1000));
        assert_eq!(engine.stagger_delay(1), Duration::from_millis(1500));
        assert_eq!(engine.stagger_delay(2), Duration::from_millis(2000));
        assert_eq!(engine.char_interval(), Duration::from_millis(30));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: RootConfig = toml::from_str(
            r#"
[engine]
char_interval_ms = 5

[model]
model = "gemini-2.5-pro"
"#,
        )
        .unwrap();

        assert_eq!(config.engine.char_interval_ms, 5);
        assert_eq!(config.engine.first_agent_delay_ms, 1000);
        assert_eq!(config.model.model, "gemini-2.5-pro");
        assert_eq!(config.model.base_url, DEFAULT_MODEL_BASE_URL);
    }

    #[test]
    fn test_configured_key_wins_over_environment() {
        let model = ModelConfig {
            api_key: Some("from-config".to_string()),
            ..ModelConfig::default()
        };
        assert_eq!(model.resolve_api_key().as_deref(), Some("from-config"));
    }
}

//! Built-in agent catalog.

use super::model::Agent;

/// Returns the agents available to every conversation.
///
/// - **Gemini**: multi-modal assistant
/// - **Claude**: thoughtful, safety-minded assistant
/// - **ChatGPT**: general-purpose assistant
/// - **Grok**: real-time, irreverent assistant
pub fn get_default_agents() -> Vec<Agent> {
    vec![
        Agent::new("gemini", "Gemini", "https://i.imgur.com/6cFLcUV.png"),
        Agent::new("claude", "Claude", "https://i.imgur.com/4lQQH8w.png"),
        Agent::new("chatgpt", "ChatGPT", "https://i.imgur.com/EKtV2DR.png"),
        Agent::new("grok", "Grok", "https://i.imgur.com/jV51C3L.png"),
    ]
}

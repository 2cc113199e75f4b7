//! Canned-response table.

use crate::routing::DEFAULT_RESPONSE_KEY;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reply used when neither the agent's role nor its default has an entry.
pub const GLOBAL_FALLBACK_RESPONSE: &str = "I'm not sure how to respond to that.";

/// Per-agent replies keyed by role text.
///
/// Lookups never fail: `(agent, role)` falls back to `(agent, "default")`,
/// which falls back to the global fallback string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CannedResponses {
    responses: HashMap<String, HashMap<String, String>>,
    fallback: String,
}

impl CannedResponses {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            responses: HashMap::new(),
            fallback: fallback.into(),
        }
    }

    pub fn insert(
        &mut self,
        agent_id: impl Into<String>,
        role: impl Into<String>,
        response: impl Into<String>,
    ) {
        self.responses
            .entry(agent_id.into())
            .or_default()
            .insert(role.into(), response.into());
    }

    /// Returns the reply for `agent_id` playing `role`.
    pub fn lookup(&self, agent_id: &str, role: &str) -> &str {
        let by_role = self.responses.get(agent_id);
        by_role
            .and_then(|roles| roles.get(role))
            .or_else(|| by_role.and_then(|roles| roles.get(DEFAULT_RESPONSE_KEY)))
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }

    /// The built-in table for the preset agents and project roles.
    pub fn preset() -> Self {
        let mut table = Self::new(GLOBAL_FALLBACK_RESPONSE);

        table.insert("gemini", "Image Generator & Data Analyst", "Certainly. Based on the data, I recommend focusing on the 25-34 demographic. I've also generated a concept image for the ad campaign. Here it is.");
        table.insert("gemini", "Code Generation & Optimization", "I've analyzed the provided snippet and identified a performance bottleneck. Here is an optimized version of the function using a more efficient algorithm:\n```javascript\nfunction optimizedSearch(list, item) {\n  let low = 0;\n  let high = list.length - 1;\n\n  while (low <= high) {\n    let mid = Math.floor((low + high) / 2);\n    let guess = list[mid];\n    if (guess === item) {\n      return mid;\n    }\n    if (guess > item) {\n      high = mid - 1;\n    } else {\n      low = mid + 1;\n    }\n  }\n\n  return null; // item not found\n}\n```");
        table.insert("gemini", DEFAULT_RESPONSE_KEY, "Hello! As Gemini, I'm ready to assist with my multi-modal capabilities. What can I help you with?");

        table.insert("claude", "Strategic Advisor", "Considering the long-term goals, we should prioritize brand trust over immediate conversions. This involves a more educational content approach.");
        table.insert("claude", "Project Architecture Reviewer", "The proposed architecture is solid, but I would suggest implementing a message queue for decoupling the microservices to improve scalability and resilience.");
        table.insert("claude", DEFAULT_RESPONSE_KEY, "Hello, I'm Claude. I'm here to provide thoughtful and safe responses. How can I assist you today?");

        table.insert("chatgpt", "Content Writer", "Here is a draft for the social media post: 'Unleash your creativity with our new product! ✨ Transform your workflow and achieve more. #Innovation #Productivity'");
        table.insert("chatgpt", "Code Documentation Writer", "I have generated the documentation for the API endpoints you've created. It includes function descriptions, parameters, and return values in Markdown format.");
        table.insert("chatgpt", DEFAULT_RESPONSE_KEY, "Hi there! I'm ChatGPT, ready to help with a wide range of tasks. What's on your mind?");

        table.insert("grok", "Social Media Tone Analyst", "Okay, so the sentiment on Twitter is leaning sarcastic but positive. They love the idea but are making fun of the launch video. We should lean into the humor.");
        table.insert("grok", "User Feedback Summarizer", "After analyzing the latest user feedback, the key takeaway is that users love the new feature but find the UI confusing. They keep mentioning the 'blue button' is hard to find.");
        table.insert("grok", DEFAULT_RESPONSE_KEY, "Grok here. I've got access to real-time info and a bit of a rebellious streak. Ask me anything.");

        table
    }
}

impl Default for CannedResponses {
    fn default() -> Self {
        Self::preset()
    }
}

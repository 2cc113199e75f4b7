//! `@mention` parsing.

use crate::agent::Agent;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved mention that addresses every agent in scope.
pub const EVERYONE_TOKEN: &str = "everyone";

static MENTION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@([A-Za-z0-9_]+)").expect("mention pattern is valid"));

/// Extracts the lowercase tokens following `@` sigils, in order of first
/// appearance and without duplicates.
pub fn parse_mentions(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for capture in MENTION_PATTERN.captures_iter(text) {
        let token = capture[1].to_lowercase();
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

/// How a generation produces its replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// One orchestrator reply synthesized over the whole roster
    Combined,
    /// One reply per mentioned agent
    Targeted,
    /// One reply per agent in scope
    Broadcast,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Combined => "combined",
            GenerationMode::Targeted => "targeted",
            GenerationMode::Broadcast => "broadcast",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routing decision for one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// No mentions: the orchestrator answers for everyone.
    Combined,
    /// `@everyone` was present. It wins over any named mentions.
    Broadcast,
    /// Named mentions, lowercase, in order of appearance.
    Targeted(Vec<String>),
}

impl Route {
    pub fn from_text(text: &str) -> Self {
        let tokens = parse_mentions(text);
        if tokens.is_empty() {
            Route::Combined
        } else if tokens.iter().any(|t| t == EVERYONE_TOKEN) {
            Route::Broadcast
        } else {
            Route::Targeted(tokens)
        }
    }

    pub fn mode(&self) -> GenerationMode {
        match self {
            Route::Combined => GenerationMode::Combined,
            Route::Broadcast => GenerationMode::Broadcast,
            Route::Targeted(_) => GenerationMode::Targeted,
        }
    }

    /// Selects the agents that answer, in roster order.
    ///
    /// Combined routes select nobody: the orchestrator is not on the roster.
    /// Tokens that match no agent in scope are ignored, so a targeted route
    /// can select nobody as well.
    pub fn select(&self, roster: &[Agent]) -> Vec<Agent> {
        match self {
            Route::Combined => Vec::new(),
            Route::Broadcast => roster.to_vec(),
            Route::Targeted(tokens) => roster
                .iter()
                .filter(|agent| tokens.iter().any(|t| agent.answers_to(t)))
                .cloned()
                .collect(),
        }
    }
}

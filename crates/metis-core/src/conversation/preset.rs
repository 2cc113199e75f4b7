//! Seed conversations shipped with the application.

use super::context::ChatSummary;
use super::message::{Message, MessageSender, USER_SENDER_ID};
use std::collections::HashMap;

fn seeded(id: &str, sender_id: &str, timestamp: &str, text: &str) -> Message {
    let sender = if sender_id == USER_SENDER_ID {
        MessageSender::User
    } else {
        MessageSender::Agent
    };
    Message {
        id: id.to_string(),
        text: text.to_string(),
        sender,
        sender_id: sender_id.to_string(),
        timestamp: timestamp.to_string(),
    }
}

/// Past free-standing chats, most recent first.
pub fn get_seed_chats() -> Vec<ChatSummary> {
    [
        ("chat-1", "Brainstorming session Q3"),
        ("chat-2", "Initial draft for blog post"),
        ("chat-3", "Code review for new feature"),
    ]
    .into_iter()
    .map(|(id, title)| ChatSummary {
        id: id.to_string(),
        title: title.to_string(),
    })
    .collect()
}

/// Histories for the seed chats and project sub-conversations, keyed by
/// conversation id.
pub fn get_seed_histories() -> HashMap<String, Vec<Message>> {
    let mut histories = HashMap::new();

    histories.insert(
        "chat-1".to_string(),
        vec![
            seeded("c1m1", "user", "2023-10-26T10:00:00Z", "Hey everyone, let's start brainstorming for the Q3 marketing campaign. @claude what should be our main strategic focus?"),
            seeded("c1m2", "claude", "2023-10-26T10:01:00Z", "Considering the long-term goals, we should prioritize brand trust over immediate conversions. This involves a more educational content approach."),
            seeded("c1m3", "user", "2023-10-26T10:02:00Z", "Good point. @chatgpt can you draft some content ideas around that?"),
            seeded("c1m4", "chatgpt", "2023-10-26T10:03:00Z", "Here is a draft for the social media post: 'Unleash your creativity with our new product! ✨ Transform your workflow and achieve more. #Innovation #Productivity'"),
        ],
    );
    histories.insert(
        "chat-2".to_string(),
        vec![
            seeded("c2m1", "user", "2023-10-25T14:00:00Z", "I need to write a blog post about the future of AI. @chatgpt can you give me a starting point?"),
            seeded("c2m2", "chatgpt", "2023-10-25T14:01:00Z", "Of course. A good angle would be discussing the impact of multi-agent collaboration platforms. Here's an opening paragraph: \"The paradigm of artificial intelligence is shifting from single, monolithic models to a dynamic ecosystem of specialized agents working in concert...\""),
        ],
    );
    histories.insert(
        "proj-1-sc-1".to_string(),
        vec![
            seeded("p1s1m1", "user", "2023-10-27T09:00:00Z", "@gemini can you generate some image concepts for an Instagram post about our new product?"),
            seeded("p1s1m2", "gemini", "2023-10-27T09:01:00Z", "Certainly. I've generated three concepts focusing on a vibrant, minimalist aesthetic. Here is the first one."),
        ],
    );
    histories.insert(
        "proj-2-sc-1".to_string(),
        vec![
            seeded("p2s1m1", "user", "2023-10-28T11:00:00Z", "@claude can you review the proposed architecture for the new user authentication endpoint?"),
            seeded("p2s1m2", "claude", "2023-10-28T11:02:00Z", "The proposed architecture is solid, but I would suggest implementing a message queue for decoupling the microservices to improve scalability and resilience."),
        ],
    );

    histories
}

#![allow(dead_code)]

use async_trait::async_trait;
use futures::channel::mpsc;
use metis_application::{GenerationCoordinator, Transcript};
use metis_core::conversation::{ConversationStore, Message};
use metis_core::project::{AgentRole, Project};
use metis_core::{MetisError, Result};
use metis_infrastructure::InMemoryConversationStore;
use metis_interaction::{FragmentStream, LanguageModel};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub type FragmentSender = mpsc::UnboundedSender<Result<String>>;

/// Language model whose streams are fed by the test through channels.
///
/// Each `stream_generate` call takes the next queued stream; with nothing
/// queued the call fails like an unreachable service.
#[derive(Default)]
pub struct ScriptedModel {
    streams: Mutex<VecDeque<FragmentStream>>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedModel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues a stream and returns the sender that drives it.
    pub fn queue(&self) -> FragmentSender {
        let (tx, rx) = mpsc::unbounded();
        self.streams.lock().unwrap().push_back(Box::pin(rx));
        tx
    }

    /// Queues a stream that yields `fragments` and then ends.
    pub fn queue_reply(&self, fragments: &[&str]) {
        let tx = self.queue();
        for fragment in fragments {
            tx.unbounded_send(Ok(fragment.to_string())).unwrap();
        }
    }

    pub fn last_instruction(&self) -> Option<String> {
        self.calls.lock().unwrap().last().map(|(_, i)| i.clone())
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn stream_generate(&self, prompt: &str, system_instruction: &str) -> Result<FragmentStream> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), system_instruction.to_string()));
        self.streams
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| MetisError::upstream(Some(503), "UNAVAILABLE: scripted"))
    }
}

pub struct Harness {
    pub coordinator: Arc<GenerationCoordinator>,
    pub store: Arc<InMemoryConversationStore>,
    pub model: Arc<ScriptedModel>,
    pub transcript: Arc<Transcript>,
}

pub fn harness() -> Harness {
    let store = Arc::new(InMemoryConversationStore::new());
    let model = ScriptedModel::new();
    let transcript = Arc::new(Transcript::new());
    let coordinator = Arc::new(GenerationCoordinator::new(
        store.clone(),
        model.clone(),
        transcript.clone(),
    ));
    Harness {
        coordinator,
        store,
        model,
        transcript,
    }
}

pub fn reply(agent_id: &str, text: &str) -> Message {
    let mut message = Message::agent(agent_id);
    message.text = text.to_string();
    message
}

/// A project whose roster is exactly `roles`.
pub fn project_with(roles: &[(&str, &str)]) -> Project {
    let mut project = Project::create("Test Project", &[]).unwrap();
    project
        .set_roles(
            roles
                .iter()
                .map(|(agent_id, role)| AgentRole::new(*agent_id, *role))
                .collect(),
        )
        .unwrap();
    project
}

pub async fn stored(store: &InMemoryConversationStore, conversation_id: &str) -> Vec<Message> {
    store.read(conversation_id).await.unwrap()
}

pub fn senders(messages: &[Message]) -> Vec<String> {
    messages.iter().map(|m| m.sender_id.clone()).collect()
}

//! Chat session: the upward API of the engine.
//!
//! Owns which conversation is open, the list of free-standing chats, and
//! wires user actions (send, edit, stop, switch) to the generation
//! coordinator.

use crate::coordinator::{GenerationCoordinator, GenerationOutcome, HistorySnapshot};
use crate::history_editor::truncate_for_edit;
use crate::transcript::{Transcript, TranscriptView};
use metis_core::agent::Agent;
use metis_core::conversation::{
    ChatSummary, ConversationContext, ConversationStore, Message, get_seed_chats,
};
use metis_core::project::{AgentRole, Project, ProjectRepository};
use metis_core::{MetisError, Result};
use std::sync::Arc;
use tokio::sync::{RwLock, watch};

/// Result of [`ChatSession::send_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, or a generation is already responding.
    Ignored,
    Generated {
        conversation_id: String,
        user_message: Message,
        outcome: GenerationOutcome,
    },
}

/// Result of [`ChatSession::edit_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// No open conversation, or no user message with that id.
    MissingTarget,
    Regenerated {
        edited_message: Message,
        dropped: usize,
        outcome: GenerationOutcome,
    },
}

#[derive(Debug, Default)]
struct SessionState {
    active: Option<ConversationContext>,
    /// Most recent first
    chats: Vec<ChatSummary>,
}

pub struct ChatSession {
    coordinator: Arc<GenerationCoordinator>,
    store: Arc<dyn ConversationStore>,
    projects: Arc<dyn ProjectRepository>,
    state: RwLock<SessionState>,
}

impl ChatSession {
    /// Creates a session with the seed chat list and nothing open.
    pub fn new(
        coordinator: Arc<GenerationCoordinator>,
        store: Arc<dyn ConversationStore>,
        projects: Arc<dyn ProjectRepository>,
    ) -> Self {
        Self {
            coordinator,
            store,
            projects,
            state: RwLock::new(SessionState {
                active: None,
                chats: get_seed_chats(),
            }),
        }
    }

    pub fn agents(&self) -> &[Agent] {
        self.coordinator.agents()
    }

    pub fn transcript(&self) -> &Arc<Transcript> {
        self.coordinator.transcript()
    }

    pub fn subscribe_transcript(&self) -> watch::Receiver<TranscriptView> {
        self.transcript().subscribe()
    }

    pub fn subscribe_responding(&self) -> watch::Receiver<bool> {
        self.coordinator.subscribe_responding()
    }

    pub fn is_responding(&self) -> bool {
        self.coordinator.is_responding()
    }

    pub async fn active_context(&self) -> Option<ConversationContext> {
        self.state.read().await.active.clone()
    }

    // ============================================================================
    // Turns
    // ============================================================================

    /// Appends a user message to the open conversation and generates the
    /// replies. With nothing open, a new chat titled after `text` is created.
    pub async fn send_message(&self, text: &str) -> Result<SendOutcome> {
        if text.trim().is_empty() {
            return Ok(SendOutcome::Ignored);
        }
        // Claimed before any store I/O so a second send cannot slip past.
        let Some(token) = self.coordinator.try_begin() else {
            return Ok(SendOutcome::Ignored);
        };

        let context = self.active_or_new_chat(text).await;
        let conversation_id = context.conversation_id.clone();

        let user_message = Message::user(text);
        let history = match self.commit_user_message(&conversation_id, &user_message).await {
            Ok(history) => history,
            Err(err) => {
                self.coordinator.stop();
                return Err(err);
            }
        };
        self.transcript().push(&conversation_id, user_message.clone());

        let outcome = self
            .coordinator
            .run(token, &context, text, HistorySnapshot::appending(history))
            .await?;

        Ok(SendOutcome::Generated {
            conversation_id,
            user_message,
            outcome,
        })
    }

    async fn commit_user_message(
        &self,
        conversation_id: &str,
        user_message: &Message,
    ) -> Result<Vec<Message>> {
        let mut history = self.store.read(conversation_id).await?;
        history.push(user_message.clone());
        self.store.write(conversation_id, &history).await?;
        Ok(history)
    }

    /// Replaces a user message's text and regenerates its replies in place.
    ///
    /// Whatever is in flight is superseded before the truncated history is
    /// written, so a stale commit cannot land on top of the edit.
    pub async fn edit_message(&self, message_id: &str, new_text: &str) -> Result<EditOutcome> {
        let Some(context) = self.active_context().await else {
            return Ok(EditOutcome::MissingTarget);
        };
        let conversation_id = context.conversation_id.as_str();

        let messages = self.store.read(conversation_id).await?;
        let Some(plan) = truncate_for_edit(&messages, message_id, new_text) else {
            tracing::debug!(conversation_id, message_id, "edit target not found");
            return Ok(EditOutcome::MissingTarget);
        };

        let token = self.coordinator.begin();
        if let Err(err) = self.store.write(conversation_id, &plan.history).await {
            self.coordinator.stop();
            return Err(err);
        }
        self.transcript()
            .refresh(conversation_id, plan.history.clone());
        tracing::info!(
            conversation_id,
            message_id,
            dropped = plan.dropped,
            "message edited"
        );

        let edited_message = plan.edited_message().clone();
        let outcome = self
            .coordinator
            .run(
                token,
                &context,
                new_text,
                HistorySnapshot::at(plan.history, plan.insert_at),
            )
            .await?;

        Ok(EditOutcome::Regenerated {
            edited_message,
            dropped: plan.dropped,
            outcome,
        })
    }

    pub fn stop_generation(&self) {
        self.coordinator.stop();
    }

    // ============================================================================
    // Conversation switching
    // ============================================================================

    pub async fn chats(&self) -> Vec<ChatSummary> {
        self.state.read().await.chats.clone()
    }

    /// Opens a free-standing chat.
    pub async fn open_chat(&self, chat_id: &str) -> Result<()> {
        if !self.state.read().await.chats.iter().any(|c| c.id == chat_id) {
            return Err(MetisError::not_found("Chat", chat_id));
        }
        self.open(ConversationContext::chat(chat_id)).await
    }

    /// Opens a project sub-conversation, the first one when none is given.
    pub async fn open_project_thread(
        &self,
        project_id: &str,
        sub_conversation_id: Option<&str>,
    ) -> Result<()> {
        let project = self.find_project(project_id).await?;
        let sub_conversation = match sub_conversation_id {
            Some(id) => project
                .sub_conversation(id)
                .ok_or_else(|| MetisError::not_found("SubConversation", id))?,
            None => project.sub_conversations.first().ok_or_else(|| {
                MetisError::validation(format!("project '{project_id}' has no conversations"))
            })?,
        };
        let sub_conversation_id = sub_conversation.id.clone();
        self.open(ConversationContext::project_thread(project, sub_conversation_id))
            .await
    }

    /// Closes the open conversation; the next send starts a new chat.
    pub async fn new_chat(&self) {
        self.state.write().await.active = None;
        self.transcript().show(None, Vec::new());
    }

    pub async fn rename_chat(&self, chat_id: &str, title: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(MetisError::validation("chat title cannot be empty"));
        }
        let mut state = self.state.write().await;
        let chat = state
            .chats
            .iter_mut()
            .find(|c| c.id == chat_id)
            .ok_or_else(|| MetisError::not_found("Chat", chat_id))?;
        chat.title = title.to_string();
        Ok(())
    }

    async fn open(&self, context: ConversationContext) -> Result<()> {
        let messages = self.store.read(&context.conversation_id).await?;
        self.transcript()
            .show(Some(context.conversation_id.clone()), messages);
        tracing::debug!(conversation_id = %context.conversation_id, "conversation opened");
        self.state.write().await.active = Some(context);
        Ok(())
    }

    async fn active_or_new_chat(&self, first_message: &str) -> ConversationContext {
        let mut state = self.state.write().await;
        if let Some(active) = &state.active {
            return active.clone();
        }

        let chat = ChatSummary::start(first_message);
        tracing::info!(chat_id = %chat.id, title = %chat.title, "chat created");
        let context = ConversationContext::chat(chat.id.clone());
        self.transcript()
            .show(Some(chat.id.clone()), Vec::new());
        state.chats.insert(0, chat);
        state.active = Some(context.clone());
        context
    }

    // ============================================================================
    // Projects
    // ============================================================================

    pub async fn projects(&self) -> Result<Vec<Project>> {
        self.projects.list_all().await
    }

    /// Creates a project whose agents all start with the default role.
    pub async fn create_project(&self, name: &str, agent_ids: &[String]) -> Result<Project> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MetisError::validation("project name cannot be empty"));
        }
        self.ensure_known_agents(agent_ids.iter().map(String::as_str))?;

        let project = Project::create(name, agent_ids)?;
        self.projects.save(&project).await?;
        tracing::info!(project_id = %project.id, agents = agent_ids.len(), "project created");
        Ok(project)
    }

    pub async fn add_agents_to_project(
        &self,
        project_id: &str,
        agent_ids: &[String],
    ) -> Result<Project> {
        self.ensure_known_agents(agent_ids.iter().map(String::as_str))?;
        let mut project = self.find_project(project_id).await?;
        project.add_agents(agent_ids);
        self.save_project(project).await
    }

    /// Replaces every role of a project at once.
    pub async fn set_project_roles(
        &self,
        project_id: &str,
        roles: Vec<AgentRole>,
    ) -> Result<Project> {
        self.ensure_known_agents(roles.iter().map(|r| r.agent_id.as_str()))?;
        let mut project = self.find_project(project_id).await?;
        project.set_roles(roles)?;
        self.save_project(project).await
    }

    async fn find_project(&self, project_id: &str) -> Result<Project> {
        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| MetisError::not_found("Project", project_id))
    }

    /// Saves a project and refreshes the open conversation's copy, so the
    /// next turn sees the new roster.
    async fn save_project(&self, project: Project) -> Result<Project> {
        self.projects.save(&project).await?;

        let mut state = self.state.write().await;
        if let Some(active) = state.active.as_mut() {
            if active.project.as_ref().is_some_and(|p| p.id == project.id) {
                active.project = Some(project.clone());
            }
        }
        tracing::debug!(project_id = %project.id, roles = project.roles.len(), "project updated");
        Ok(project)
    }

    fn ensure_known_agents<'a>(&self, agent_ids: impl IntoIterator<Item = &'a str>) -> Result<()> {
        for agent_id in agent_ids {
            if !self.agents().iter().any(|a| a.id == agent_id) {
                return Err(MetisError::not_found("Agent", agent_id));
            }
        }
        Ok(())
    }
}

//! Generation coordinator.
//!
//! Turns one user message into agent replies: routes it, streams the replies
//! into live transcript messages, and commits the finished replies to the
//! conversation store in a single full-snapshot write. Every step checks the
//! generation's liveness token; a superseded generation stops without any
//! further side effect.

use crate::generation::{Generation, GenerationCounter, LivenessToken};
use crate::transcript::Transcript;
use futures::StreamExt;
use futures::future::join_all;
use metis_core::Result;
use metis_core::agent::{Agent, ORCHESTRATOR_AGENT_ID, get_default_agents};
use metis_core::config::EngineConfig;
use metis_core::conversation::{ConversationContext, ConversationStore, Message};
use metis_core::response::CannedResponses;
use metis_core::routing::{
    GenerationMode, Route, agents_in_scope, build_orchestrator_instruction, response_key,
};
use metis_core::MetisError;
use metis_interaction::{LanguageModel, ResponseSource, StreamedSource, SyntheticSource};
use std::sync::Arc;
use tokio::sync::watch;

/// The stored history a generation starts from, and where its replies go.
///
/// Replies are spliced in at `insert_at`; messages after that point (if any)
/// are kept after the replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySnapshot {
    pub messages: Vec<Message>,
    pub insert_at: usize,
}

impl HistorySnapshot {
    /// Replies go after the last message.
    pub fn appending(messages: Vec<Message>) -> Self {
        let insert_at = messages.len();
        Self {
            messages,
            insert_at,
        }
    }

    /// Replies go at `insert_at` (clamped to the history length).
    pub fn at(messages: Vec<Message>, insert_at: usize) -> Self {
        let insert_at = insert_at.min(messages.len());
        Self {
            messages,
            insert_at,
        }
    }

    /// The message the replies answer, if any.
    pub fn anchor(&self) -> Option<&Message> {
        self.insert_at
            .checked_sub(1)
            .and_then(|index| self.messages.get(index))
    }

    /// The full history after committing `replies`.
    pub fn with_replies(&self, replies: &[Message]) -> Vec<Message> {
        let (before, after) = self.messages.split_at(self.insert_at);
        let mut history = Vec::with_capacity(self.messages.len() + replies.len());
        history.extend_from_slice(before);
        history.extend_from_slice(replies);
        history.extend_from_slice(after);
        history
    }
}

/// How a generation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Replies were written to the store.
    Committed {
        generation_id: u64,
        replies: Vec<Message>,
    },
    /// The route selected no agent; nothing was shown or stored.
    NoRecipients { generation_id: u64 },
    /// A newer generation or a stop took over; nothing was stored.
    Superseded { generation_id: u64 },
}

impl GenerationOutcome {
    pub fn generation_id(&self) -> u64 {
        match self {
            GenerationOutcome::Committed { generation_id, .. }
            | GenerationOutcome::NoRecipients { generation_id }
            | GenerationOutcome::Superseded { generation_id } => *generation_id,
        }
    }

    pub fn replies(&self) -> &[Message] {
        match self {
            GenerationOutcome::Committed { replies, .. } => replies,
            _ => &[],
        }
    }
}

enum StreamEnd {
    Finished,
    Failed(MetisError),
    Superseded,
}

pub struct GenerationCoordinator {
    counter: GenerationCounter,
    responding: watch::Sender<bool>,
    transcript: Arc<Transcript>,
    store: Arc<dyn ConversationStore>,
    model: Arc<dyn LanguageModel>,
    agents: Vec<Agent>,
    canned: CannedResponses,
    engine: EngineConfig,
}

impl GenerationCoordinator {
    /// Creates a coordinator over the preset agents and canned replies with
    /// default engine timing.
    pub fn new(
        store: Arc<dyn ConversationStore>,
        model: Arc<dyn LanguageModel>,
        transcript: Arc<Transcript>,
    ) -> Self {
        let (responding, _) = watch::channel(false);
        Self {
            counter: GenerationCounter::new(),
            responding,
            transcript,
            store,
            model,
            agents: get_default_agents(),
            canned: CannedResponses::preset(),
            engine: EngineConfig::default(),
        }
    }

    pub fn with_agents(mut self, agents: Vec<Agent>) -> Self {
        self.agents = agents;
        self
    }

    pub fn with_canned_responses(mut self, canned: CannedResponses) -> Self {
        self.canned = canned;
        self
    }

    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn transcript(&self) -> &Arc<Transcript> {
        &self.transcript
    }

    pub fn is_responding(&self) -> bool {
        *self.responding.borrow()
    }

    pub fn subscribe_responding(&self) -> watch::Receiver<bool> {
        self.responding.subscribe()
    }

    /// Mints a new generation, invalidating whatever was in flight, and
    /// marks the engine as responding.
    pub fn begin(&self) -> LivenessToken {
        let token = self.counter.mint();
        self.responding.send_replace(true);
        token
    }

    /// Like [`Self::begin`], but only when no generation is responding.
    ///
    /// Checking and raising the flag happen under one lock, so of two
    /// concurrent callers exactly one gets a token.
    pub fn try_begin(&self) -> Option<LivenessToken> {
        let claimed = self.responding.send_if_modified(|responding| {
            if *responding {
                return false;
            }
            *responding = true;
            true
        });
        claimed.then(|| self.counter.mint())
    }

    /// Cancels the current generation. Its partial text stays visible but is
    /// never committed.
    pub fn stop(&self) {
        let superseded = self.counter.bump() - 1;
        self.responding.send_replace(false);
        tracing::info!(generation_id = superseded, "generation stopped");
    }

    /// Starts a generation for `trigger` and runs it to the end.
    pub async fn generate(
        &self,
        context: &ConversationContext,
        trigger: &str,
        snapshot: HistorySnapshot,
    ) -> Result<GenerationOutcome> {
        let token = self.begin();
        self.run(token, context, trigger, snapshot).await
    }

    /// Runs a generation whose token was obtained from [`Self::begin`].
    pub async fn run(
        &self,
        token: LivenessToken,
        context: &ConversationContext,
        trigger: &str,
        snapshot: HistorySnapshot,
    ) -> Result<GenerationOutcome> {
        let route = Route::from_text(trigger);
        let generation = Generation {
            id: token.id(),
            conversation_id: context.conversation_id.clone(),
            mode: route.mode(),
        };
        let roster = agents_in_scope(&self.agents, context.project.as_ref());

        tracing::info!(
            generation_id = generation.id,
            conversation_id = %generation.conversation_id,
            mode = %generation.mode,
            roster_size = roster.len(),
            "generation started"
        );

        match generation.mode {
            GenerationMode::Combined => {
                self.run_combined(&token, &generation, context, &roster, trigger, snapshot)
                    .await
            }
            GenerationMode::Targeted | GenerationMode::Broadcast => {
                let selected = route.select(&roster);
                if selected.is_empty() {
                    tracing::info!(generation_id = generation.id, "no agent matched the mentions");
                    self.settle(&token);
                    return Ok(GenerationOutcome::NoRecipients {
                        generation_id: generation.id,
                    });
                }
                self.run_targeted(&token, &generation, context, &selected, snapshot)
                    .await
            }
        }
    }

    async fn run_combined(
        &self,
        token: &LivenessToken,
        generation: &Generation,
        context: &ConversationContext,
        roster: &[Agent],
        trigger: &str,
        snapshot: HistorySnapshot,
    ) -> Result<GenerationOutcome> {
        let conversation_id = generation.conversation_id.as_str();
        let instruction = build_orchestrator_instruction(
            &self.engine.orchestrator_name,
            roster,
            context.project.as_ref(),
        );

        let mut live = Message::agent(ORCHESTRATOR_AGENT_ID);
        self.show_live(conversation_id, &snapshot, 0, live.clone());

        let source = StreamedSource::new(self.model.clone(), trigger, instruction);
        match self.drive(token, &source, conversation_id, &mut live).await {
            StreamEnd::Finished => {}
            StreamEnd::Superseded => return Ok(self.superseded(generation)),
            StreamEnd::Failed(err) => {
                if !token.is_live() {
                    return Ok(self.superseded(generation));
                }
                tracing::warn!(
                    generation_id = generation.id,
                    error = %err,
                    "combined response failed, committing fallback"
                );
                live.text = self.engine.combined_fallback_message.clone();
                self.transcript
                    .set_text(conversation_id, &live.id, &live.text);
            }
        }

        self.commit(token, generation, &snapshot, vec![live]).await
    }

    async fn run_targeted(
        &self,
        token: &LivenessToken,
        generation: &Generation,
        context: &ConversationContext,
        selected: &[Agent],
        snapshot: HistorySnapshot,
    ) -> Result<GenerationOutcome> {
        let conversation_id = generation.conversation_id.as_str();
        let project = context.project.as_ref();
        let snapshot_ref = &snapshot;

        let replies = selected.iter().enumerate().map(|(index, agent)| {
            let source = SyntheticSource::canned(
                &self.canned,
                &agent.id,
                response_key(agent, project),
                self.engine.char_interval(),
            );
            let delay = self.engine.stagger_delay(index);

            async move {
                tokio::select! {
                    biased;
                    _ = token.superseded() => return None,
                    _ = tokio::time::sleep(delay) => {}
                }
                if !token.is_live() {
                    return None;
                }

                let mut live = Message::agent(&agent.id);
                self.show_live(conversation_id, snapshot_ref, index, live.clone());
                tracing::debug!(
                    generation_id = generation.id,
                    agent_id = %agent.id,
                    "agent reply started"
                );

                match self.drive(token, &source, conversation_id, &mut live).await {
                    StreamEnd::Finished => Some(live),
                    StreamEnd::Superseded => None,
                    StreamEnd::Failed(err) => {
                        tracing::warn!(agent_id = %agent.id, error = %err, "agent reply failed");
                        None
                    }
                }
            }
        });

        let finished = tokio::select! {
            finished = join_all(replies) => finished,
            _ = token.superseded() => return Ok(self.superseded(generation)),
        };

        // join_all preserves input order, so replies stay in dispatch order.
        let replies: Vec<Message> = finished.into_iter().flatten().collect();
        self.commit(token, generation, &snapshot, replies).await
    }

    /// Places a live reply `offset` places after the message it answers.
    fn show_live(
        &self,
        conversation_id: &str,
        snapshot: &HistorySnapshot,
        offset: usize,
        live: Message,
    ) {
        match snapshot.anchor() {
            Some(anchor) => self
                .transcript
                .insert_after(conversation_id, &anchor.id, offset, live),
            None => self
                .transcript
                .insert(conversation_id, snapshot.insert_at + offset, live),
        };
    }

    /// Pumps one source into a live message until it ends or the
    /// generation is superseded.
    async fn drive(
        &self,
        token: &LivenessToken,
        source: &dyn ResponseSource,
        conversation_id: &str,
        live: &mut Message,
    ) -> StreamEnd {
        let mut fragments = tokio::select! {
            biased;
            _ = token.superseded() => return StreamEnd::Superseded,
            opened = source.open() => match opened {
                Ok(fragments) => fragments,
                Err(err) => return StreamEnd::Failed(err),
            },
        };

        loop {
            let next = tokio::select! {
                biased;
                _ = token.superseded() => return StreamEnd::Superseded,
                next = fragments.next() => next,
            };

            match next {
                Some(Ok(fragment)) => {
                    if !token.is_live() {
                        return StreamEnd::Superseded;
                    }
                    live.text.push_str(&fragment);
                    self.transcript
                        .append_text(conversation_id, &live.id, &fragment);
                }
                Some(Err(err)) => return StreamEnd::Failed(err),
                None => return StreamEnd::Finished,
            }
        }
    }

    async fn commit(
        &self,
        token: &LivenessToken,
        generation: &Generation,
        snapshot: &HistorySnapshot,
        replies: Vec<Message>,
    ) -> Result<GenerationOutcome> {
        let history = snapshot.with_replies(&replies);

        if !token.is_live() {
            return Ok(self.superseded(generation));
        }
        if let Err(err) = self.store.write(&generation.conversation_id, &history).await {
            tracing::error!(
                generation_id = generation.id,
                conversation_id = %generation.conversation_id,
                error = %err,
                "failed to commit replies"
            );
            self.settle(token);
            return Err(err);
        }

        self.transcript.refresh(&generation.conversation_id, history);
        self.settle(token);

        tracing::info!(
            generation_id = generation.id,
            conversation_id = %generation.conversation_id,
            replies = replies.len(),
            "generation committed"
        );
        Ok(GenerationOutcome::Committed {
            generation_id: generation.id,
            replies,
        })
    }

    fn settle(&self, token: &LivenessToken) {
        if token.is_live() {
            self.responding.send_replace(false);
        }
    }

    fn superseded(&self, generation: &Generation) -> GenerationOutcome {
        tracing::debug!(generation_id = generation.id, "generation superseded");
        GenerationOutcome::Superseded {
            generation_id: generation.id,
        }
    }
}

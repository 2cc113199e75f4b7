mod common;

use common::{harness, project_with, senders, stored};
use metis_application::{GenerationOutcome, HistorySnapshot};
use metis_core::config::DEFAULT_COMBINED_FALLBACK;
use metis_core::conversation::{ConversationContext, ConversationStore, Message};
use metis_core::response::CannedResponses;
use std::time::Duration;
use tokio::time::Instant;

fn open(h: &common::Harness, conversation_id: &str, messages: &[Message]) -> HistorySnapshot {
    h.transcript
        .show(Some(conversation_id.to_string()), messages.to_vec());
    HistorySnapshot::appending(messages.to_vec())
}

#[tokio::test(start_paused = true)]
async fn no_mentions_commits_one_orchestrator_message() {
    let h = harness();
    h.model.queue_reply(&["Hi ", "there"]);
    let project = project_with(&[("gemini", "Analyst"), ("claude", "Reviewer")]);
    let context = ConversationContext::project_thread(project, "p-sc-1");
    let history = vec![Message::user("hello")];

    let outcome = h
        .coordinator
        .generate(&context, "hello", open(&h, "p-sc-1", &history))
        .await
        .unwrap();

    let replies = match outcome {
        GenerationOutcome::Committed { replies, .. } => replies,
        other => panic!("expected a commit, got {other:?}"),
    };
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].sender_id, "metisium");
    assert_eq!(replies[0].text, "Hi there");

    let saved = stored(&h.store, "p-sc-1").await;
    assert_eq!(saved, vec![history[0].clone(), replies[0].clone()]);
    assert_eq!(h.transcript.snapshot().messages, saved);
    assert!(!h.coordinator.is_responding());

    let instruction = h.model.last_instruction().unwrap();
    assert!(instruction.contains("- Gemini: Analyst\n- Claude: Reviewer"));
    assert!(!instruction.contains("Grok"));
}

#[tokio::test(start_paused = true)]
async fn upstream_failure_commits_fallback_instead_of_partial_text() {
    let h = harness();
    let tx = h.model.queue();
    tx.unbounded_send(Ok("Partial answ".to_string())).unwrap();
    tx.unbounded_send(Err(metis_core::MetisError::upstream(None, "reset")))
        .unwrap();
    let context = ConversationContext::chat("chat-1");

    let outcome = h
        .coordinator
        .generate(&context, "hello", open(&h, "chat-1", &[]))
        .await
        .unwrap();

    assert_eq!(outcome.replies().len(), 1);
    assert_eq!(outcome.replies()[0].text, DEFAULT_COMBINED_FALLBACK);
    assert_eq!(stored(&h.store, "chat-1").await, outcome.replies());
}

#[tokio::test(start_paused = true)]
async fn unreachable_model_also_falls_back() {
    let h = harness();
    let context = ConversationContext::chat("chat-1");

    let outcome = h
        .coordinator
        .generate(&context, "hello", open(&h, "chat-1", &[]))
        .await
        .unwrap();

    assert_eq!(outcome.replies()[0].text, DEFAULT_COMBINED_FALLBACK);
    assert!(outcome.replies()[0].is_from_orchestrator());
}

#[tokio::test(start_paused = true)]
async fn targeted_reply_uses_project_role_text() {
    let h = harness();
    let project = project_with(&[("gemini", "Image Generator & Data Analyst"), ("claude", "Strategic Advisor")]);
    let context = ConversationContext::project_thread(project, "p-sc-1");
    let start = Instant::now();

    let outcome = h
        .coordinator
        .generate(&context, "@claude review this", open(&h, "p-sc-1", &[]))
        .await
        .unwrap();

    let expected = CannedResponses::preset()
        .lookup("claude", "Strategic Advisor")
        .to_string();
    assert_eq!(senders(outcome.replies()), vec!["claude"]);
    assert_eq!(outcome.replies()[0].text, expected);

    // 1000 ms stagger, then one character per 30 ms tick
    let ticks = expected.chars().count() as u64;
    assert_eq!(start.elapsed(), Duration::from_millis(1000 + 30 * ticks));
}

#[tokio::test(start_paused = true)]
async fn unknown_role_falls_back_to_default_reply() {
    let h = harness();
    let project = project_with(&[("grok", "Chief Vibes Officer")]);
    let context = ConversationContext::project_thread(project, "p-sc-1");

    let outcome = h
        .coordinator
        .generate(&context, "@grok hi", open(&h, "p-sc-1", &[]))
        .await
        .unwrap();

    assert_eq!(
        outcome.replies()[0].text,
        CannedResponses::preset().lookup("grok", "default")
    );
}

#[tokio::test(start_paused = true)]
async fn everyone_broadcasts_with_increasing_stagger_in_roster_order() {
    let h = harness();
    let project = project_with(&[("gemini", "Analyst"), ("claude", "Reviewer")]);
    let context = ConversationContext::project_thread(project, "p-sc-1");
    let snapshot = open(&h, "p-sc-1", &[]);

    let mut view = h.transcript.subscribe();
    let watcher = tokio::spawn(async move {
        let start = Instant::now();
        let mut first_seen: Vec<(String, Duration)> = Vec::new();
        while view.changed().await.is_ok() {
            let messages = view.borrow_and_update().messages.clone();
            for message in messages {
                if !first_seen.iter().any(|(id, _)| *id == message.sender_id) {
                    first_seen.push((message.sender_id, start.elapsed()));
                }
            }
            if first_seen.len() == 2 {
                break;
            }
        }
        first_seen
    });

    let coordinator = h.coordinator.clone();
    let outcome = coordinator
        .generate(&context, "@everyone @claude status?", snapshot)
        .await
        .unwrap();

    assert_eq!(senders(outcome.replies()), vec!["gemini", "claude"]);
    assert_eq!(senders(&stored(&h.store, "p-sc-1").await), vec!["gemini", "claude"]);

    let first_seen = watcher.await.unwrap();
    assert_eq!(
        first_seen,
        vec![
            ("gemini".to_string(), Duration::from_millis(1000)),
            ("claude".to_string(), Duration::from_millis(1500)),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn everyone_in_free_chat_reaches_whole_catalog() {
    let h = harness();
    let context = ConversationContext::chat("chat-9");

    let outcome = h
        .coordinator
        .generate(&context, "@EveryOne roll call", open(&h, "chat-9", &[]))
        .await
        .unwrap();

    assert_eq!(
        senders(outcome.replies()),
        vec!["gemini", "claude", "chatgpt", "grok"]
    );
}

#[tokio::test(start_paused = true)]
async fn unmatched_mentions_are_a_silent_no_op() {
    let h = harness();
    let project = project_with(&[("gemini", "Analyst")]);
    let context = ConversationContext::project_thread(project, "p-sc-1");
    let history = vec![Message::user("@grok are you there?")];

    let outcome = h
        .coordinator
        .generate(&context, "@grok are you there?", open(&h, "p-sc-1", &history))
        .await
        .unwrap();

    assert!(matches!(outcome, GenerationOutcome::NoRecipients { .. }));
    assert_eq!(h.transcript.snapshot().messages, history);
    assert!(stored(&h.store, "p-sc-1").await.is_empty());
    assert!(!h.coordinator.is_responding());
}

#[tokio::test(start_paused = true)]
async fn stopping_combined_stream_freezes_text_and_skips_commit() {
    let h = harness();
    let tx = h.model.queue();
    let context = ConversationContext::chat("chat-1");
    let history = vec![Message::user("hello")];
    let snapshot = open(&h, "chat-1", &history);
    h.store.write("chat-1", &history).await.unwrap();

    let coordinator = h.coordinator.clone();
    let task = tokio::spawn(async move { coordinator.generate(&context, "hello", snapshot).await });

    tx.unbounded_send(Ok("Hel".to_string())).unwrap();
    let mut view = h.transcript.subscribe();
    view.wait_for(|v| v.messages.iter().any(|m| m.text == "Hel"))
        .await
        .unwrap();
    assert!(h.coordinator.is_responding());

    h.coordinator.stop();
    assert!(!h.coordinator.is_responding());
    let _ = tx.unbounded_send(Ok("lo".to_string()));

    let outcome = task.await.unwrap().unwrap();
    assert!(matches!(outcome, GenerationOutcome::Superseded { .. }));

    let texts: Vec<String> = h
        .transcript
        .snapshot()
        .messages
        .into_iter()
        .map(|m| m.text)
        .collect();
    assert_eq!(texts, vec!["hello", "Hel"]);
    assert_eq!(stored(&h.store, "chat-1").await, history);
}

#[tokio::test(start_paused = true)]
async fn stopping_targeted_stream_freezes_text_and_skips_commit() {
    let h = harness();
    let context = ConversationContext::chat("chat-1");
    let snapshot = open(&h, "chat-1", &[]);

    let coordinator = h.coordinator.clone();
    let task = tokio::spawn(async move {
        coordinator
            .generate(&context, "@gemini @claude go", snapshot)
            .await
    });

    // Gemini has streamed for a while, Claude has not started yet.
    tokio::time::sleep(Duration::from_millis(1100)).await;
    h.coordinator.stop();
    let frozen = h.transcript.snapshot();
    assert_eq!(senders(&frozen.messages), vec!["gemini"]);
    assert!(!frozen.messages[0].text.is_empty());

    tokio::time::sleep(Duration::from_secs(10)).await;
    let outcome = task.await.unwrap().unwrap();

    assert!(matches!(outcome, GenerationOutcome::Superseded { .. }));
    assert_eq!(h.transcript.snapshot(), frozen);
    assert!(stored(&h.store, "chat-1").await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn newer_generation_supersedes_older_one() {
    let h = harness();
    let context = ConversationContext::chat("chat-1");
    let first_snapshot = open(&h, "chat-1", &[]);

    let coordinator = h.coordinator.clone();
    let first_context = context.clone();
    let first = tokio::spawn(async move {
        coordinator
            .generate(&first_context, "@grok first", first_snapshot)
            .await
    });
    tokio::time::sleep(Duration::from_millis(1200)).await;

    let second = h
        .coordinator
        .generate(&context, "@claude second", HistorySnapshot::appending(Vec::new()))
        .await
        .unwrap();

    let first = first.await.unwrap().unwrap();
    assert!(matches!(first, GenerationOutcome::Superseded { .. }));
    assert!(second.generation_id() > first.generation_id());
    assert_eq!(senders(&stored(&h.store, "chat-1").await), vec!["claude"]);
    assert!(!h.coordinator.is_responding());
}

#[tokio::test(start_paused = true)]
async fn live_updates_skip_a_conversation_no_longer_shown() {
    let h = harness();
    h.model.queue_reply(&["answer"]);
    let context = ConversationContext::chat("chat-1");
    let snapshot = open(&h, "chat-1", &[]);

    h.transcript.show(Some("chat-2".to_string()), Vec::new());
    let outcome = h
        .coordinator
        .generate(&context, "hello", snapshot)
        .await
        .unwrap();

    // The commit still lands in the store of the generation's conversation.
    assert_eq!(stored(&h.store, "chat-1").await, outcome.replies());
    let view = h.transcript.snapshot();
    assert_eq!(view.conversation_id.as_deref(), Some("chat-2"));
    assert!(view.messages.is_empty());
}

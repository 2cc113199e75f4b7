use metis_core::conversation::{ConversationStore, Message};
use metis_infrastructure::{MetisPaths, TomlConversationStore};
use tempfile::TempDir;

fn agent_reply(agent_id: &str, text: &str) -> Message {
    let mut message = Message::agent(agent_id);
    message.text = text.to_string();
    message
}

#[tokio::test]
async fn conversation_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let paths = MetisPaths::new(Some(dir.path())).unwrap();

    let history = vec![
        Message::user("@claude draft the plan"),
        agent_reply("claude", "Here is a multi-line\nplan with \"quotes\"."),
    ];

    {
        let store = TomlConversationStore::new(paths.conversations_dir()).unwrap();
        store.write("chat-42", &history).await.unwrap();
    }

    let reopened = TomlConversationStore::new(paths.conversations_dir()).unwrap();
    assert_eq!(reopened.read("chat-42").await.unwrap(), history);
    assert!(paths.conversations_dir().join("chat-42.toml").exists());
}

#[tokio::test]
async fn repeated_write_of_same_snapshot_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = TomlConversationStore::new(dir.path()).unwrap();
    let history = vec![Message::user("hello"), agent_reply("metisium", "hi")];

    store.write("chat-1", &history).await.unwrap();
    let first = std::fs::read_to_string(dir.path().join("chat-1.toml")).unwrap();
    store.write("chat-1", &history).await.unwrap();
    let second = std::fs::read_to_string(dir.path().join("chat-1.toml")).unwrap();

    assert_eq!(first, second);
    assert_eq!(store.read("chat-1").await.unwrap(), history);
}

#[tokio::test]
async fn empty_snapshot_clears_conversation() {
    let dir = TempDir::new().unwrap();
    let store = TomlConversationStore::new(dir.path()).unwrap();

    store.write("chat-1", &[Message::user("x")]).await.unwrap();
    store.write("chat-1", &[]).await.unwrap();

    assert!(store.read("chat-1").await.unwrap().is_empty());
}

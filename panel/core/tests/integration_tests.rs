//! Integration tests for the chat panel
//!
//! These tests drive the public API the way a surface would:
//! - A full conversation over the in-process transport
//! - Transport failures during send
//! - Panel lifecycle (Escape, reopen)
//! - Preferences shared by the sidebar and the panel, backed by a file
//! - TOML configuration feeding the transport and the store

use std::io::Write;

use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::{NamedTempFile, TempDir};

use chat_panel_core::config::{load_config_with_env, ConfigOverrides, ConfigSource};
use chat_panel_core::panel::resolve_client_id;
use chat_panel_core::store::{SIDEBAR_COLLAPSED_KEY, USER_PROFILE_KEY};
use chat_panel_core::{
    AgentInfo, ChatPanel, ContentKind, ContentType, FileAttachment, FileStore, InProcessPeer,
    InProcessTransport, Message, PanelError, PanelKey, PreferenceStore, Router, Sidebar,
    TransportError, TransportEvent,
};

fn agent() -> AgentInfo {
    AgentInfo {
        id: "agent-7".into(),
        name: "Support Bot".into(),
        model: "gemini-2.0-flash".into(),
    }
}

fn open_panel() -> (ChatPanel<InProcessTransport>, InProcessPeer) {
    let (transport, peer) = InProcessTransport::new_pair();
    let mut panel = ChatPanel::new(agent(), transport, "acme");
    panel.open();
    (panel, peer)
}

fn inbound(value: serde_json::Value) -> TransportEvent {
    TransportEvent::Message(serde_json::from_value::<Message>(value).unwrap())
}

// =============================================================================
// Conversation Flow
// =============================================================================

/// A tool-using turn: user text, a function call, its response and a
/// markdown answer, followed by turn completion.
#[tokio::test]
async fn test_full_conversation_turn() {
    let (mut panel, mut peer) = open_panel();
    assert_eq!(panel.title(), "Test Agent: Support Bot");

    let echo_id = panel
        .send_message("  where is my order?  ", &[])
        .await
        .unwrap()
        .unwrap();
    assert!(echo_id.is_provisional());
    assert!(panel.is_sending());

    let outbound = peer.recv_outbound().await.unwrap();
    assert_eq!(outbound.text, "  where is my order?  ");
    assert!(outbound.attachments.is_empty());

    peer.deliver(inbound(json!({
        "id": "m-1",
        "author": "support_bot",
        "timestamp": 1_718_000_000.5,
        "content": {
            "role": "model",
            "parts": [{"function_call": {"id": "call-1", "name": "lookup_order", "args": {"order": 42}}}]
        }
    })))
    .await
    .unwrap();
    peer.deliver(inbound(json!({
        "id": "m-2",
        "author": "support_bot",
        "content": {
            "role": "user",
            "parts": [{"functionResponse": {"id": "call-1", "name": "lookup_order", "response": {"status": "success", "report": "shipped"}}}]
        }
    })))
    .await
    .unwrap();
    peer.deliver(inbound(json!({
        "id": "m-3",
        "author": "support_bot",
        "content": {"role": "model", "parts": [{"text": "Your order **shipped** today."}]}
    })))
    .await
    .unwrap();
    peer.deliver(TransportEvent::TurnComplete).await.unwrap();

    assert_eq!(panel.poll_transport(), 4);
    assert!(!panel.is_sending());

    let entries = panel.render();
    assert_eq!(entries.len(), 4);

    assert_eq!(entries[0].id, echo_id);
    assert_eq!(entries[0].author, "user");
    assert_eq!(entries[0].text.body(), "  where is my order?  ");

    assert_eq!(entries[1].text.kind(), Some(ContentKind::FunctionCall));
    assert_eq!(
        entries[1].text.title(),
        Some("📞 Function call: lookup_order")
    );
    assert_eq!(
        entries[1].text.body(),
        "ID: call-1\nArgs: \n{\n  \"order\": 42\n}"
    );

    assert_eq!(
        entries[2].text.title(),
        Some("✅ Function response: lookup_order")
    );
    assert_eq!(entries[2].text.body(), "ID: call-1\nResult: shipped");

    assert_eq!(entries[3].text.title(), Some("Message"));
    assert_eq!(entries[3].content_type, ContentType::Markdown);
    assert_eq!(entries[0].content_type, ContentType::Plain);
}

/// Expansion toggles are per message and only apply to the open session.
#[tokio::test]
async fn test_expansion_flags() {
    let (mut panel, peer) = open_panel();
    peer.deliver(inbound(json!({
        "id": "m-1",
        "author": "bot",
        "content": {"parts": [{"function_call": {"name": "search", "id": "1", "args": {"q": "x"}}}]}
    })))
    .await
    .unwrap();
    panel.poll_transport();

    let id = panel.messages()[0].id.clone();
    assert!(!panel.is_expanded(&id));
    assert!(panel.toggle_expansion(&id));
    assert!(panel.render()[0].expanded);
    assert!(!panel.toggle_expansion(&id));
    assert!(!panel.render()[0].expanded);
}

/// Attachments travel with the echo and with the outbound message.
#[tokio::test]
async fn test_attachment_only_submission() {
    let (mut panel, mut peer) = open_panel();
    let file = FileAttachment {
        data: "aGVsbG8=".into(),
        content_type: "text/plain".into(),
        filename: "hello.txt".into(),
    };

    let id = panel.send_message("   ", &[file.clone()]).await.unwrap();
    assert!(id.is_some());

    let echo = &panel.messages()[0];
    assert_eq!(echo.parts().map(<[_]>::len), Some(1));

    let outbound = peer.try_recv_outbound().unwrap();
    assert_eq!(outbound.attachments, vec![file]);
}

/// Blank input is not sent and not echoed.
#[tokio::test]
async fn test_blank_submission_ignored() {
    let (mut panel, mut peer) = open_panel();

    assert_eq!(panel.send_message(" \n\t", &[]).await.unwrap(), None);
    assert!(panel.messages().is_empty());
    assert!(!panel.is_sending());
    assert!(peer.try_recv_outbound().is_none());
}

// =============================================================================
// Failure Handling
// =============================================================================

/// A disconnected transport surfaces an error, keeps the echo and releases
/// the sending flag so the user can retry.
#[tokio::test]
async fn test_send_while_disconnected() {
    let (mut panel, mut peer) = open_panel();
    peer.disconnect();

    let result = panel.send_message("hello", &[]).await;
    assert!(matches!(
        result,
        Err(PanelError::Transport(TransportError::InvalidState(_)))
    ));
    assert_eq!(panel.messages().len(), 1);
    assert!(!panel.is_sending());
    assert!(peer.try_recv_outbound().is_none());

    peer.reconnect();
    assert!(panel.send_message("hello again", &[]).await.unwrap().is_some());
    assert_eq!(peer.recv_outbound().await.unwrap().text, "hello again");
}

/// Sending to a closed panel is refused without touching the transport.
#[tokio::test]
async fn test_send_while_closed() {
    let (transport, mut peer) = InProcessTransport::new_pair();
    let mut panel = ChatPanel::new(agent(), transport, "acme");

    assert!(matches!(
        panel.send_message("hi", &[]).await,
        Err(PanelError::Closed)
    ));
    assert!(peer.try_recv_outbound().is_none());
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Escape closes the panel, drops its log, and events received while closed
/// are discarded.
#[tokio::test]
async fn test_escape_and_reopen() {
    let (mut panel, peer) = open_panel();
    panel.send_message("first", &[]).await.unwrap();
    assert_eq!(panel.messages().len(), 1);

    assert!(panel.handle_key(PanelKey::from_key_name("Escape")));
    assert!(!panel.is_open());
    assert!(!panel.handle_key(PanelKey::Escape));

    peer.deliver(inbound(json!({"id": "late", "author": "bot", "content": {"parts": [{"text": "late"}]}})))
        .await
        .unwrap();
    assert_eq!(panel.poll_transport(), 1);

    panel.open();
    assert!(panel.messages().is_empty());
    assert!(panel.render().is_empty());
    assert!(!panel.is_sending());
}

/// Messages without parts render the empty placeholder rather than failing.
#[tokio::test]
async fn test_degenerate_messages_render() {
    let (mut panel, peer) = open_panel();
    peer.deliver(inbound(json!({"id": "e-1", "author": "bot", "content": {}})))
        .await
        .unwrap();
    peer.deliver(inbound(json!({"id": "e-2", "author": "bot", "content": {"parts": "oops"}})))
        .await
        .unwrap();
    panel.poll_transport();

    let bodies: Vec<String> = panel
        .render()
        .iter()
        .map(|entry| entry.text.body().to_string())
        .collect();
    assert_eq!(bodies, vec!["Empty content", "Empty content"]);
}

// =============================================================================
// Preferences
// =============================================================================

#[derive(Default)]
struct Visits(Vec<String>);

impl Router for Visits {
    fn push(&mut self, path: &str) {
        self.0.push(path.to_string());
    }
}

/// The sidebar collapse flag survives a restart through the file store, and
/// the same store feeds the panel's client id.
#[test]
fn test_preferences_survive_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("preferences.json");

    {
        let mut store = FileStore::open(&path).unwrap();
        store
            .set(USER_PROFILE_KEY, r#"{"is_admin": false, "client_id": "tenant-9"}"#)
            .unwrap();
        let mut sidebar = Sidebar::new(store, Visits::default());
        assert!(!sidebar.is_collapsed());
        sidebar.toggle_collapsed().unwrap();
    }

    let store = FileStore::open(&path).unwrap();
    assert_eq!(store.get(SIDEBAR_COLLAPSED_KEY).as_deref(), Some("true"));
    assert_eq!(resolve_client_id(&store, "test"), "tenant-9");

    let sidebar = Sidebar::new(store, Visits::default());
    assert!(sidebar.is_collapsed());
    assert_eq!(sidebar.menu()[0].name, "Agents");
}

// =============================================================================
// Configuration
// =============================================================================

/// Config values flow into the transport capacity and the store location.
#[tokio::test]
async fn test_config_drives_components() {
    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("prefs.json");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[panel]\ndefault_client_id = \"from-file\"\nchannel_capacity = 2\n\n[store]\npath = {:?}",
        store_path.display().to_string()
    )
    .unwrap();

    let mut config = load_config_with_env(Some(file.path().to_path_buf()), |_| None).unwrap();
    assert_eq!(config.source(), ConfigSource::File);
    ConfigOverrides::new()
        .with_default_client_id("from-cli".into())
        .apply(&mut config);
    assert_eq!(config.source(), ConfigSource::Cli);

    let store = FileStore::open(config.store_path.clone().unwrap()).unwrap();
    assert_eq!(store.path(), store_path.as_path());
    let client_id = resolve_client_id(&store, &config.default_client_id);
    assert_eq!(client_id, "from-cli");

    let (transport, mut peer) = InProcessTransport::new_pair_with_capacity(config.channel_capacity);
    let mut panel = ChatPanel::new(agent(), transport, client_id);
    panel.open();
    assert_eq!(panel.client_id(), "from-cli");

    panel.send_message("one", &[]).await.unwrap();
    panel.send_message("two", &[]).await.unwrap();
    assert_eq!(peer.recv_outbound().await.unwrap().text, "one");
    assert_eq!(peer.recv_outbound().await.unwrap().text, "two");
}

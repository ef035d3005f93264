//! Chat Panel Core - Conversation Rendering for the Agent Test Chat
//!
//! This crate holds the logic behind the agent "test chat" panel: turning
//! heterogeneous agent messages into displayable text, deciding whether that
//! text is markdown, and keeping the conversation with optimistic echoes of
//! what the user sent. It carries no UI framework; a web, desktop or terminal
//! surface renders what [`ChatPanel::render`] returns.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         UI Surface                               │
//! │        renders PanelEntry list, forwards keys and input          │
//! └───────────────┬──────────────────────────────────▲───────────────┘
//!                 │ PanelKey / send_message          │ render()
//! ┌───────────────▼──────────────────────────────────┴───────────────┐
//! │                          ChatPanel                               │
//! │  ┌──────────┐   ┌────────────┐   ┌────────────┐                  │
//! │  │ Session  │──▶│ classify() │──▶│ markdown   │──▶ PanelEntry     │
//! │  │ (echoes, │   │ title/body │   │ sniffer    │                  │
//! │  │ expanded)│   └────────────┘   └────────────┘                  │
//! │  └────▲─────┘                                                    │
//! └───────┼──────────────────────────────────┬───────────────────────┘
//!         │ TransportEvent (poll)            │ OutboundMessage
//! ┌───────┴──────────────────────────────────▼───────────────────────┐
//! │                 AgentTransport (in-process, WebSocket, ...)      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ChatPanel`]: Open/close lifecycle, ingestion, sending, rendering
//! - [`Message`] / [`ContentPart`]: Inbound agent events and their parts
//! - [`MessageText`]: Classification result (titled block or raw text)
//! - [`Session`]: Ordered messages plus per-message expansion state
//! - [`AgentTransport`]: Seam to whatever carries messages to the agent
//! - [`Sidebar`]: App navigation with a persisted collapse flag
//! - [`DelayForm`] / [`DelayNodeView`]: Delay step of the workflow editor
//!
//! # Quick Start
//!
//! ```ignore
//! use chat_panel_core::{AgentInfo, ChatPanel, InProcessTransport, TransportEvent};
//!
//! let (transport, peer) = InProcessTransport::new_pair();
//! let agent = AgentInfo {
//!     id: "a-1".into(),
//!     name: "Support".into(),
//!     model: "gpt-4o".into(),
//! };
//! let mut panel = ChatPanel::new(agent, transport, "acme");
//! panel.open();
//!
//! panel.send_message("hello", &[]).await?;
//! peer.deliver(TransportEvent::Message(reply)).await?;
//! panel.poll_transport();
//!
//! for entry in panel.render() {
//!     println!("{}: {}", entry.author, entry.text.body());
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`messages`]: Wire model of agent messages and content parts
//! - [`classify`]: Content classifier (title, body, collapsibility)
//! - [`markdown`]: Markdown sniffer
//! - [`session`]: Conversation state and optimistic echo
//! - [`panel`]: The test chat panel
//! - [`transport`]: Agent transport abstraction and in-process channels
//! - [`events`]: Keyboard input from surfaces
//! - [`store`]: Injected preference storage
//! - [`sidebar`]: App sidebar navigation state
//! - [`workflow`]: Workflow editor node forms
//! - [`config`]: TOML configuration file support

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classify;
pub mod config;
pub mod events;
pub mod markdown;
pub mod messages;
pub mod panel;
pub mod session;
pub mod sidebar;
pub mod store;
pub mod transport;
pub mod workflow;

// Re-exports for convenience
pub use classify::{classify, ClassifiedContent, ContentKind, MessageText};
pub use events::PanelKey;
pub use markdown::contains_markdown;
pub use messages::{
    ContentPart, ContentType, FileAttachment, FunctionCall, FunctionResponse, InlineData, Message,
    MessageContent, MessageId,
};
pub use panel::{AgentInfo, ChatPanel, ExternalId, PanelEntry, PanelError};
pub use session::{Session, SessionState};
pub use transport::{
    AgentTransport, InProcessPeer, InProcessTransport, OutboundMessage, TransportError,
    TransportEvent,
};

// Sidebar exports
pub use sidebar::{menu_items, AccountItem, NavItem, Router, Sidebar};

// Store exports
pub use store::{FileStore, MemoryStore, PreferenceStore, StoreError, UserProfile};

// Workflow exports
pub use workflow::{
    DelayConfig, DelayForm, DelayNodeView, DelayUnit, EditorSelection, NodeUpdater, WorkflowEdge,
    WorkflowNode,
};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, ChatPanelToml, ConfigError,
    ConfigOverrides, ConfigSource, PanelConfig,
};

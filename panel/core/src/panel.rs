//! Agent Test-Chat Panel
//!
//! The side panel used to try an agent out. It ties the pieces together:
//!
//! ```text
//!   transport event ──► Session log ──► classify() ──► contains_markdown()
//!                             ▲                              │
//!   user submission ──────────┘ (optimistic echo)            ▼
//!          │                                            PanelEntry list
//!          └──► AgentTransport::send_message                (surface)
//! ```
//!
//! State belongs to the open panel: closing it drops the log, the toggles and
//! the sending flag. In-flight sends are not cancelled, and events arriving
//! while closed are discarded.

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::classify::{classify, MessageText};
use crate::events::PanelKey;
use crate::messages::{ContentType, FileAttachment, Message, MessageId};
use crate::session::Session;
use crate::store::{PreferenceStore, UserProfile};
use crate::transport::{AgentTransport, TransportError, TransportEvent};

/// Client id used when no cached profile names one
pub const DEFAULT_CLIENT_ID: &str = "test";

/// Errors from panel operations
#[derive(Debug, Error)]
pub enum PanelError {
    /// The panel is closed
    #[error("Chat panel is closed")]
    Closed,

    /// The transport rejected the message
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// The agent under test
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AgentInfo {
    /// Agent id
    pub id: String,
    /// Display name
    pub name: String,
    /// Model identifier shown under the name
    pub model: String,
}

/// Conversation key derived from the local time the panel was created
///
/// Formatted as `YYYYMMDDHHMMSSmmm`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ExternalId(pub String);

impl ExternalId {
    /// Generate from the current local time
    #[must_use]
    pub fn generate() -> Self {
        Self::at(&Local::now())
    }

    /// Generate from a specific instant
    #[must_use]
    pub fn at<Tz: TimeZone>(time: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self(time.format("%Y%m%d%H%M%S%3f").to_string())
    }
}

/// Resolve the client id from the cached user profile
#[must_use]
pub fn resolve_client_id(store: &impl PreferenceStore, fallback: &str) -> String {
    UserProfile::load(store)
        .and_then(|profile| profile.client_id)
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// One message as a surface should draw it
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PanelEntry {
    /// Message id
    pub id: MessageId,
    /// Message author
    pub author: String,
    /// Classified title/body
    pub text: MessageText,
    /// Rendering hint for the body
    pub content_type: ContentType,
    /// Whether the card is expanded
    pub expanded: bool,
}

impl PanelEntry {
    fn build(message: &Message, expanded: bool) -> Self {
        let text = classify(message);
        let content_type = ContentType::detect(text.body());
        Self {
            id: message.id.clone(),
            author: message.author.clone(),
            text,
            content_type,
            expanded,
        }
    }
}

/// The test-chat side panel
pub struct ChatPanel<T> {
    agent: AgentInfo,
    external_id: ExternalId,
    client_id: String,
    transport: T,
    /// Present while the panel is open
    session: Option<Session>,
}

impl<T: AgentTransport> ChatPanel<T> {
    /// Create a closed panel bound to `agent`
    pub fn new(agent: AgentInfo, transport: T, client_id: impl Into<String>) -> Self {
        let external_id = ExternalId::generate();
        let client_id = client_id.into();
        debug!(
            agent_id = %agent.id,
            external_id = %external_id.0,
            client_id = %client_id,
            "Created chat panel"
        );
        Self {
            agent,
            external_id,
            client_id,
            transport,
            session: None,
        }
    }

    /// Open the panel with a fresh session (no-op when already open)
    pub fn open(&mut self) {
        if self.session.is_none() {
            info!(agent = %self.agent.name, "Opening chat panel");
            self.session = Some(Session::new());
        }
    }

    /// Close the panel, dropping its session
    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            info!(
                agent = %self.agent.name,
                messages = session.message_count(),
                "Closing chat panel"
            );
        }
    }

    /// Whether the panel is open
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// React to a key press; returns true if the key was consumed
    pub fn handle_key(&mut self, key: PanelKey) -> bool {
        match key {
            PanelKey::Escape if self.is_open() => {
                self.close();
                true
            }
            _ => false,
        }
    }

    /// Apply one transport event
    pub fn handle_event(&mut self, event: TransportEvent) {
        let Some(session) = self.session.as_mut() else {
            debug!("Dropping transport event while panel is closed");
            return;
        };
        match event {
            TransportEvent::Message(message) => session.push(message),
            TransportEvent::TurnComplete => session.complete_turn(),
        }
    }

    /// The agent finished its turn; clears the sending flag
    pub fn handle_turn_complete(&mut self) {
        self.handle_event(TransportEvent::TurnComplete);
    }

    /// Drain pending transport events; returns how many were applied
    pub fn poll_transport(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.transport.try_recv() {
            self.handle_event(event);
            applied += 1;
        }
        applied
    }

    /// Submit user input
    ///
    /// Appends the optimistic echo, then forwards the raw text and
    /// attachments to the transport. Blank text without attachments is
    /// ignored and yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// `Closed` if the panel is closed; `Transport` if the transport refuses
    /// the message. The echo stays in the log either way.
    pub async fn send_message(
        &mut self,
        text: &str,
        attachments: &[FileAttachment],
    ) -> Result<Option<MessageId>, PanelError> {
        let session = self.session.as_mut().ok_or(PanelError::Closed)?;
        let Some(id) = session.add_user_message(text, attachments, now_ms()) else {
            return Ok(None);
        };

        if let Err(e) = self.transport.send_message(text, attachments).await {
            warn!(error = %e, message_id = %id, "Failed to forward message to agent");
            if let Some(session) = self.session.as_mut() {
                session.complete_turn();
            }
            return Err(e.into());
        }

        Ok(Some(id))
    }

    /// Flip a message card's expansion flag; returns the new value
    pub fn toggle_expansion(&mut self, id: &MessageId) -> bool {
        self.session
            .as_mut()
            .is_some_and(|session| session.toggle_expansion(id))
    }

    /// Whether a message card is expanded
    #[must_use]
    pub fn is_expanded(&self, id: &MessageId) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.is_expanded(id))
    }

    /// Whether the agent's turn is still in progress
    #[must_use]
    pub fn is_sending(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_sending)
    }

    /// Messages in the log, oldest first (empty while closed)
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        match &self.session {
            Some(session) => session.all_messages(),
            None => &[],
        }
    }

    /// Everything a surface needs to draw the conversation
    #[must_use]
    pub fn render(&self) -> Vec<PanelEntry> {
        let Some(session) = self.session.as_ref() else {
            return Vec::new();
        };
        session
            .all_messages()
            .iter()
            .map(|message| PanelEntry::build(message, session.is_expanded(&message.id)))
            .collect()
    }

    /// Header title
    #[must_use]
    pub fn title(&self) -> String {
        format!("Test Agent: {}", self.agent.name)
    }

    /// The agent under test
    #[must_use]
    pub fn agent(&self) -> &AgentInfo {
        &self.agent
    }

    /// Conversation key for the transport
    #[must_use]
    pub fn external_id(&self) -> &ExternalId {
        &self.external_id
    }

    /// Tenant id
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Borrow the transport
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

/// Get current timestamp in milliseconds
fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

//! Session Management
//!
//! A session is one open conversation with an agent. It owns the ordered
//! message log, the "waiting for the agent" flag and the per-message
//! expansion toggles of tool cards.
//!
//! The log is append-only: messages are never edited, reordered or removed.
//! Optimistic echoes and the transport's later copy of the same text are not
//! reconciled, so both stay in the log.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::messages::{FileAttachment, Message, MessageId};

/// Session state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Idle, waiting for user input
    Active,
    /// A user message was sent and the agent's turn has not completed
    Busy,
}

/// A conversation session
#[derive(Clone, Debug)]
pub struct Session {
    /// Session state
    pub state: SessionState,
    /// Conversation history, oldest first
    messages: Vec<Message>,
    /// Expansion toggles keyed by message id (absent = collapsed)
    expanded: HashMap<MessageId, bool>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create an empty session
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: SessionState::Active,
            messages: Vec::new(),
            expanded: HashMap::new(),
        }
    }

    /// Append a message delivered by the transport
    pub fn push(&mut self, message: Message) {
        tracing::debug!(
            id = %message.id,
            author = %message.author,
            position = self.messages.len(),
            "Appending message to session log"
        );
        self.messages.push(message);
    }

    /// Append the optimistic echo of a user submission and mark the session
    /// busy
    ///
    /// Returns the provisional id, or `None` when there was nothing to send
    /// (blank text and no attachments).
    pub fn add_user_message(
        &mut self,
        text: &str,
        attachments: &[FileAttachment],
        unix_millis: u64,
    ) -> Option<MessageId> {
        if text.trim().is_empty() && attachments.is_empty() {
            return None;
        }

        let message = Message::optimistic(text, attachments, unix_millis);
        let id = message.id.clone();
        self.state = SessionState::Busy;
        self.push(message);
        Some(id)
    }

    /// The agent finished its turn
    pub fn complete_turn(&mut self) {
        self.state = SessionState::Active;
    }

    /// Whether a user message is awaiting the agent's turn to complete
    #[must_use]
    pub fn is_sending(&self) -> bool {
        self.state == SessionState::Busy
    }

    /// Flip the expansion flag of a message, returning the new value
    pub fn toggle_expansion(&mut self, id: &MessageId) -> bool {
        let flag = self.expanded.entry(id.clone()).or_insert(false);
        *flag = !*flag;
        *flag
    }

    /// Whether a message's card is expanded
    #[must_use]
    pub fn is_expanded(&self, id: &MessageId) -> bool {
        self.expanded.get(id).copied().unwrap_or(false)
    }

    /// Get message by ID (first match; ids are not guaranteed unique)
    #[must_use]
    pub fn get_message(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    /// Get all messages
    #[must_use]
    pub fn all_messages(&self) -> &[Message] {
        &self.messages
    }

    /// Get current message count
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

//! Transport Traits
//!
//! The seam between the chat panel and whatever carries messages to and from
//! the agent.

use async_trait::async_trait;
use thiserror::Error;

use crate::messages::{FileAttachment, Message};

/// Errors raised by a transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// Transport is not in a state that allows the operation
    #[error("Invalid transport state: {0}")]
    InvalidState(String),

    /// The message could not be handed off
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// The other side went away
    #[error("Connection closed")]
    ConnectionClosed,
}

/// Events delivered by the transport
#[derive(Clone, Debug, PartialEq)]
pub enum TransportEvent {
    /// A conversation event to append to the log
    Message(Message),
    /// The agent finished responding to the last user message
    TurnComplete,
}

/// A user submission as handed to the transport
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Raw text as typed
    pub text: String,
    /// Attached files
    pub attachments: Vec<FileAttachment>,
}

/// Carries user messages to an agent and agent events back
#[async_trait]
pub trait AgentTransport: Send + Sync {
    /// Forward a user submission
    ///
    /// # Errors
    ///
    /// Returns an error if the transport is disconnected or the message
    /// cannot be handed off.
    async fn send_message(
        &self,
        text: &str,
        attachments: &[FileAttachment],
    ) -> Result<(), TransportError>;

    /// Next pending inbound event, if any (non-blocking)
    fn try_recv(&mut self) -> Option<TransportEvent>;

    /// Whether the transport can currently send
    fn is_connected(&self) -> bool;
}

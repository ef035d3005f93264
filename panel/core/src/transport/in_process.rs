//! In-Process Transport
//!
//! Channel-based transport for embedded agents, tests and transcript replay.
//!
//! # Usage
//!
//! ```
//! # use chat_panel_core::panel::resolve_client_id;
//! # use chat_panel_core::{AgentInfo, ChatPanel, InProcessTransport, MemoryStore, TransportEvent};
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), chat_panel_core::TransportError> {
//! # let agent = AgentInfo { id: "a-1".into(), name: "Support".into(), model: "m".into() };
//! # let store = MemoryStore::new();
//! let (transport, peer) = InProcessTransport::new_pair();
//!
//! // The agent side pushes events through the peer
//! peer.deliver(TransportEvent::TurnComplete).await?;
//!
//! // The panel owns the transport
//! let mut panel = ChatPanel::new(agent, transport, resolve_client_id(&store, "test"));
//! panel.poll_transport();
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::messages::FileAttachment;

use super::traits::{AgentTransport, OutboundMessage, TransportError, TransportEvent};

/// Default channel capacity in each direction
pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// In-process transport using tokio channels
pub struct InProcessTransport {
    /// Channel to hand user messages to the agent side
    outbound_tx: mpsc::Sender<OutboundMessage>,
    /// Channel to receive events from the agent side
    event_rx: mpsc::Receiver<TransportEvent>,
    /// Connection state, shared with the peer
    connected: Arc<AtomicBool>,
}

/// The agent side of an [`InProcessTransport`]
pub struct InProcessPeer {
    /// Channel to deliver events to the panel
    event_tx: mpsc::Sender<TransportEvent>,
    /// Channel receiving user messages from the panel
    outbound_rx: mpsc::Receiver<OutboundMessage>,
    /// Connection state, shared with the transport
    connected: Arc<AtomicBool>,
}

impl InProcessTransport {
    /// Create a new transport/peer pair with the default capacity
    #[must_use]
    pub fn new_pair() -> (Self, InProcessPeer) {
        Self::new_pair_with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create with custom channel capacity
    #[must_use]
    pub fn new_pair_with_capacity(capacity: usize) -> (Self, InProcessPeer) {
        let (event_tx, event_rx) = mpsc::channel(capacity.max(1));
        let (outbound_tx, outbound_rx) = mpsc::channel(capacity.max(1));
        let connected = Arc::new(AtomicBool::new(true));

        let transport = Self {
            outbound_tx,
            event_rx,
            connected: Arc::clone(&connected),
        };
        let peer = InProcessPeer {
            event_tx,
            outbound_rx,
            connected,
        };

        (transport, peer)
    }
}

#[async_trait]
impl AgentTransport for InProcessTransport {
    async fn send_message(
        &self,
        text: &str,
        attachments: &[FileAttachment],
    ) -> Result<(), TransportError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::InvalidState(
                "Transport not connected".to_string(),
            ));
        }

        let message = OutboundMessage {
            text: text.to_string(),
            attachments: attachments.to_vec(),
        };
        self.outbound_tx
            .send(message)
            .await
            .map_err(|_| TransportError::SendFailed("Channel closed".to_string()))
    }

    fn try_recv(&mut self) -> Option<TransportEvent> {
        self.event_rx.try_recv().ok()
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

impl InProcessPeer {
    /// Deliver an event to the panel
    ///
    /// # Errors
    ///
    /// Returns `ConnectionClosed` if the transport was dropped.
    pub async fn deliver(&self, event: TransportEvent) -> Result<(), TransportError> {
        self.event_tx
            .send(event)
            .await
            .map_err(|_| TransportError::ConnectionClosed)
    }

    /// Wait for the next user message from the panel
    ///
    /// # Errors
    ///
    /// Returns `ConnectionClosed` once the transport is dropped.
    pub async fn recv_outbound(&mut self) -> Result<OutboundMessage, TransportError> {
        self.outbound_rx
            .recv()
            .await
            .ok_or(TransportError::ConnectionClosed)
    }

    /// Next pending user message, if any
    pub fn try_recv_outbound(&mut self) -> Option<OutboundMessage> {
        self.outbound_rx.try_recv().ok()
    }

    /// Mark the connection down; further sends from the panel fail
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    /// Mark the connection up again
    pub fn reconnect(&self) {
        self.connected.store(true, Ordering::SeqCst);
    }
}

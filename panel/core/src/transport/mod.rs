//! Agent Transport Layer
//!
//! The panel never talks to the network itself. It hands outbound user
//! messages to an [`AgentTransport`] and pulls inbound [`TransportEvent`]s
//! from it:
//! - `InProcess`: tokio channels, for tests, replays and embedded agents
//! - WebSocket: provided by the host application, outside this crate
//!
//! Delivery order of inbound events is whatever the transport guarantees;
//! the panel appends them in the order it receives them.

pub mod in_process;
pub mod traits;

// Re-exports for convenience
pub use in_process::{InProcessPeer, InProcessTransport};
pub use traits::{AgentTransport, OutboundMessage, TransportError, TransportEvent};

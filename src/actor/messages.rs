//! Actor Message Definitions
//!
//! ```text
//! ClientHandle --ClientMsg--> ClientActor <--SocketMsg-- connection task
//! ```

// =============================================================================
// Control Messages
// =============================================================================

/// Messages to the client actor from its handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMsg {
    /// Connect if the page runs on a development host
    Start,
    /// Connect now, ignoring the allow list and any pending backoff
    Reconnect,
    /// Close the connection and stay idle
    Disconnect,
    /// End the session
    Shutdown,
}

// =============================================================================
// Socket Messages
// =============================================================================

/// Event from a connection task, tagged with the connection it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketMsg {
    pub generation: u64,
    pub event: SocketEvent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    /// Handshake completed
    Open,
    /// Text frame received
    Message(String),
    /// Connect or read failure (always followed by `Close`)
    Error(String),
    /// Connection is gone
    Close,
}

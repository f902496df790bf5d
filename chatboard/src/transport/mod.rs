//! Chat transport layer.
//!
//! The overlay consumes chat through a single implementation:
//! [`twitch::TwitchChat`], an IRC-over-WebSocket client. The transport
//! delivers parsed [`chatboard_irc::Privmsg`] values and handles
//! protocol keepalives itself; reconnect policy lives one layer up, in
//! [`crate::net`].

pub mod twitch;

/// Errors that can occur during transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The connection to the chat server has been closed.
    #[error("connection closed")]
    ConnectionClosed,

    /// The operation timed out before completing.
    #[error("transport operation timed out")]
    Timeout,

    /// The chat server refused the login credentials.
    #[error("chat login rejected: {0}")]
    LoginRejected(String),

    /// The WebSocket connection could not be established.
    #[error("failed to reach chat server: {0}")]
    Connect(String),

    /// An underlying I/O error occurred.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

//! Server error types.

use std::{io, time::Duration};

use shellquiz_proto::ProtocolError;
use thiserror::Error;

/// Errors that can occur in the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error (bad host key files, invalid TLS setup, etc.).
    ///
    /// Fatal at startup. Fix configuration and restart.
    #[error("configuration error: {0}")]
    Config(String),

    /// The listener could not be bound.
    #[error("failed to bind {address}: {source}")]
    Bind {
        /// Requested address.
        address: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Transport error while accepting connections.
    #[error("transport error: {0}")]
    Transport(String),

    /// Sessions did not finish within the grace period and were aborted.
    #[error("sessions still running after {0:?} grace period")]
    ShutdownTimeout(Duration),

    /// The accept loop task failed.
    #[error("accept loop failed: {0}")]
    Task(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors that end a single session.
///
/// These never affect the listener or other sessions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The client did not request a terminal.
    #[error("no active terminal")]
    NoTerminal,

    /// TLS handshake or `Hello` did not arrive in time.
    #[error("handshake timed out")]
    HandshakeTimeout,

    /// The client asked for a terminal larger than the server draws.
    #[error("terminal {cols}x{rows} too large")]
    TerminalTooLarge {
        /// Requested columns.
        cols: u16,
        /// Requested rows.
        rows: u16,
    },

    /// The client closed the connection before sending `Hello`.
    #[error("connection closed before hello")]
    ClosedBeforeHello,

    /// The first frame was not a `Hello`.
    #[error("expected hello, got {0}")]
    UnexpectedFrame(&'static str),

    /// Malformed frame.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

//! Session messages.
//!
//! Both directions are plain serde enums; the variant tag travels in the CBOR
//! body, so a frame is self-describing and needs no separate opcode.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{KeyInput, ScrollDirection};

/// Interactive terminal requested by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PtyRequest {
    /// Terminal type (value of `$TERM` on the client).
    pub term: String,
    /// Terminal width in columns.
    pub cols: u16,
    /// Terminal height in rows.
    pub rows: u16,
}

/// Frames sent from the client to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientFrame {
    /// Opening handshake. Always the first frame on a connection.
    Hello {
        /// Interactive terminal request. `None` when the client has no
        /// terminal attached.
        pty: Option<PtyRequest>,
    },

    /// Terminal window changed size.
    Resize {
        /// New width in columns.
        cols: u16,
        /// New height in rows.
        rows: u16,
    },

    /// Key pressed.
    Key(KeyInput),

    /// Mouse wheel moved.
    Scroll(ScrollDirection),
}

/// Frames sent from the server to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerFrame {
    /// Raw terminal output (text and escape sequences) to write verbatim.
    Output(Bytes),

    /// Human-readable message shown to the user outside the terminal UI.
    Diagnostic(String),

    /// Session is over; the server closes the stream after this frame.
    Goodbye,
}

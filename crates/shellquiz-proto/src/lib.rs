//! Wire protocol for remote shellquiz sessions.
//!
//! A session is a single bidirectional byte stream carrying length-prefixed
//! CBOR frames. The client opens with [`ClientFrame::Hello`], which either
//! requests an interactive terminal or not, then streams input events. The
//! server answers with terminal output, diagnostics and a final goodbye.
//!
//! # Components
//!
//! - [`ClientFrame`] / [`ServerFrame`]: the two message directions
//! - [`KeyInput`] / [`ScrollDirection`]: terminal-agnostic input events
//! - [`codec`]: frame encoding, decoding and async stream helpers

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod codec;
mod errors;
mod frame;
mod input;

pub use codec::{MAX_FRAME_SIZE, read_frame, write_frame};
pub use errors::{ProtocolError, Result};
pub use frame::{ClientFrame, PtyRequest, ServerFrame};
pub use input::{KeyInput, ScrollDirection};

/// ALPN protocol identifier negotiated during the TLS handshake.
pub const ALPN_PROTOCOL: &[u8] = b"shellquiz/1";

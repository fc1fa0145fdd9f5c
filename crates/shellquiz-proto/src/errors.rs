//! Protocol error types.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while encoding, decoding or transferring frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Declared frame length exceeds [`crate::MAX_FRAME_SIZE`].
    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge {
        /// Declared or actual body size.
        size: usize,
        /// Maximum permitted body size.
        max: usize,
    },

    /// Buffer ended before a complete frame was available.
    #[error("truncated frame: need {needed} bytes, have {available}")]
    Truncated {
        /// Bytes required for the complete frame.
        needed: usize,
        /// Bytes actually present.
        available: usize,
    },

    /// Frame body is not a valid CBOR message.
    #[error("CBOR decode error: {0}")]
    CborDecode(String),

    /// Message could not be serialized.
    #[error("CBOR encode error: {0}")]
    CborEncode(String),

    /// Underlying stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

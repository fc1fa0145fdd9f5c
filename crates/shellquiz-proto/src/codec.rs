//! Length-prefixed CBOR framing.
//!
//! Layout on the wire: `[length: u32 big-endian] + [body: CBOR]`. The length
//! covers the body only and never exceeds [`MAX_FRAME_SIZE`].
//!
//! The synchronous [`encode`]/[`decode`] pair works on buffers; [`read_frame`]
//! and [`write_frame`] drive them over any tokio byte stream.

use serde::{Serialize, de::DeserializeOwned};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::errors::{ProtocolError, Result};

/// Maximum body size of a single frame (1 MiB).
///
/// A full-screen redraw of a large terminal with styling stays well below
/// this; anything larger is treated as a protocol violation.
pub const MAX_FRAME_SIZE: usize = 1 << 20;

/// Size of the length prefix in bytes.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Append one encoded frame to `dst`.
///
/// On error `dst` is left exactly as it was.
pub fn encode<T: Serialize>(message: &T, dst: &mut Vec<u8>) -> Result<()> {
    let start = dst.len();
    dst.extend_from_slice(&[0u8; LENGTH_PREFIX_SIZE]);

    if let Err(e) = ciborium::into_writer(message, &mut *dst) {
        dst.truncate(start);
        return Err(ProtocolError::CborEncode(e.to_string()));
    }

    let body_len = dst.len() - start - LENGTH_PREFIX_SIZE;
    let prefix = match u32::try_from(body_len) {
        Ok(len) if body_len <= MAX_FRAME_SIZE => len,
        _ => {
            dst.truncate(start);
            return Err(ProtocolError::FrameTooLarge { size: body_len, max: MAX_FRAME_SIZE });
        },
    };

    dst[start..start + LENGTH_PREFIX_SIZE].copy_from_slice(&prefix.to_be_bytes());
    Ok(())
}

/// Decode one frame from the front of `src`.
///
/// Returns the message and the number of bytes consumed. Never panics on
/// malformed input.
pub fn decode<T: DeserializeOwned>(src: &[u8]) -> Result<(T, usize)> {
    let Some(prefix) = src.get(..LENGTH_PREFIX_SIZE) else {
        return Err(ProtocolError::Truncated { needed: LENGTH_PREFIX_SIZE, available: src.len() });
    };

    let body_len = body_len(prefix)?;
    let total = LENGTH_PREFIX_SIZE + body_len;
    let Some(body) = src.get(LENGTH_PREFIX_SIZE..total) else {
        return Err(ProtocolError::Truncated { needed: total, available: src.len() });
    };

    let message =
        ciborium::from_reader(body).map_err(|e| ProtocolError::CborDecode(e.to_string()))?;
    Ok((message, total))
}

/// Read the next frame from `reader`.
///
/// Returns `Ok(None)` only on a clean end of stream, before any byte of a
/// new frame. A stream ending mid-frame is [`ProtocolError::Truncated`].
/// Not cancel-safe: a partially read frame is lost if the future is dropped.
pub async fn read_frame<R, T>(reader: &mut R) -> Result<Option<T>>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
    let mut filled = 0;
    while filled < LENGTH_PREFIX_SIZE {
        match reader.read(&mut prefix[filled..]).await? {
            0 if filled == 0 => return Ok(None),
            0 => {
                return Err(ProtocolError::Truncated {
                    needed: LENGTH_PREFIX_SIZE,
                    available: filled,
                });
            },
            n => filled += n,
        }
    }

    let body_len = body_len(&prefix)?;
    let mut body = vec![0u8; body_len];
    match reader.read_exact(&mut body).await {
        Ok(_) => {},
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(ProtocolError::Truncated {
                needed: LENGTH_PREFIX_SIZE + body_len,
                available: LENGTH_PREFIX_SIZE,
            });
        },
        Err(e) => return Err(e.into()),
    }

    ciborium::from_reader(body.as_slice())
        .map(Some)
        .map_err(|e| ProtocolError::CborDecode(e.to_string()))
}

/// Encode `message` and write it to `writer`, flushing afterwards.
pub async fn write_frame<W, T>(writer: &mut W, message: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut buf = Vec::new();
    encode(message, &mut buf)?;
    writer.write_all(&buf).await?;
    writer.flush().await?;
    Ok(())
}

fn body_len(prefix: &[u8]) -> Result<usize> {
    let mut raw = [0u8; LENGTH_PREFIX_SIZE];
    raw.copy_from_slice(prefix);
    let len = u32::from_be_bytes(raw) as usize;
    if len > MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLarge { size: len, max: MAX_FRAME_SIZE });
    }
    Ok(len)
}

//! Message header
//!
//! Every frame on the wire starts with this fixed 8-byte header.
//!
//! ```text
//! ┌────────────┬──────────┬──────────┬──────────────────┐
//! │ Length (2) │ Rsvd (1) │ Cmd (1)  │ Correlation (4)  │
//! └────────────┴──────────┴──────────┴──────────────────┘
//! ```
//!
//! `Length` counts the 6 header bytes after itself plus the body.

use bytes::{Buf, BufMut};

use crate::error::{LightifyError, Result};

/// Full header size in bytes
pub const HEADER_SIZE: usize = 8;

/// Header bytes counted by the length field
pub const HEADER_TAIL_LEN: usize = 6;

/// Largest body that fits in the 16-bit length field
pub const MAX_BODY_SIZE: usize = u16::MAX as usize - HEADER_TAIL_LEN;

/// Decoded frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub length: u16,
    pub reserved: u8,
    pub command: u8,
    pub correlation_id: u32,
}

impl MessageHeader {
    /// Header for a body of `body_len` bytes
    pub fn for_body(command: u8, correlation_id: u32, body_len: usize) -> Result<Self> {
        if body_len > MAX_BODY_SIZE {
            return Err(LightifyError::Encode(format!(
                "body of {} bytes exceeds maximum {}",
                body_len, MAX_BODY_SIZE
            )));
        }
        Ok(Self {
            length: (HEADER_TAIL_LEN + body_len) as u16,
            reserved: 0,
            command,
            correlation_id,
        })
    }

    /// Number of body bytes following the header
    pub fn body_len(&self) -> usize {
        (self.length as usize).saturating_sub(HEADER_TAIL_LEN)
    }

    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        let mut buf = &mut out[..];
        buf.put_u16_le(self.length);
        buf.put_u8(self.reserved);
        buf.put_u8(self.command);
        buf.put_u32_le(self.correlation_id);
        out
    }

    /// Parse a header, rejecting a length too short to cover the header tail
    pub fn decode(bytes: &[u8; HEADER_SIZE]) -> Result<Self> {
        let mut buf = &bytes[..];
        let header = Self {
            length: buf.get_u16_le(),
            reserved: buf.get_u8(),
            command: buf.get_u8(),
            correlation_id: buf.get_u32_le(),
        };

        if (header.length as usize) < HEADER_TAIL_LEN {
            return Err(LightifyError::FrameRead(format!(
                "header length {} is shorter than {}",
                header.length, HEADER_TAIL_LEN
            )));
        }
        Ok(header)
    }
}

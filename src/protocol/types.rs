//! Protocol value types
//!
//! Fixed-width identifiers and fields shared by requests and responses.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::LightifyError;

/// Size of a light identifier on the wire
pub const LIGHT_ID_SIZE: usize = 8;

/// Size of a fixed-width name field on the wire
pub const NAME_SIZE: usize = 16;

// =============================================================================
// Light ID
// =============================================================================

/// 8-byte opaque light identifier, rendered as lowercase hex
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LightId(pub [u8; LIGHT_ID_SIZE]);

impl LightId {
    pub fn as_bytes(&self) -> &[u8; LIGHT_ID_SIZE] {
        &self.0
    }

    /// Lowercase hex rendering, always 16 characters
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(LIGHT_ID_SIZE * 2);
        for byte in &self.0 {
            out.push_str(&format!("{:02x}", byte));
        }
        out
    }
}

impl From<[u8; LIGHT_ID_SIZE]> for LightId {
    fn from(bytes: [u8; LIGHT_ID_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LightId({})", self.to_hex())
    }
}

impl FromStr for LightId {
    type Err = LightifyError;

    /// Parse 16 hex characters (either case)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != LIGHT_ID_SIZE * 2 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(LightifyError::InvalidArgument(format!(
                "light id must be {} hex characters, got {:?}",
                LIGHT_ID_SIZE * 2,
                s
            )));
        }

        let mut bytes = [0u8; LIGHT_ID_SIZE];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = &s[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(pair, 16).map_err(|_| {
                LightifyError::InvalidArgument(format!("invalid hex in light id: {:?}", s))
            })?;
        }
        Ok(Self(bytes))
    }
}

impl Serialize for LightId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

// =============================================================================
// Group ID
// =============================================================================

/// 16-bit group identifier, rendered as a decimal integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GroupId(pub u16);

impl From<u16> for GroupId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GroupId {
    type Err = LightifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u16>()
            .map(Self)
            .map_err(|_| LightifyError::InvalidArgument(format!("invalid group id: {:?}", s)))
    }
}

// =============================================================================
// Fixed-width name
// =============================================================================

/// 16-byte zero-padded name field
///
/// All 16 bytes are kept as read from the wire; text rendering stops at the
/// first zero byte.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Name16(pub [u8; NAME_SIZE]);

impl Name16 {
    /// Build a name from text, truncated to 16 bytes and zero padded
    pub fn new(text: &str) -> Self {
        let mut bytes = [0u8; NAME_SIZE];
        let src = text.as_bytes();
        let len = src.len().min(NAME_SIZE);
        bytes[..len].copy_from_slice(&src[..len]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; NAME_SIZE] {
        &self.0
    }

    /// Text before the first zero byte (invalid UTF-8 replaced)
    pub fn as_text(&self) -> String {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(NAME_SIZE);
        String::from_utf8_lossy(&self.0[..end]).into_owned()
    }
}

impl fmt::Display for Name16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl fmt::Debug for Name16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name16({:?})", self.as_text())
    }
}

impl Serialize for Name16 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_text())
    }
}

// =============================================================================
// Color / firmware
// =============================================================================

/// RGB color triple, in wire order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// 4 raw firmware version bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Firmware(pub [u8; 4]);

impl Serialize for Firmware {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let [a, b, c, d] = self.0;
        serializer.serialize_str(&format!("{:02x}{:02x}{:02x}{:02x}", a, b, c, d))
    }
}

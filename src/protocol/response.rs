//! Response definitions
//!
//! Decoded reply bodies, one variant per request that expects a reply.

use serde::Serialize;

use super::command::ResponseKind;
use super::types::{Firmware, GroupId, LightId, Name16, Rgb};

/// Size of one record in a light list
pub const LIGHT_RECORD_SIZE: usize = 50;

/// Size of one record in a group list
pub const GROUP_RECORD_SIZE: usize = 18;

/// Size of the light details properties block
pub const LIGHT_PROPERTIES_SIZE: usize = 12;

/// A decoded reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    LightList(LightList),
    GroupList(GroupList),
    LightDetails(LightDetails),
    GroupDetails(GroupDetails),
}

impl Response {
    pub fn kind(&self) -> ResponseKind {
        match self {
            Response::LightList(_) => ResponseKind::LightList,
            Response::GroupList(_) => ResponseKind::GroupList,
            Response::LightDetails(_) => ResponseKind::LightDetails,
            Response::GroupDetails(_) => ResponseKind::GroupDetails,
        }
    }
}

// =============================================================================
// Light list
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LightList {
    pub flag: u8,
    pub lights: Vec<LightRecord>,
}

/// One fixed 50-byte light record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LightRecord {
    #[serde(skip)]
    pub u1: u16,
    pub id: LightId,
    pub firmware: Firmware,
    #[serde(skip)]
    pub reserved: [u8; 2],
    pub groups: u16,
    pub on: u8,
    pub bri: u8,
    pub temp: u16,
    pub color: Rgb,
    #[serde(skip)]
    pub reserved2: u8,
    pub name: Name16,
    #[serde(skip)]
    pub reserved3: [u8; 8],
}

// =============================================================================
// Group list
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupList {
    pub flag: u8,
    pub groups: Vec<GroupRecord>,
}

/// One fixed 18-byte group record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupRecord {
    pub id: GroupId,
    pub name: Name16,
}

// =============================================================================
// Details
// =============================================================================

/// State of one light; `properties` is present only when the light is online
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LightDetails {
    pub flag: u8,
    pub count: u16,
    pub id: LightId,
    pub offline: i8,
    pub properties: Option<LightProperties>,
}

impl LightDetails {
    pub fn is_online(&self) -> bool {
        self.offline == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LightProperties {
    #[serde(skip)]
    pub u2: u8,
    pub on: u8,
    pub bri: u8,
    pub temp: u16,
    pub color: Rgb,
    #[serde(skip)]
    pub u3: u8,
    #[serde(skip)]
    pub u4: [u8; 3],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupDetails {
    pub flag: u8,
    pub id: GroupId,
    pub name: Name16,
    pub lights: Vec<LightId>,
}

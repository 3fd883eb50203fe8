//! Request definitions
//!
//! The fixed command set understood by the bridge.

use super::types::{GroupId, LightId, Rgb};

/// Command codes carried in the header's command byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandCode {
    ListAllLights = 0x13,
    ListAllGroups = 0x1e,
    GroupDetails = 0x26,
    LightBrightness = 0x31,
    LightOnOff = 0x32,
    LightTemperature = 0x33,
    LightColor = 0x36,
    LightDetails = 0x68,
}

impl CommandCode {
    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            0x13 => Some(Self::ListAllLights),
            0x1e => Some(Self::ListAllGroups),
            0x26 => Some(Self::GroupDetails),
            0x31 => Some(Self::LightBrightness),
            0x32 => Some(Self::LightOnOff),
            0x33 => Some(Self::LightTemperature),
            0x36 => Some(Self::LightColor),
            0x68 => Some(Self::LightDetails),
            _ => None,
        }
    }
}

/// Shape of the reply body a request expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    LightList,
    GroupList,
    LightDetails,
    GroupDetails,
}

/// A request to the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// List every paired light (`all_details = 1` for full records)
    ListAllLights { all_details: u8 },

    /// List every group
    ListAllGroups { u1: u8, u2: u8 },

    /// Current state of one light
    LightDetails { id: LightId },

    /// Name and members of one group
    GroupDetails { id: GroupId },

    /// Switch a light on (1) or off (0)
    LightOnOff { id: LightId, on: u8 },

    /// Set brightness, fading over `time` (tenths of a second)
    LightBrightness { id: LightId, bri: u8, time: u16 },

    /// Set color temperature in kelvin
    LightTemperature { id: LightId, temp: u16, time: u16 },

    /// Set RGB color; `x` is an extra byte the bridge expects (0xff)
    LightColor { id: LightId, color: Rgb, x: u8, time: u16 },
}

impl Request {
    /// Get the command code
    pub fn command(&self) -> CommandCode {
        match self {
            Request::ListAllLights { .. } => CommandCode::ListAllLights,
            Request::ListAllGroups { .. } => CommandCode::ListAllGroups,
            Request::LightDetails { .. } => CommandCode::LightDetails,
            Request::GroupDetails { .. } => CommandCode::GroupDetails,
            Request::LightOnOff { .. } => CommandCode::LightOnOff,
            Request::LightBrightness { .. } => CommandCode::LightBrightness,
            Request::LightTemperature { .. } => CommandCode::LightTemperature,
            Request::LightColor { .. } => CommandCode::LightColor,
        }
    }

    /// Reply body this request expects, `None` for fire-and-forget commands
    pub fn response_kind(&self) -> Option<ResponseKind> {
        match self {
            Request::ListAllLights { .. } => Some(ResponseKind::LightList),
            Request::ListAllGroups { .. } => Some(ResponseKind::GroupList),
            Request::LightDetails { .. } => Some(ResponseKind::LightDetails),
            Request::GroupDetails { .. } => Some(ResponseKind::GroupDetails),
            Request::LightOnOff { .. }
            | Request::LightBrightness { .. }
            | Request::LightTemperature { .. }
            | Request::LightColor { .. } => None,
        }
    }
}

//! Protocol Module
//!
//! Defines the binary wire protocol spoken by the bridge.
//!
//! ## Frame Format
//! ```text
//! ┌────────────┬──────────┬──────────┬──────────────────┬───────────────┐
//! │ Length (2) │ Rsvd (1) │ Cmd (1)  │ Correlation (4)  │   Body (N)    │
//! └────────────┴──────────┴──────────┴──────────────────┴───────────────┘
//! ```
//! Little-endian throughout; `Length = 6 + N`.
//!
//! ### Commands
//! - 0x13: ListAllLights    - reply: light list
//! - 0x1e: ListAllGroups    - reply: group list
//! - 0x68: LightDetails     - reply: light details
//! - 0x26: GroupDetails     - reply: group details
//! - 0x32: LightOnOff       - no typed reply
//! - 0x31: LightBrightness  - no typed reply
//! - 0x33: LightTemperature - no typed reply
//! - 0x36: LightColor       - no typed reply

mod codec;
mod command;
mod header;
mod response;
mod types;

pub use codec::{
    build_frame, decode_response, encode_frame, encode_request, encode_response, read_frame,
    write_frame,
};
pub use command::{CommandCode, Request, ResponseKind};
pub use header::{MessageHeader, HEADER_SIZE, HEADER_TAIL_LEN, MAX_BODY_SIZE};
pub use response::{
    GroupDetails, GroupList, GroupRecord, LightDetails, LightList, LightProperties, LightRecord,
    Response, GROUP_RECORD_SIZE, LIGHT_PROPERTIES_SIZE, LIGHT_RECORD_SIZE,
};
pub use types::{Firmware, GroupId, LightId, Name16, Rgb, LIGHT_ID_SIZE, NAME_SIZE};

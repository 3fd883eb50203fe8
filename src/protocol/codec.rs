//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol. All integers are
//! little-endian and every field is read or written explicitly, in
//! declaration order, with no padding.
//!
//! ## Request bodies
//! - ListAllLights:    all_details (1)
//! - ListAllGroups:    u1 (1) + u2 (1)
//! - LightDetails:     id (8)
//! - GroupDetails:     id (2)
//! - LightOnOff:       id (8) + on (1)
//! - LightBrightness:  id (8) + bri (1) + time (2)
//! - LightTemperature: id (8) + temp (2) + time (2)
//! - LightColor:       id (8) + r (1) + g (1) + b (1) + x (1) + time (2)
//!
//! ## Response bodies
//! ```text
//! LightList:    flag (1) | count (2) | count × LightRecord (50)
//! GroupList:    flag (1) | count (2) | count × GroupRecord (18)
//! LightDetails: flag (1) | count (2) | id (8) | offline (1) | [properties (12) if offline == 0]
//! GroupDetails: flag (1) | id (2) | name (16) | count (1) | count × LightId (8)
//! ```

use std::io::{Read, Write};

use bytes::{Buf, BufMut};

use crate::error::{LightifyError, Result};
use super::command::{Request, ResponseKind};
use super::header::{MessageHeader, HEADER_SIZE};
use super::response::{
    GroupDetails, GroupList, GroupRecord, LightDetails, LightList, LightProperties,
    LightRecord, Response, GROUP_RECORD_SIZE, LIGHT_PROPERTIES_SIZE, LIGHT_RECORD_SIZE,
};
use super::types::{Firmware, GroupId, LightId, Name16, Rgb, LIGHT_ID_SIZE, NAME_SIZE};

// =============================================================================
// Request Encoding
// =============================================================================

/// Encode a request body
pub fn encode_request(request: &Request) -> Vec<u8> {
    let mut body = Vec::with_capacity(16);
    match request {
        Request::ListAllLights { all_details } => {
            body.put_u8(*all_details);
        }
        Request::ListAllGroups { u1, u2 } => {
            body.put_u8(*u1);
            body.put_u8(*u2);
        }
        Request::LightDetails { id } => {
            body.put_slice(id.as_bytes());
        }
        Request::GroupDetails { id } => {
            body.put_u16_le(id.0);
        }
        Request::LightOnOff { id, on } => {
            body.put_slice(id.as_bytes());
            body.put_u8(*on);
        }
        Request::LightBrightness { id, bri, time } => {
            body.put_slice(id.as_bytes());
            body.put_u8(*bri);
            body.put_u16_le(*time);
        }
        Request::LightTemperature { id, temp, time } => {
            body.put_slice(id.as_bytes());
            body.put_u16_le(*temp);
            body.put_u16_le(*time);
        }
        Request::LightColor { id, color, x, time } => {
            body.put_slice(id.as_bytes());
            put_rgb(&mut body, color);
            body.put_u8(*x);
            body.put_u16_le(*time);
        }
    }
    body
}

/// Build a full frame (header + body) for a request
pub fn encode_frame(correlation_id: u32, request: &Request) -> Result<Vec<u8>> {
    let body = encode_request(request);
    build_frame(request.command() as u8, correlation_id, &body)
}

/// Build a full frame around an already-encoded body
pub fn build_frame(command: u8, correlation_id: u32, body: &[u8]) -> Result<Vec<u8>> {
    let header = MessageHeader::for_body(command, correlation_id, body.len())?;

    let mut frame = Vec::with_capacity(HEADER_SIZE + body.len());
    frame.extend_from_slice(&header.encode());
    frame.extend_from_slice(body);
    Ok(frame)
}

// =============================================================================
// Response Encoding
// =============================================================================

/// Encode a response body, as the bridge would send it
///
/// Fails if an array is longer than its count field can express.
pub fn encode_response(response: &Response) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    match response {
        Response::LightList(list) => {
            body.reserve(3 + list.lights.len() * LIGHT_RECORD_SIZE);
            body.put_u8(list.flag);
            body.put_u16_le(checked_count(list.lights.len(), "lights")?);
            for light in &list.lights {
                put_light_record(&mut body, light);
            }
        }
        Response::GroupList(list) => {
            body.reserve(3 + list.groups.len() * GROUP_RECORD_SIZE);
            body.put_u8(list.flag);
            body.put_u16_le(checked_count(list.groups.len(), "groups")?);
            for group in &list.groups {
                body.put_u16_le(group.id.0);
                body.put_slice(group.name.as_bytes());
            }
        }
        Response::LightDetails(details) => {
            body.put_u8(details.flag);
            body.put_u16_le(details.count);
            body.put_slice(details.id.as_bytes());
            body.put_i8(details.offline);
            if let Some(props) = &details.properties {
                body.put_u8(props.u2);
                body.put_u8(props.on);
                body.put_u8(props.bri);
                body.put_u16_le(props.temp);
                put_rgb(&mut body, &props.color);
                body.put_u8(props.u3);
                body.put_slice(&props.u4);
            }
        }
        Response::GroupDetails(details) => {
            body.put_u8(details.flag);
            body.put_u16_le(details.id.0);
            body.put_slice(details.name.as_bytes());
            body.put_u8(checked_count(details.lights.len(), "group lights")?);
            for id in &details.lights {
                body.put_slice(id.as_bytes());
            }
        }
    }
    Ok(body)
}

fn checked_count<T: TryFrom<usize>>(len: usize, field: &str) -> Result<T> {
    T::try_from(len).map_err(|_| {
        LightifyError::Encode(format!("{} count {} does not fit its count field", field, len))
    })
}

fn put_rgb(body: &mut Vec<u8>, color: &Rgb) {
    body.put_u8(color.red);
    body.put_u8(color.green);
    body.put_u8(color.blue);
}

fn put_light_record(body: &mut Vec<u8>, light: &LightRecord) {
    body.put_u16_le(light.u1);
    body.put_slice(light.id.as_bytes());
    body.put_slice(&light.firmware.0);
    body.put_slice(&light.reserved);
    body.put_u16_le(light.groups);
    body.put_u8(light.on);
    body.put_u8(light.bri);
    body.put_u16_le(light.temp);
    put_rgb(body, &light.color);
    body.put_u8(light.reserved2);
    body.put_slice(light.name.as_bytes());
    body.put_slice(&light.reserved3);
}

// =============================================================================
// Response Decoding
// =============================================================================

/// Decode a response body of the expected kind
///
/// Array counts are read first and checked against the remaining bytes
/// before any record is decoded. Bytes after the last field are ignored.
pub fn decode_response(kind: ResponseKind, bytes: &[u8]) -> Result<Response> {
    let mut body = BodyReader::new(bytes, kind);

    let response = match kind {
        ResponseKind::LightList => Response::LightList(decode_light_list(&mut body)?),
        ResponseKind::GroupList => Response::GroupList(decode_group_list(&mut body)?),
        ResponseKind::LightDetails => Response::LightDetails(decode_light_details(&mut body)?),
        ResponseKind::GroupDetails => Response::GroupDetails(decode_group_details(&mut body)?),
    };

    if body.remaining() > 0 {
        tracing::trace!(?kind, trailing = body.remaining(), "Ignoring trailing response bytes");
    }
    Ok(response)
}

fn decode_light_list(body: &mut BodyReader<'_>) -> Result<LightList> {
    let flag = body.u8("flag")?;
    let count = body.u16("count")? as usize;
    body.need(count * LIGHT_RECORD_SIZE, "light records")?;

    let mut lights = Vec::with_capacity(count);
    for _ in 0..count {
        lights.push(LightRecord {
            u1: body.u16("light.u1")?,
            id: body.light_id("light.id")?,
            firmware: Firmware(body.array("light.firmware")?),
            reserved: body.array("light.reserved")?,
            groups: body.u16("light.groups")?,
            on: body.u8("light.on")?,
            bri: body.u8("light.bri")?,
            temp: body.u16("light.temp")?,
            color: body.rgb("light.color")?,
            reserved2: body.u8("light.reserved2")?,
            name: body.name("light.name")?,
            reserved3: body.array("light.reserved3")?,
        });
    }
    Ok(LightList { flag, lights })
}

fn decode_group_list(body: &mut BodyReader<'_>) -> Result<GroupList> {
    let flag = body.u8("flag")?;
    let count = body.u16("count")? as usize;
    body.need(count * GROUP_RECORD_SIZE, "group records")?;

    let mut groups = Vec::with_capacity(count);
    for _ in 0..count {
        groups.push(GroupRecord {
            id: GroupId(body.u16("group.id")?),
            name: body.name("group.name")?,
        });
    }
    Ok(GroupList { flag, groups })
}

fn decode_light_details(body: &mut BodyReader<'_>) -> Result<LightDetails> {
    let flag = body.u8("flag")?;
    let count = body.u16("count")?;
    let id = body.light_id("id")?;
    let offline = body.i8("offline")?;

    let properties = if offline == 0 {
        body.need(LIGHT_PROPERTIES_SIZE, "properties")?;
        Some(LightProperties {
            u2: body.u8("properties.u2")?,
            on: body.u8("properties.on")?,
            bri: body.u8("properties.bri")?,
            temp: body.u16("properties.temp")?,
            color: body.rgb("properties.color")?,
            u3: body.u8("properties.u3")?,
            u4: body.array("properties.u4")?,
        })
    } else {
        None
    };

    Ok(LightDetails { flag, count, id, offline, properties })
}

fn decode_group_details(body: &mut BodyReader<'_>) -> Result<GroupDetails> {
    let flag = body.u8("flag")?;
    let id = GroupId(body.u16("id")?);
    let name = body.name("name")?;
    let count = body.u8("light count")? as usize;
    body.need(count * LIGHT_ID_SIZE, "light ids")?;

    let mut lights = Vec::with_capacity(count);
    for _ in 0..count {
        lights.push(body.light_id("light id")?);
    }
    Ok(GroupDetails { flag, id, name, lights })
}

/// Bounds-checked little-endian reader over a response body
struct BodyReader<'a> {
    buf: &'a [u8],
    kind: ResponseKind,
}

impl<'a> BodyReader<'a> {
    fn new(buf: &'a [u8], kind: ResponseKind) -> Self {
        Self { buf, kind }
    }

    fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn need(&self, len: usize, field: &str) -> Result<()> {
        if self.buf.remaining() < len {
            return Err(LightifyError::Decode(format!(
                "{:?} response: {} needs {} bytes, {} remaining",
                self.kind,
                field,
                len,
                self.buf.remaining()
            )));
        }
        Ok(())
    }

    fn u8(&mut self, field: &str) -> Result<u8> {
        self.need(1, field)?;
        Ok(self.buf.get_u8())
    }

    fn i8(&mut self, field: &str) -> Result<i8> {
        self.need(1, field)?;
        Ok(self.buf.get_i8())
    }

    fn u16(&mut self, field: &str) -> Result<u16> {
        self.need(2, field)?;
        Ok(self.buf.get_u16_le())
    }

    fn array<const N: usize>(&mut self, field: &str) -> Result<[u8; N]> {
        self.need(N, field)?;
        let mut out = [0u8; N];
        self.buf.copy_to_slice(&mut out);
        Ok(out)
    }

    fn light_id(&mut self, field: &str) -> Result<LightId> {
        self.array::<LIGHT_ID_SIZE>(field).map(LightId)
    }

    fn name(&mut self, field: &str) -> Result<Name16> {
        self.array::<NAME_SIZE>(field).map(Name16)
    }

    fn rgb(&mut self, field: &str) -> Result<Rgb> {
        let [red, green, blue] = self.array::<3>(field)?;
        Ok(Rgb { red, green, blue })
    }
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one complete frame from a stream
///
/// Blocks until the header and the full body (if any) are received.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<(MessageHeader, Vec<u8>)> {
    let mut raw = [0u8; HEADER_SIZE];
    reader.read_exact(&mut raw)?;
    let header = MessageHeader::decode(&raw)?;

    let mut body = vec![0u8; header.body_len()];
    if !body.is_empty() {
        reader.read_exact(&mut body)?;
    }
    Ok((header, body))
}

/// Write one complete frame to a stream and flush it
pub fn write_frame<W: Write>(writer: &mut W, frame: &[u8]) -> Result<()> {
    writer.write_all(frame)?;
    writer.flush()?;
    Ok(())
}

//! Codec Tests
//!
//! Tests for request body layout, frame headers and response decoding.

use std::io::Cursor;

use lightify::protocol::{
    decode_response, encode_frame, encode_request, encode_response, read_frame, write_frame,
    GroupDetails, GroupId, GroupList, GroupRecord, LightId, LightList, LightRecord, MessageHeader, Name16, Request, Response,
    ResponseKind, Rgb, Firmware, HEADER_SIZE, LIGHT_RECORD_SIZE,
};
use lightify::LightifyError;

// =============================================================================
// Helper Functions
// =============================================================================

fn id() -> LightId {
    LightId([0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08])
}

/// A 50-byte light record with every field set to a distinct value
fn raw_light_record(first_id_byte: u8, name: &str) -> Vec<u8> {
    let mut rec = Vec::with_capacity(LIGHT_RECORD_SIZE);
    rec.extend_from_slice(&0x1234u16.to_le_bytes()); // u1
    rec.extend_from_slice(&[first_id_byte, 2, 3, 4, 5, 6, 7, 8]); // id
    rec.extend_from_slice(&[0x02, 0x03, 0x00, 0x4b]); // firmware
    rec.extend_from_slice(&[0xaa, 0xbb]); // reserved
    rec.extend_from_slice(&0x0005u16.to_le_bytes()); // groups
    rec.push(1); // on
    rec.push(200); // bri
    rec.extend_from_slice(&2700u16.to_le_bytes()); // temp
    rec.extend_from_slice(&[10, 20, 30]); // color
    rec.push(0xcc); // reserved2
    rec.extend_from_slice(Name16::new(name).as_bytes()); // name
    rec.extend_from_slice(&[0xdd; 8]); // reserved3
    assert_eq!(rec.len(), LIGHT_RECORD_SIZE);
    rec
}

fn list_prefix(flag: u8, count: u16) -> Vec<u8> {
    let mut body = vec![flag];
    body.extend_from_slice(&count.to_le_bytes());
    body
}

// =============================================================================
// Request Encoding Tests
// =============================================================================

#[test]
fn test_encode_list_all_lights() {
    let body = encode_request(&Request::ListAllLights { all_details: 1 });
    assert_eq!(body, vec![0x01]);
}

#[test]
fn test_encode_list_all_groups() {
    let body = encode_request(&Request::ListAllGroups { u1: 1, u2: 0 });
    assert_eq!(body, vec![0x01, 0x00]);
}

#[test]
fn test_encode_light_details() {
    let body = encode_request(&Request::LightDetails { id: id() });
    assert_eq!(body, vec![1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn test_encode_group_details_little_endian() {
    let body = encode_request(&Request::GroupDetails { id: GroupId(0x0102) });
    assert_eq!(body, vec![0x02, 0x01]);
}

#[test]
fn test_encode_light_on_off() {
    let body = encode_request(&Request::LightOnOff { id: id(), on: 1 });
    assert_eq!(body, vec![1, 2, 3, 4, 5, 6, 7, 8, 0x01]);
}

#[test]
fn test_encode_light_brightness() {
    let body = encode_request(&Request::LightBrightness {
        id: id(),
        bri: 0x50,
        time: 0x0a0b,
    });
    assert_eq!(body, vec![1, 2, 3, 4, 5, 6, 7, 8, 0x50, 0x0b, 0x0a]);
}

#[test]
fn test_encode_light_temperature() {
    let body = encode_request(&Request::LightTemperature {
        id: id(),
        temp: 2700,
        time: 3,
    });
    let mut expected = vec![1, 2, 3, 4, 5, 6, 7, 8];
    expected.extend_from_slice(&2700u16.to_le_bytes());
    expected.extend_from_slice(&[0x03, 0x00]);
    assert_eq!(body, expected);
}

#[test]
fn test_encode_light_color() {
    let body = encode_request(&Request::LightColor {
        id: id(),
        color: Rgb::new(0xff, 0x80, 0x01),
        x: 0xff,
        time: 0x0100,
    });
    assert_eq!(
        body,
        vec![1, 2, 3, 4, 5, 6, 7, 8, 0xff, 0x80, 0x01, 0xff, 0x00, 0x01]
    );
}

#[test]
fn test_command_codes() {
    let cases = [
        (Request::ListAllLights { all_details: 1 }, 0x13),
        (Request::ListAllGroups { u1: 1, u2: 0 }, 0x1e),
        (Request::LightDetails { id: id() }, 0x68),
        (Request::GroupDetails { id: GroupId(1) }, 0x26),
        (Request::LightOnOff { id: id(), on: 0 }, 0x32),
        (Request::LightBrightness { id: id(), bri: 0, time: 0 }, 0x31),
        (Request::LightTemperature { id: id(), temp: 0, time: 0 }, 0x33),
        (
            Request::LightColor { id: id(), color: Rgb::default(), x: 0, time: 0 },
            0x36,
        ),
    ];
    for (request, code) in cases {
        assert_eq!(request.command() as u8, code, "{:?}", request);
    }
}

#[test]
fn test_fire_and_forget_requests_expect_no_body() {
    assert_eq!(Request::LightOnOff { id: id(), on: 1 }.response_kind(), None);
    assert_eq!(
        Request::ListAllGroups { u1: 1, u2: 0 }.response_kind(),
        Some(ResponseKind::GroupList)
    );
}

// =============================================================================
// Frame / Header Tests
// =============================================================================

#[test]
fn test_encode_frame_on_off() {
    let frame = encode_frame(7, &Request::LightOnOff { id: id(), on: 1 }).unwrap();

    assert_eq!(frame.len(), HEADER_SIZE + 9);
    // length = 6 + 9, reserved, command, correlation id
    assert_eq!(&frame[..HEADER_SIZE], &[15, 0, 0, 0x32, 7, 0, 0, 0]);
    assert_eq!(&frame[HEADER_SIZE..], &[1, 2, 3, 4, 5, 6, 7, 8, 1]);
}

#[test]
fn test_header_decode() {
    let raw = [0x09, 0x00, 0x01, 0x13, 0x78, 0x56, 0x34, 0x12];
    let header = MessageHeader::decode(&raw).unwrap();

    assert_eq!(header.length, 9);
    assert_eq!(header.reserved, 1);
    assert_eq!(header.command, 0x13);
    assert_eq!(header.correlation_id, 0x12345678);
    assert_eq!(header.body_len(), 3);
    assert_eq!(header.encode(), raw);
}

#[test]
fn test_header_rejects_short_length() {
    let raw = [0x05, 0x00, 0x00, 0x13, 0x01, 0x00, 0x00, 0x00];
    let err = MessageHeader::decode(&raw).unwrap_err();
    assert!(matches!(err, LightifyError::FrameRead(_)));
}

#[test]
fn test_oversized_body_is_encode_error() {
    let body = vec![0u8; u16::MAX as usize];
    let err = lightify::protocol::build_frame(0x13, 1, &body).unwrap_err();
    assert!(matches!(err, LightifyError::Encode(_)));
}

#[test]
fn test_read_frame_with_and_without_body() {
    let mut stream = Vec::new();
    stream.extend_from_slice(&[6, 0, 0, 0x32, 1, 0, 0, 0]);
    stream.extend_from_slice(&[8, 0, 0, 0x1e, 2, 0, 0, 0, 0xab, 0xcd]);
    let mut cursor = Cursor::new(stream);

    let (header, body) = read_frame(&mut cursor).unwrap();
    assert_eq!(header.correlation_id, 1);
    assert!(body.is_empty());

    let (header, body) = read_frame(&mut cursor).unwrap();
    assert_eq!(header.correlation_id, 2);
    assert_eq!(body, vec![0xab, 0xcd]);

    let err = read_frame(&mut cursor).unwrap_err();
    assert!(matches!(err, LightifyError::Io(_)));
}

#[test]
fn test_read_frame_short_body() {
    let mut cursor = Cursor::new(vec![10, 0, 0, 0x13, 1, 0, 0, 0, 0x01]);
    let err = read_frame(&mut cursor).unwrap_err();
    assert!(matches!(err, LightifyError::Io(_)));
}

#[test]
fn test_write_frame() {
    let frame = encode_frame(3, &Request::GroupDetails { id: GroupId(5) }).unwrap();
    let mut out = Vec::new();
    write_frame(&mut out, &frame).unwrap();
    assert_eq!(out, vec![8, 0, 0, 0x26, 3, 0, 0, 0, 5, 0]);
}

// =============================================================================
// Light List Decoding Tests
// =============================================================================

#[test]
fn test_decode_light_list_empty() {
    let response = decode_response(ResponseKind::LightList, &list_prefix(0, 0)).unwrap();
    match response {
        Response::LightList(list) => assert!(list.lights.is_empty()),
        other => panic!("Expected light list, got {:?}", other),
    }
}

#[test]
fn test_decode_light_record_fields() {
    let mut body = list_prefix(1, 1);
    body.extend_from_slice(&raw_light_record(0x01, "Kitchen"));

    let response = decode_response(ResponseKind::LightList, &body).unwrap();
    let Response::LightList(list) = response else {
        panic!("Expected light list");
    };

    assert_eq!(list.flag, 1);
    assert_eq!(list.lights.len(), 1);
    let light = &list.lights[0];
    assert_eq!(light.u1, 0x1234);
    assert_eq!(light.id.to_hex(), "0102030405060708");
    assert_eq!(light.firmware, Firmware([0x02, 0x03, 0x00, 0x4b]));
    assert_eq!(light.reserved, [0xaa, 0xbb]);
    assert_eq!(light.groups, 5);
    assert_eq!(light.on, 1);
    assert_eq!(light.bri, 200);
    assert_eq!(light.temp, 2700);
    assert_eq!(light.color, Rgb::new(10, 20, 30));
    assert_eq!(light.reserved2, 0xcc);
    assert_eq!(light.name.as_text(), "Kitchen");
    assert_eq!(light.reserved3, [0xdd; 8]);
}

#[test]
fn test_decode_light_list_multiple_records_in_order() {
    let mut body = list_prefix(0, 3);
    for (n, name) in [(1u8, "Hall"), (2, "Desk"), (3, "Porch")] {
        body.extend_from_slice(&raw_light_record(n, name));
    }

    let Response::LightList(list) = decode_response(ResponseKind::LightList, &body).unwrap() else {
        panic!("Expected light list");
    };
    let names: Vec<String> = list.lights.iter().map(|l| l.name.as_text()).collect();
    assert_eq!(names, vec!["Hall", "Desk", "Porch"]);
    assert_eq!(list.lights[2].id.as_bytes()[0], 3);
}

#[test]
fn test_decode_light_list_truncated_is_error() {
    let mut body = list_prefix(0, 2);
    body.extend_from_slice(&raw_light_record(1, "One"));
    body.extend_from_slice(&raw_light_record(2, "Two")[..LIGHT_RECORD_SIZE - 1]);

    let err = decode_response(ResponseKind::LightList, &body).unwrap_err();
    assert!(matches!(err, LightifyError::Decode(_)));
}

#[test]
fn test_decode_light_list_missing_count() {
    let err = decode_response(ResponseKind::LightList, &[0x00, 0x01]).unwrap_err();
    assert!(matches!(err, LightifyError::Decode(_)));
}

#[test]
fn test_decode_light_list_ignores_trailing_bytes() {
    let mut body = list_prefix(0, 1);
    body.extend_from_slice(&raw_light_record(9, "Lamp"));
    body.extend_from_slice(&[0xee; 5]);

    let Response::LightList(list) = decode_response(ResponseKind::LightList, &body).unwrap() else {
        panic!("Expected light list");
    };
    assert_eq!(list.lights.len(), 1);
    assert_eq!(list.lights[0].name.as_text(), "Lamp");
}

#[test]
fn test_encoded_light_list_matches_raw_layout() {
    let record = LightRecord {
        u1: 0x1234,
        id: LightId([0x01, 2, 3, 4, 5, 6, 7, 8]),
        firmware: Firmware([0x02, 0x03, 0x00, 0x4b]),
        reserved: [0xaa, 0xbb],
        groups: 5,
        on: 1,
        bri: 200,
        temp: 2700,
        color: Rgb::new(10, 20, 30),
        reserved2: 0xcc,
        name: Name16::new("Kitchen"),
        reserved3: [0xdd; 8],
    };
    let body = encode_response(&Response::LightList(LightList {
        flag: 1,
        lights: vec![record],
    }))
    .unwrap();

    let mut expected = list_prefix(1, 1);
    expected.extend_from_slice(&raw_light_record(0x01, "Kitchen"));
    assert_eq!(body, expected);
}

// =============================================================================
// Group List Decoding Tests
// =============================================================================

#[test]
fn test_decode_group_list() {
    let mut body = list_prefix(0, 2);
    body.extend_from_slice(&1u16.to_le_bytes());
    body.extend_from_slice(Name16::new("Living").as_bytes());
    body.extend_from_slice(&0x0203u16.to_le_bytes());
    body.extend_from_slice(Name16::new("Bedroom").as_bytes());

    let Response::GroupList(list) = decode_response(ResponseKind::GroupList, &body).unwrap() else {
        panic!("Expected group list");
    };
    assert_eq!(list.groups.len(), 2);
    assert_eq!(list.groups[0].id, GroupId(1));
    assert_eq!(list.groups[0].name.as_text(), "Living");
    assert_eq!(list.groups[1].id, GroupId(0x0203));
    assert_eq!(list.groups[1].name.as_text(), "Bedroom");
}

#[test]
fn test_decode_group_list_empty() {
    let Response::GroupList(list) =
        decode_response(ResponseKind::GroupList, &list_prefix(0, 0)).unwrap()
    else {
        panic!("Expected group list");
    };
    assert!(list.groups.is_empty());
}

#[test]
fn test_decode_group_list_count_exceeds_buffer() {
    let mut body = list_prefix(0, 3);
    body.extend_from_slice(&1u16.to_le_bytes());
    body.extend_from_slice(Name16::new("Only").as_bytes());

    let err = decode_response(ResponseKind::GroupList, &body).unwrap_err();
    assert!(matches!(err, LightifyError::Decode(_)));
}

// =============================================================================
// Details Decoding Tests
// =============================================================================

fn details_prefix(offline: i8) -> Vec<u8> {
    let mut body = vec![0x00];
    body.extend_from_slice(&1u16.to_le_bytes());
    body.extend_from_slice(id().as_bytes());
    body.push(offline as u8);
    body
}

#[test]
fn test_decode_light_details_online() {
    let mut body = details_prefix(0);
    body.extend_from_slice(&[0x07, 1, 150]);
    body.extend_from_slice(&4000u16.to_le_bytes());
    body.extend_from_slice(&[1, 2, 3, 0x09, 0, 0, 0]);

    let Response::LightDetails(details) =
        decode_response(ResponseKind::LightDetails, &body).unwrap()
    else {
        panic!("Expected light details");
    };
    assert!(details.is_online());
    assert_eq!(details.id, id());
    let props = details.properties.unwrap();
    assert_eq!(props.u2, 0x07);
    assert_eq!(props.on, 1);
    assert_eq!(props.bri, 150);
    assert_eq!(props.temp, 4000);
    assert_eq!(props.color, Rgb::new(1, 2, 3));
    assert_eq!(props.u3, 0x09);
}

#[test]
fn test_decode_light_details_offline_has_no_properties() {
    let body = details_prefix(-1);

    let Response::LightDetails(details) =
        decode_response(ResponseKind::LightDetails, &body).unwrap()
    else {
        panic!("Expected light details");
    };
    assert!(!details.is_online());
    assert_eq!(details.offline, -1);
    assert!(details.properties.is_none());
}

#[test]
fn test_decode_light_details_online_but_truncated() {
    let mut body = details_prefix(0);
    body.extend_from_slice(&[0x00, 1, 150]);

    let err = decode_response(ResponseKind::LightDetails, &body).unwrap_err();
    assert!(matches!(err, LightifyError::Decode(_)));
}

#[test]
fn test_decode_group_details() {
    let mut body = vec![0x00];
    body.extend_from_slice(&3u16.to_le_bytes());
    body.extend_from_slice(Name16::new("Office").as_bytes());
    body.push(2);
    body.extend_from_slice(&[1, 1, 1, 1, 1, 1, 1, 1]);
    body.extend_from_slice(&[2, 2, 2, 2, 2, 2, 2, 2]);

    let Response::GroupDetails(details) =
        decode_response(ResponseKind::GroupDetails, &body).unwrap()
    else {
        panic!("Expected group details");
    };
    assert_eq!(details.id, GroupId(3));
    assert_eq!(details.name.as_text(), "Office");
    assert_eq!(details.lights, vec![LightId([1; 8]), LightId([2; 8])]);
}

#[test]
fn test_decode_group_details_truncated_lights() {
    let mut body = vec![0x00];
    body.extend_from_slice(&3u16.to_le_bytes());
    body.extend_from_slice(Name16::new("Office").as_bytes());
    body.push(2);
    body.extend_from_slice(&[1, 1, 1, 1, 1, 1, 1, 1]);

    let err = decode_response(ResponseKind::GroupDetails, &body).unwrap_err();
    assert!(matches!(err, LightifyError::Decode(_)));
}

// =============================================================================
// Response Encoding Tests
// =============================================================================

#[test]
fn test_encode_group_details_too_many_lights() {
    let details = GroupDetails {
        flag: 0,
        id: GroupId(3),
        name: Name16::new("Office"),
        lights: vec![LightId([1; 8]); 256],
    };
    let err = encode_response(&Response::GroupDetails(details.clone())).unwrap_err();
    assert!(matches!(err, LightifyError::Encode(_)));

    // 255 still fits the one-byte count
    let fits = GroupDetails {
        lights: vec![LightId([1; 8]); 255],
        ..details
    };
    let body = encode_response(&Response::GroupDetails(fits)).unwrap();
    assert_eq!(body[19], 255);
    assert_eq!(body.len(), 20 + 255 * 8);
}

#[test]
fn test_encode_group_list_too_many_groups() {
    let group = GroupRecord {
        id: GroupId(1),
        name: Name16::new("Hall"),
    };
    let list = GroupList {
        flag: 0,
        groups: vec![group; 65_536],
    };
    let err = encode_response(&Response::GroupList(list)).unwrap_err();
    assert!(matches!(err, LightifyError::Encode(_)));
}

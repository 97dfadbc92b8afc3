use ntpsync_proto::error::ParseError;
use ntpsync_proto::protocol::{
    self, CLIENT_REQUEST_HEADER, LeapIndicator, Mode, PACKET_SIZE, Stratum, Version,
};
use ntpsync_proto::time::{NtpTimestamp, UtcInstant};

/// Helper: a 48-byte server reply carrying the given Transmit Timestamp.
/// Uses LI=0, VN=3, Mode=Server, stratum 2 for the header.
fn make_reply(seconds: u32, fraction: u32) -> [u8; PACKET_SIZE] {
    let mut buf = [0u8; PACKET_SIZE];
    // Byte 0: LI=0, VN=3, Mode=4 (Server) => 0b00_011_100 = 0x1C
    buf[0] = 0x1C;
    buf[1] = 2;
    buf[40..44].copy_from_slice(&seconds.to_be_bytes());
    buf[44..48].copy_from_slice(&fraction.to_be_bytes());
    buf
}

#[test]
fn request_is_client_mode_v3() {
    let request = protocol::build_request();
    assert_eq!(request.len(), PACKET_SIZE);
    assert_eq!(request[0], CLIENT_REQUEST_HEADER);
    assert_eq!(LeapIndicator::from_header(request[0]), LeapIndicator::NoWarning);
    assert_eq!(Version::from_header(request[0]), Version::V3);
    assert_eq!(Mode::from_header(request[0]), Mode::Client);
    assert!(request[1..].iter().all(|&b| b == 0));
}

#[test]
fn decode_known_instant() {
    // 2024-04-01T12:00:00Z is 1_711_972_800 s after the Unix epoch.
    let reply = make_reply(3_920_961_600, 0);
    let instant = protocol::decode_reply(&reply).unwrap();
    assert_eq!(instant.unix_millis(), 1_711_972_800_000);
    assert_eq!(instant.subsec_millis(), 0);
}

#[test]
fn decode_half_second_fraction() {
    let reply = make_reply(3_920_961_600, 0x8000_0000);
    let instant = protocol::decode_reply(&reply).unwrap();
    assert_eq!(instant.unix_millis(), 1_711_972_800_500);
    assert_eq!(instant.subsec_millis(), 500);
}

#[test]
fn decode_max_fraction_rounds_down_to_999() {
    let reply = make_reply(3_920_961_600, 0xFFFF_FFFF);
    let instant = protocol::decode_reply(&reply).unwrap();
    assert_eq!(instant.subsec_millis(), 999);
    assert_eq!(instant.unix_millis(), 1_711_972_800_999);
}

#[test]
fn decode_max_seconds_does_not_overflow() {
    let reply = make_reply(u32::MAX, u32::MAX);
    let instant = protocol::decode_reply(&reply).unwrap();
    assert_eq!(instant, UtcInstant::MAX);
    assert_eq!(instant.millis_since_ntp_epoch(), 4_294_967_295_999);
}

#[test]
fn decode_zero_is_ntp_epoch() {
    let reply = make_reply(0, 0);
    let instant = protocol::decode_reply(&reply).unwrap();
    assert_eq!(instant, UtcInstant::NTP_EPOCH);
    assert_eq!(instant.unix_secs(), -2_208_988_800);
}

#[cfg(feature = "chrono")]
#[test]
fn decoded_instants_render_as_utc() {
    let cases = [
        ((3_920_961_600, 0), "2024-04-01T12:00:00.000Z"),
        ((u32::MAX, u32::MAX), "2036-02-07T06:28:15.999Z"),
        ((0, 0), "1900-01-01T00:00:00.000Z"),
    ];
    for ((seconds, fraction), expected) in cases {
        let instant = protocol::decode_reply(&make_reply(seconds, fraction)).unwrap();
        assert_eq!(instant.to_string(), expected);
    }
}

#[test]
fn decode_packet_header_fields() {
    let mut reply = make_reply(3_920_961_600, 0);
    reply[0] = 0b11_100_100; // LI=3, VN=4, Mode=4
    reply[1] = 16;
    let decoded = protocol::decode_packet(&reply).unwrap();
    assert_eq!(decoded.leap_indicator, LeapIndicator::Unknown);
    assert_eq!(decoded.version, Version::V4);
    assert_eq!(decoded.mode, Mode::Server);
    assert_eq!(decoded.stratum, Stratum::UNSYNCHRONIZED);
    assert_eq!(
        decoded.transmit_timestamp,
        NtpTimestamp {
            seconds: 3_920_961_600,
            fraction: 0
        }
    );
}

#[test]
fn decode_ignores_unused_fields() {
    let clean = make_reply(3_920_961_600, 123_456_789);
    let mut noisy = clean;
    noisy[2..40].fill(0xA5);
    assert_eq!(
        protocol::decode_reply(&clean).unwrap(),
        protocol::decode_reply(&noisy).unwrap()
    );
}

#[test]
fn decode_truncated_reply_fails() {
    let reply = make_reply(3_920_961_600, 0);
    for len in [0, 1, 40, 44, 47] {
        assert_eq!(
            protocol::decode_reply(&reply[..len]),
            Err(ParseError::BufferTooShort {
                needed: PACKET_SIZE,
                available: len
            })
        );
    }
}

#[test]
fn decoded_header_matches_request_header_for_echo() {
    // A responder that echoes the request back unchanged decodes as a v3 client packet
    // at the NTP epoch.
    let echoed = protocol::build_request();
    let decoded = protocol::decode_packet(&echoed).unwrap();
    assert_eq!(decoded.mode, Mode::Client);
    assert_eq!(decoded.instant(), UtcInstant::NTP_EPOCH);
}

//! Wire format of the single client/server exchange.
//!
//! Request and reply are both 48-byte NTP packets. Only the LI/VN/Mode byte is set on the
//! request; on the reply only the header byte, the stratum and the Transmit Timestamp are read.
//!
//! | Offset | Field | Encoding |
//! |---|---|---|
//! | 0 | LI/VN/Mode | 1 byte, `0x1B` on request |
//! | 1 | Stratum | 1 byte, reply only |
//! | 2-39 | other NTP fields | zero on request, ignored on reply |
//! | 40-43 | Transmit Timestamp seconds | big-endian `u32` |
//! | 44-47 | Transmit Timestamp fraction | big-endian `u32` |

use byteorder::{BigEndian, ByteOrder};

use crate::error::ParseError;
use crate::time::{NtpTimestamp, UtcInstant};

mod types;

pub use self::types::*;

/// NTP port number.
pub const PORT: u16 = 123;

/// Size of an NTP packet without extension fields, in both directions.
pub const PACKET_SIZE: usize = 48;

/// Offset of the Transmit Timestamp field.
pub const TRANSMIT_TIMESTAMP_OFFSET: usize = 40;

/// Header byte of every request: LI = 0 (no warning), VN = 3, Mode = 3 (client).
pub const CLIENT_REQUEST_HEADER: u8 =
    li_vn_mode(LeapIndicator::NoWarning, Version::V3, Mode::Client);

/// The fields read from a server reply.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct Reply {
    /// Leap second warning from the server.
    pub leap_indicator: LeapIndicator,
    /// Version number echoed by the server.
    pub version: Version,
    /// Association mode of the reply (normally [`Mode::Server`]).
    pub mode: Mode,
    /// Stratum of the server.
    pub stratum: Stratum,
    /// Time at which the reply departed the server.
    pub transmit_timestamp: NtpTimestamp,
}

impl Reply {
    /// The Transmit Timestamp as an absolute UTC instant.
    pub fn instant(&self) -> UtcInstant {
        UtcInstant::from(self.transmit_timestamp)
    }
}

/// Build a client-mode request.
///
/// The buffer is all zero except the first byte, which is [`CLIENT_REQUEST_HEADER`].
pub const fn build_request() -> [u8; PACKET_SIZE] {
    let mut buf = [0u8; PACKET_SIZE];
    buf[0] = CLIENT_REQUEST_HEADER;
    buf
}

/// Decode the header byte, stratum and Transmit Timestamp of a reply.
///
/// Bytes past the first [`PACKET_SIZE`] (extension fields, MAC) are ignored.
///
/// # Errors
///
/// Returns [`ParseError::BufferTooShort`] if `buf` holds fewer than [`PACKET_SIZE`] bytes.
pub fn decode_packet(buf: &[u8]) -> Result<Reply, ParseError> {
    if buf.len() < PACKET_SIZE {
        return Err(ParseError::BufferTooShort {
            needed: PACKET_SIZE,
            available: buf.len(),
        });
    }

    let li_vn_mode = buf[0];
    let ts = &buf[TRANSMIT_TIMESTAMP_OFFSET..PACKET_SIZE];
    Ok(Reply {
        leap_indicator: LeapIndicator::from_header(li_vn_mode),
        version: Version::from_header(li_vn_mode),
        mode: Mode::from_header(li_vn_mode),
        stratum: Stratum(buf[1]),
        transmit_timestamp: NtpTimestamp {
            seconds: BigEndian::read_u32(&ts[..4]),
            fraction: BigEndian::read_u32(&ts[4..]),
        },
    })
}

/// Decode the Transmit Timestamp of a reply into a UTC instant.
///
/// # Errors
///
/// Returns [`ParseError::BufferTooShort`] if `buf` holds fewer than [`PACKET_SIZE`] bytes.
pub fn decode_reply(buf: &[u8]) -> Result<UtcInstant, ParseError> {
    decode_packet(buf).map(|reply| reply.instant())
}

/// Write `timestamp` into the Transmit Timestamp field of `buf`.
///
/// Used to fabricate replies for local responders and tests.
///
/// # Errors
///
/// Returns [`ParseError::BufferTooShort`] if `buf` holds fewer than [`PACKET_SIZE`] bytes.
pub fn write_transmit_timestamp(buf: &mut [u8], timestamp: NtpTimestamp) -> Result<(), ParseError> {
    if buf.len() < PACKET_SIZE {
        return Err(ParseError::BufferTooShort {
            needed: PACKET_SIZE,
            available: buf.len(),
        });
    }
    let ts = &mut buf[TRANSMIT_TIMESTAMP_OFFSET..PACKET_SIZE];
    BigEndian::write_u32(&mut ts[..4], timestamp.seconds);
    BigEndian::write_u32(&mut ts[4..], timestamp.fraction);
    Ok(())
}

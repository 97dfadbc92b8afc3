// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! SNTP request codec and NTP timestamp conversion.
//!
//! This crate builds the 48-byte client-mode request sent to an NTP server and
//! decodes the server's Transmit Timestamp into an absolute UTC instant. It
//! performs no I/O; see `ntpsync-client` for the UDP exchange.
//!
//! ```
//! use ntpsync_proto::protocol::{self, PACKET_SIZE};
//!
//! let request = protocol::build_request();
//! assert_eq!(request.len(), PACKET_SIZE);
//! assert_eq!(request[0], 0x1B);
//!
//! let mut reply = [0u8; PACKET_SIZE];
//! reply[40..44].copy_from_slice(&2_208_988_800u32.to_be_bytes());
//! let instant = protocol::decode_reply(&reply).unwrap();
//! assert_eq!(instant.unix_millis(), 0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Error type for decoding server replies.
pub mod error;

/// Packet layout, header fields, request construction and reply decoding.
pub mod protocol;

/// NTP timestamps and the decoded UTC instant.
pub mod time;

pub use error::ParseError;
pub use protocol::{Reply, build_request, decode_packet, decode_reply};
pub use time::{NtpTimestamp, UtcInstant};

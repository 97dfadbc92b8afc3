// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Shared helpers for integration tests.

// Integration test helpers are `pub` so each `tests/*.rs` file can import them
// via `mod common`, but not every file uses every helper.
#![allow(unreachable_pub, dead_code)]

use std::net::{SocketAddr, UdpSocket};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use ntpsync_client::error::NtpError;

/// How the loopback responder answers the first datagram it receives.
#[derive(Clone, Copy, Debug)]
pub enum Behavior {
    /// Send a full 48-byte server reply with this transmit timestamp.
    Reply { seconds: u32, fraction: u32 },
    /// Send a datagram of this many bytes.
    Short(usize),
    /// Send nothing and keep the socket open for this long.
    Silent(Duration),
}

/// A single-shot NTP "server" on 127.0.0.1 running on its own thread.
pub struct Responder {
    pub addr: SocketAddr,
    handle: JoinHandle<Option<Vec<u8>>>,
}

impl Responder {
    pub fn spawn(behavior: Behavior) -> Responder {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
        let addr = socket.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let mut buf = [0u8; 1024];
            let (len, peer) = socket.recv_from(&mut buf).ok()?;
            match behavior {
                Behavior::Reply { seconds, fraction } => {
                    socket.send_to(&reply_packet(seconds, fraction), peer).ok()?;
                }
                Behavior::Short(size) => {
                    socket.send_to(&vec![0x24; size], peer).ok()?;
                }
                Behavior::Silent(hold) => thread::sleep(hold),
            }
            Some(buf[..len].to_vec())
        });

        Responder { addr, handle }
    }

    /// Wait for the responder thread and return the request it received.
    pub fn request(self) -> Option<Vec<u8>> {
        self.handle.join().unwrap()
    }
}

/// A loopback port with nothing listening on it.
pub fn closed_port() -> u16 {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket.local_addr().unwrap().port()
}

/// Allowance for timer granularity when checking that a timeout did not fire early.
pub const TIMER_SLACK: Duration = Duration::from_millis(5);

/// A server reply (LI 0, version 4, mode 4, stratum 2) with the given transmit timestamp.
pub fn reply_packet(seconds: u32, fraction: u32) -> [u8; 48] {
    let mut packet = [0u8; 48];
    packet[0] = 0x24;
    packet[1] = 2;
    packet[40..44].copy_from_slice(&seconds.to_be_bytes());
    packet[44..48].copy_from_slice(&fraction.to_be_bytes());
    packet
}

/// Returns `true` if live-network tests were disabled via `SKIP_NETWORK_TESTS`.
pub fn network_tests_disabled() -> bool {
    std::env::var_os("SKIP_NETWORK_TESTS").is_some()
}

/// Returns `true` if the error indicates a network-level failure that
/// should cause the test to be **skipped** (not panicked).
///
/// CI runners occasionally lack DNS or outbound UDP/123 access, causing errors
/// such as `ENETUNREACH` (101) or `EHOSTUNREACH` (113) in addition to timeouts.
pub fn is_network_skip_error(e: &NtpError) -> bool {
    match e {
        NtpError::Timeout(_) | NtpError::ResolutionFailed(_) => true,
        NtpError::Io(e) => {
            matches!(
                e.kind(),
                std::io::ErrorKind::ConnectionRefused
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::AddrNotAvailable
                    | std::io::ErrorKind::PermissionDenied
            ) || e.raw_os_error() == Some(101) // ENETUNREACH  (Network is unreachable)
              || e.raw_os_error() == Some(113) // EHOSTUNREACH (No route to host)
        }
        _ => false,
    }
}

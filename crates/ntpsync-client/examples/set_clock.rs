// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Fetch the time and write it to the system clock.
//!
//! Needs root (Linux/macOS) or an elevated prompt (Windows).
//!
//! Run with: `sudo cargo run --example set_clock --features clock -- time.nist.gov`

use ntpsync_client::NtpTransport;
use ntpsync_client::clock::OsClock;
use ntpsync_client::error::NtpError;
use ntpsync_client::sync::{SyncOptions, synchronize};

fn main() {
    env_logger::init();

    let server = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "time.windows.com".to_string());
    let options = SyncOptions {
        set_clock: true,
        ..SyncOptions::default()
    };

    match synchronize(&NtpTransport::new(), &server, &options, &OsClock) {
        Ok(outcome) => println!("Clock set to {} from {}", outcome.instant, outcome.server),
        Err(NtpError::ClockSetFailed(e)) => {
            println!("Fetched {} but could not set the clock: {}", e.instant, e.cause);
        }
        Err(e) => println!("{}: error: {}", server, e),
    }
}

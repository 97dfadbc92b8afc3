// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! How to request the time from an NTP server and inspect the reply.
//!
//! Run with: `RUST_LOG=debug cargo run --example request -- pool.ntp.org`

use ntpsync_client::NtpTransport;

fn main() {
    env_logger::init();

    let server = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "time.windows.com".to_string());

    match NtpTransport::new().fetch_reply(&server) {
        Ok(reply) => {
            println!("Reply from {}:", server);
            println!("  leap:     {:?}", reply.leap_indicator);
            println!("  version:  {}", reply.version.value());
            println!("  mode:     {:?}", reply.mode);
            println!("  stratum:  {}", reply.stratum.0);
            println!("  transmit: {}", reply.instant());
            println!("  local:    {}", reply.instant().to_local());
        }
        Err(e) => println!("{}: error: {}", server, e),
    }
}

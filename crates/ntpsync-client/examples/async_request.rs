// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Example demonstrating async NTP requests using tokio.
//!
//! Run with: `cargo run --example async_request --features tokio`

use std::time::Duration;

#[tokio::main]
async fn main() {
    env_logger::init();

    let servers = ["time.windows.com", "time.nist.gov", "time.cloudflare.com"];

    println!("Querying NTP servers concurrently...\n");

    // Fire all requests concurrently.
    let handles: Vec<_> = servers
        .iter()
        .map(|&server| {
            tokio::spawn(async move {
                let result =
                    ntpsync_client::async_ntp::fetch_time(server, Duration::from_secs(5)).await;
                (server, result)
            })
        })
        .collect();

    for handle in handles {
        let (server, result) = match handle.await {
            Ok(done) => done,
            Err(e) => {
                println!("task failed: {}", e);
                continue;
            }
        };
        match result {
            Ok(instant) => println!("{}: {} ({})", server, instant, instant.to_local()),
            Err(e) => println!("{}: error: {}", server, e),
        }
    }
}

// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

/*!
One-shot NTP time query and system clock update, blocking or async (tokio/smol).

# Example
Fetch the current time from an NTP server and print it in local time.

```rust,no_run
use std::time::Duration;

fn main() {
    match ntpsync_client::fetch_time("time.windows.com", Duration::from_secs(3)) {
        Ok(instant) => println!("New time: {}", instant.to_local()),
        Err(e) => eprintln!("Error getting network time: {}", e),
    }
}
```

# Feature Flags

| Feature | Default | Description |
|---------|---------|-------------|
| `tokio` | no | Async query using the tokio runtime. |
| `smol-runtime` | no | Async query using the smol runtime. |
| `clock` | no | [`clock::OsClock`], which writes the system clock (`libc`/`windows-sys`). |
*/

#![warn(missing_docs)]

// Re-export protocol types from ntpsync_proto for convenience.
pub use ntpsync_proto::{UtcInstant, protocol, time};

/// Error types for the query and the clock update.
pub mod error;

/// Setting the system clock from a fetched instant.
///
/// The [`clock::SystemClockSetter`] trait is always available; the OS implementation
/// requires the `clock` feature and elevated privileges (root/admin).
pub mod clock;

/// Fetch once, then optionally apply the result to a clock.
pub mod sync;

/// Async NTP query using the Tokio runtime.
///
/// See [`async_ntp::fetch_time`] and [`async_ntp::fetch_reply`] for details.
#[cfg(feature = "tokio")]
pub mod async_ntp;

/// Async NTP query using the smol runtime.
///
/// See [`smol_ntp::fetch_time`] and [`smol_ntp::fetch_reply`] for details.
#[cfg(feature = "smol-runtime")]
pub mod smol_ntp;

// Blocking transport and the shared request/response plumbing.
mod request;

pub use error::NtpError;
pub use request::{AddressPolicy, DEFAULT_TIMEOUT, NtpTransport, fetch_time, get_network_time};

// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! One-shot "fetch, then optionally set the clock" flow.
//!
//! # Example
//!
//! With the `clock` feature, pass [`OsClock`](crate::clock) to write the real system clock.
//! Any other [`SystemClockSetter`] works the same way:
//!
//! ```no_run
//! use ntpsync_client::UtcInstant;
//! use ntpsync_client::clock::{ClockError, SystemClockSetter};
//! use ntpsync_client::sync::{SyncOptions, synchronize};
//! use ntpsync_client::NtpTransport;
//!
//! struct PrintClock;
//!
//! impl SystemClockSetter for PrintClock {
//!     fn try_apply(&self, instant: UtcInstant) -> Result<(), ClockError> {
//!         println!("would set the clock to {instant}");
//!         Ok(())
//!     }
//! }
//!
//! let options = SyncOptions { set_clock: true, ..SyncOptions::default() };
//! match synchronize(&NtpTransport::new(), "time.windows.com", &options, &PrintClock) {
//!     Ok(outcome) => println!("{} -> {}", outcome.server, outcome.instant),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

use std::time::Duration;

use log::debug;
use ntpsync_proto::UtcInstant;

use crate::clock::SystemClockSetter;
use crate::error::{ClockSetError, NtpError};
use crate::request::NtpTransport;

/// What [`synchronize`] should do besides fetching the time.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SyncOptions {
    /// Overrides the transport's timeout for this call.
    pub timeout: Option<Duration>,
    /// Write the fetched instant to the clock.
    pub set_clock: bool,
}

/// Result of a successful [`synchronize`] call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SyncOutcome {
    /// The server that was queried.
    pub server: String,
    /// The server's transmit time.
    pub instant: UtcInstant,
    /// Whether the clock was written.
    pub clock_set: bool,
}

/// Fetch the time from `server` once and, if `options.set_clock`, apply it to `clock`.
///
/// The clock is written at most once. If it refuses, the error is
/// [`NtpError::ClockSetFailed`], which still carries the fetched instant.
pub fn synchronize<C: SystemClockSetter + ?Sized>(
    transport: &NtpTransport,
    server: &str,
    options: &SyncOptions,
    clock: &C,
) -> Result<SyncOutcome, NtpError> {
    let instant = match options.timeout {
        Some(timeout) => transport.with_timeout(timeout).fetch_time(server)?,
        None => transport.fetch_time(server)?,
    };

    let clock_set = if options.set_clock {
        clock
            .try_apply(instant)
            .map_err(|cause| ClockSetError { instant, cause })?;
        debug!("clock set to {}", instant);
        true
    } else {
        false
    };

    Ok(SyncOutcome {
        server: server.to_owned(),
        instant,
        clock_set,
    })
}

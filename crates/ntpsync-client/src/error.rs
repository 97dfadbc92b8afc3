// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Error types for the NTP client.
//!
//! Every public operation returns `Result<T, NtpError>`. The four failure kinds a caller has
//! to tell apart are separate variants; local socket failures are carried in
//! [`NtpError::Io`]. For code that works in terms of `io::Result`, `From<NtpError> for
//! io::Error` preserves the original error so it can be recovered with a downcast:
//!
//! ```no_run
//! use std::io;
//! use ntpsync_client::error::NtpError;
//!
//! fn query() -> io::Result<()> {
//!     let instant = ntpsync_client::get_network_time("time.windows.com")?;
//!     println!("{instant}");
//!     Ok(())
//! }
//!
//! if let Err(e) = query() {
//!     if let Some(NtpError::Timeout(t)) = e.get_ref().and_then(|i| i.downcast_ref::<NtpError>()) {
//!         eprintln!("timeout: {t}");
//!     }
//! }
//! ```

pub use ntpsync_proto::error::ParseError;

use std::fmt;
use std::io;
use std::time::Duration;

use crate::request::AddressPolicy;
use ntpsync_proto::UtcInstant;

/// Errors that can occur while fetching network time or applying it.
#[derive(Debug)]
pub enum NtpError {
    /// The server name did not resolve to a usable address.
    ResolutionFailed(ResolutionError),
    /// No reply arrived before the deadline.
    Timeout(TimeoutError),
    /// The reply could not be decoded (shorter than a full packet).
    MalformedReply(ParseError),
    /// The operating system refused to set the clock.
    ClockSetFailed(ClockSetError),
    /// Local socket failure (bind, send, receive).
    Io(io::Error),
}

/// A plain discriminant of [`NtpError`] for callers that only branch on the kind.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// See [`NtpError::ResolutionFailed`].
    ResolutionFailed,
    /// See [`NtpError::Timeout`].
    Timeout,
    /// See [`NtpError::MalformedReply`].
    MalformedReply,
    /// See [`NtpError::ClockSetFailed`].
    ClockSetFailed,
    /// See [`NtpError::Io`].
    Io,
}

/// Name resolution failures.
#[derive(Clone, Debug)]
pub enum ResolutionError {
    /// The resolver reported an error for this name.
    Lookup {
        /// The server name that was looked up.
        server: String,
        /// Resolver message.
        detail: String,
    },
    /// The name resolved to zero addresses.
    NoAddresses {
        /// The server name that was looked up.
        server: String,
    },
    /// The name resolved, but to no address the policy allows.
    NoMatchingFamily {
        /// The server name that was looked up.
        server: String,
        /// The policy in force.
        policy: AddressPolicy,
    },
}

/// Timeout errors for the request/reply exchange.
#[derive(Clone, Debug)]
pub enum TimeoutError {
    /// Sending the request timed out.
    Send(Duration),
    /// No reply datagram arrived in time.
    Recv(Duration),
}

/// Failure to apply a fetched time to the system clock.
///
/// Carries the fetched instant so callers can still display it.
#[derive(Clone, Debug)]
pub struct ClockSetError {
    /// The time that could not be applied.
    pub instant: UtcInstant,
    /// Why the operating system refused.
    pub cause: ClockError,
}

/// Error type for system clock operations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClockError {
    /// The operation requires elevated privileges (root/admin).
    PermissionDenied,
    /// Platform-specific error with an OS error code.
    OsError(i32),
    /// The instant cannot be expressed by the platform's clock primitive.
    OutOfRange,
    /// Setting the clock is not supported on this platform.
    Unsupported,
}

impl NtpError {
    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            NtpError::ResolutionFailed(_) => ErrorKind::ResolutionFailed,
            NtpError::Timeout(_) => ErrorKind::Timeout,
            NtpError::MalformedReply(_) => ErrorKind::MalformedReply,
            NtpError::ClockSetFailed(_) => ErrorKind::ClockSetFailed,
            NtpError::Io(_) => ErrorKind::Io,
        }
    }
}

// ── Display implementations ─────────────────────────────────────────

impl fmt::Display for NtpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NtpError::ResolutionFailed(e) => write!(f, "name resolution failed: {e}"),
            NtpError::Timeout(e) => write!(f, "NTP timeout: {e}"),
            NtpError::MalformedReply(e) => write!(f, "malformed NTP reply: {e}"),
            NtpError::ClockSetFailed(e) => write!(f, "{e}"),
            NtpError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionError::Lookup { server, detail } => write!(f, "{server}: {detail}"),
            ResolutionError::NoAddresses { server } => {
                write!(f, "{server} resolved to no addresses")
            }
            ResolutionError::NoMatchingFamily { server, policy } => {
                write!(f, "{server} has no address allowed by policy {policy:?}")
            }
        }
    }
}

impl fmt::Display for TimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeoutError::Send(after) => write!(f, "NTP send timed out after {after:?}"),
            TimeoutError::Recv(after) => write!(f, "no NTP reply within {after:?}"),
        }
    }
}

impl fmt::Display for ClockSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to set system time to {}: {}", self.instant, self.cause)
    }
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockError::PermissionDenied => write!(f, "permission denied (requires root/admin)"),
            ClockError::OsError(code) => write!(f, "OS error: {}", code),
            ClockError::OutOfRange => write!(f, "time not representable by the system clock"),
            ClockError::Unsupported => write!(f, "setting the clock is not supported on this platform"),
        }
    }
}

// ── Error trait implementations ─────────────────────────────────────

impl std::error::Error for NtpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NtpError::ResolutionFailed(e) => Some(e),
            NtpError::Timeout(e) => Some(e),
            NtpError::MalformedReply(e) => Some(e),
            NtpError::ClockSetFailed(e) => Some(e),
            NtpError::Io(e) => Some(e),
        }
    }
}

impl std::error::Error for ResolutionError {}
impl std::error::Error for TimeoutError {}
impl std::error::Error for ClockError {}

impl std::error::Error for ClockSetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

// ── From conversions ────────────────────────────────────────────────

impl From<NtpError> for io::Error {
    fn from(err: NtpError) -> io::Error {
        let kind = match &err {
            NtpError::ResolutionFailed(_) => io::ErrorKind::NotFound,
            NtpError::Timeout(_) => io::ErrorKind::TimedOut,
            NtpError::MalformedReply(_) => io::ErrorKind::InvalidData,
            NtpError::ClockSetFailed(ClockSetError {
                cause: ClockError::PermissionDenied,
                ..
            }) => io::ErrorKind::PermissionDenied,
            NtpError::ClockSetFailed(_) => io::ErrorKind::Other,
            NtpError::Io(e) => e.kind(),
        };
        // Preserve the original io::Error directly for the Io variant.
        if let NtpError::Io(e) = err {
            return e;
        }
        io::Error::new(kind, err)
    }
}

impl From<io::Error> for NtpError {
    fn from(err: io::Error) -> NtpError {
        NtpError::Io(err)
    }
}

impl From<ParseError> for NtpError {
    fn from(err: ParseError) -> NtpError {
        NtpError::MalformedReply(err)
    }
}

impl From<ResolutionError> for NtpError {
    fn from(err: ResolutionError) -> NtpError {
        NtpError::ResolutionFailed(err)
    }
}

impl From<TimeoutError> for NtpError {
    fn from(err: TimeoutError) -> NtpError {
        NtpError::Timeout(err)
    }
}

impl From<ClockSetError> for NtpError {
    fn from(err: ClockSetError) -> NtpError {
        NtpError::ClockSetFailed(err)
    }
}

// ── Tests ───────────────────────────────────────────────────────────

// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Setting the host's wall clock to a fetched UTC instant.
//!
//! [`SystemClockSetter`] is the seam between the NTP exchange and the operating system: the
//! core only ever asks for one absolute write. [`OsClock`] (feature `clock`) is the real
//! implementation; tests and embedders can supply their own.
//!
//! The clock is process-external global state with no compare-and-set. Callers must not
//! apply from several threads at once, and must obtain privileges beforehand; nothing here
//! checks or requests them.
//!
//! # Platform Support
//!
//! - **Linux and the BSDs**: `clock_settime(CLOCK_REALTIME, ...)`.
//! - **macOS**: `settimeofday(...)`.
//! - **Windows**: `SetSystemTime` with a `SYSTEMTIME` built from [`CalendarTime`].
//! - **Other platforms**: [`ClockError::Unsupported`].

#![allow(unsafe_code)]

use chrono::{Datelike, Timelike};
use ntpsync_proto::UtcInstant;

pub use crate::error::ClockError;

/// The calendar fields of a UTC instant, laid out like the Windows `SYSTEMTIME` structure.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CalendarTime {
    /// Full year, e.g. 2024.
    pub year: u16,
    /// Month, 1-12.
    pub month: u16,
    /// Day of the week, 0 = Sunday.
    pub day_of_week: u16,
    /// Day of the month, 1-31.
    pub day: u16,
    /// Hour, 0-23.
    pub hour: u16,
    /// Minute, 0-59.
    pub minute: u16,
    /// Second, 0-59.
    pub second: u16,
    /// Millisecond, 0-999.
    pub milliseconds: u16,
}

impl From<UtcInstant> for CalendarTime {
    fn from(instant: UtcInstant) -> Self {
        let dt = instant.to_datetime();
        // UtcInstant spans 1900-2036, so every field fits in u16.
        CalendarTime {
            year: dt.year() as u16,
            month: dt.month() as u16,
            day_of_week: dt.weekday().num_days_from_sunday() as u16,
            day: dt.day() as u16,
            hour: dt.hour() as u16,
            minute: dt.minute() as u16,
            second: dt.second() as u16,
            milliseconds: instant.subsec_millis() as u16,
        }
    }
}

/// Something that can set the wall clock to an absolute UTC instant.
pub trait SystemClockSetter {
    /// Set the clock, reporting why the write was refused.
    fn try_apply(&self, instant: UtcInstant) -> Result<(), ClockError>;

    /// Set the clock. Returns `false` instead of an error when the write is refused.
    fn apply(&self, instant: UtcInstant) -> bool {
        self.try_apply(instant).is_ok()
    }
}

impl<T: SystemClockSetter + ?Sized> SystemClockSetter for &T {
    fn try_apply(&self, instant: UtcInstant) -> Result<(), ClockError> {
        (**self).try_apply(instant)
    }
}

impl<T: SystemClockSetter + ?Sized> SystemClockSetter for Box<T> {
    fn try_apply(&self, instant: UtcInstant) -> Result<(), ClockError> {
        (**self).try_apply(instant)
    }
}

/// The operating system's real-time clock.
///
/// Requires root (or `CAP_SYS_TIME`) on Unix and Administrator on Windows.
#[cfg(feature = "clock")]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct OsClock;

#[cfg(feature = "clock")]
impl SystemClockSetter for OsClock {
    fn try_apply(&self, instant: UtcInstant) -> Result<(), ClockError> {
        platform::set(instant)
    }
}

/// Set the system clock to `instant` with [`OsClock`]. Returns `false` on failure.
#[cfg(feature = "clock")]
pub fn set_system_time(instant: UtcInstant) -> bool {
    OsClock.apply(instant)
}

/// Convert an OS errno to a [`ClockError`].
#[cfg(all(
    feature = "clock",
    any(
        target_os = "linux",
        target_os = "android",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd",
        target_os = "dragonfly",
        target_os = "macos"
    )
))]
fn os_error_from_errno() -> ClockError {
    let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(-1);
    if errno == libc::EPERM {
        ClockError::PermissionDenied
    } else {
        ClockError::OsError(errno)
    }
}

#[cfg(all(
    feature = "clock",
    any(
        target_os = "linux",
        target_os = "android",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd",
        target_os = "dragonfly"
    )
))]
mod platform {
    use super::*;

    pub(super) fn set(instant: UtcInstant) -> Result<(), ClockError> {
        let mut tp: libc::timespec = unsafe { std::mem::zeroed() };
        tp.tv_sec = libc::time_t::try_from(instant.unix_secs()).map_err(|_| ClockError::OutOfRange)?;
        tp.tv_nsec = (instant.subsec_millis() as i64 * 1_000_000) as _;

        let ret = unsafe { libc::clock_settime(libc::CLOCK_REALTIME, &tp) };
        if ret < 0 {
            return Err(os_error_from_errno());
        }
        Ok(())
    }
}

#[cfg(all(feature = "clock", target_os = "macos"))]
mod platform {
    use super::*;

    pub(super) fn set(instant: UtcInstant) -> Result<(), ClockError> {
        let mut tv: libc::timeval = unsafe { std::mem::zeroed() };
        tv.tv_sec = libc::time_t::try_from(instant.unix_secs()).map_err(|_| ClockError::OutOfRange)?;
        tv.tv_usec = (instant.subsec_millis() as i64 * 1_000) as _;

        let ret = unsafe { libc::settimeofday(&tv, std::ptr::null()) };
        if ret < 0 {
            return Err(os_error_from_errno());
        }
        Ok(())
    }
}

#[cfg(all(feature = "clock", target_os = "windows"))]
mod platform {
    use super::*;
    use windows_sys::Win32::Foundation::SYSTEMTIME;
    use windows_sys::Win32::System::SystemInformation::SetSystemTime;

    /// Windows `ERROR_ACCESS_DENIED` (0x5).
    const ERROR_ACCESS_DENIED: i32 = 5;

    /// Windows `ERROR_PRIVILEGE_NOT_HELD` (0x522).
    const ERROR_PRIVILEGE_NOT_HELD: i32 = 1314;

    fn os_error() -> ClockError {
        let code = std::io::Error::last_os_error().raw_os_error().unwrap_or(-1);
        if code == ERROR_ACCESS_DENIED || code == ERROR_PRIVILEGE_NOT_HELD {
            ClockError::PermissionDenied
        } else {
            ClockError::OsError(code)
        }
    }

    pub(super) fn set(instant: UtcInstant) -> Result<(), ClockError> {
        let cal = CalendarTime::from(instant);
        let st = SYSTEMTIME {
            wYear: cal.year,
            wMonth: cal.month,
            wDayOfWeek: cal.day_of_week,
            wDay: cal.day,
            wHour: cal.hour,
            wMinute: cal.minute,
            wSecond: cal.second,
            wMilliseconds: cal.milliseconds,
        };

        let ret = unsafe { SetSystemTime(&st) };
        if ret == 0 {
            return Err(os_error());
        }
        Ok(())
    }
}

#[cfg(all(
    feature = "clock",
    not(any(
        target_os = "linux",
        target_os = "android",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd",
        target_os = "dragonfly",
        target_os = "macos",
        target_os = "windows"
    ))
))]
mod platform {
    use super::*;

    pub(super) fn set(_instant: UtcInstant) -> Result<(), ClockError> {
        Err(ClockError::Unsupported)
    }
}

// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use core::fmt;

/// The number of seconds from 1st January 1900 UTC to the start of the Unix epoch.
pub const NTP_EPOCH_UNIX_OFFSET_SECS: u64 = 2_208_988_800;

const NTP_EPOCH_UNIX_OFFSET_MILLIS: i64 = NTP_EPOCH_UNIX_OFFSET_SECS as i64 * 1000;

/// A 64-bit NTP timestamp: seconds since 1900-01-01T00:00:00Z plus a binary fraction of a
/// second (numerator over 2^32). Both fields are unsigned.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NtpTimestamp {
    /// Whole seconds since the NTP epoch.
    pub seconds: u32,
    /// Fraction of a second, in units of 2^-32 s.
    pub fraction: u32,
}

impl NtpTimestamp {
    /// The fraction rounded down to whole milliseconds. Always in `0..=999`.
    pub const fn fraction_millis(&self) -> u64 {
        (self.fraction as u64 * 1000) >> 32
    }

    /// Milliseconds since the NTP epoch: `seconds * 1000 + floor(fraction * 1000 / 2^32)`.
    pub const fn millis_since_epoch(&self) -> u64 {
        self.seconds as u64 * 1000 + self.fraction_millis()
    }
}

/// An absolute UTC time decoded from a server reply, with millisecond resolution.
///
/// Counted in milliseconds from the NTP epoch (1900-01-01T00:00:00Z). The representable range
/// is exactly that of an era-0 [`NtpTimestamp`], up to 2036-02-07T06:28:15.999Z.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct UtcInstant {
    ntp_millis: u64,
}

impl UtcInstant {
    /// The NTP epoch itself.
    pub const NTP_EPOCH: Self = UtcInstant { ntp_millis: 0 };

    /// The latest representable instant.
    pub const MAX: Self = UtcInstant {
        ntp_millis: u32::MAX as u64 * 1000 + 999,
    };

    /// Create an instant from milliseconds since the NTP epoch.
    ///
    /// Returns `None` past [`UtcInstant::MAX`].
    pub const fn from_ntp_millis(ntp_millis: u64) -> Option<Self> {
        if ntp_millis > Self::MAX.ntp_millis {
            None
        } else {
            Some(UtcInstant { ntp_millis })
        }
    }

    /// Create an instant from milliseconds since the Unix epoch.
    ///
    /// Returns `None` before the NTP epoch or past [`UtcInstant::MAX`].
    pub fn from_unix_millis(unix_millis: i64) -> Option<Self> {
        let ntp_millis = unix_millis.checked_add(NTP_EPOCH_UNIX_OFFSET_MILLIS)?;
        u64::try_from(ntp_millis)
            .ok()
            .and_then(Self::from_ntp_millis)
    }

    /// Milliseconds since the NTP epoch.
    pub const fn millis_since_ntp_epoch(&self) -> u64 {
        self.ntp_millis
    }

    /// Milliseconds since the Unix epoch. Negative before 1970.
    pub const fn unix_millis(&self) -> i64 {
        self.ntp_millis as i64 - NTP_EPOCH_UNIX_OFFSET_MILLIS
    }

    /// Whole seconds since the Unix epoch, rounded towards negative infinity.
    pub const fn unix_secs(&self) -> i64 {
        self.unix_millis().div_euclid(1000)
    }

    /// The millisecond part of the second, in `0..=999`.
    pub const fn subsec_millis(&self) -> u32 {
        (self.ntp_millis % 1000) as u32
    }
}

impl From<NtpTimestamp> for UtcInstant {
    fn from(ts: NtpTimestamp) -> Self {
        UtcInstant {
            ntp_millis: ts.millis_since_epoch(),
        }
    }
}

#[cfg(feature = "chrono")]
impl UtcInstant {
    /// Convert to a `chrono` UTC date-time.
    pub fn to_datetime(&self) -> chrono::DateTime<chrono::Utc> {
        // Every UtcInstant lies well inside chrono's supported range.
        chrono::DateTime::from_timestamp_millis(self.unix_millis())
            .unwrap_or(chrono::DateTime::<chrono::Utc>::MIN_UTC)
    }

    /// Convert to the host's local time zone for display.
    pub fn to_local(&self) -> chrono::DateTime<chrono::Local> {
        self.to_datetime().with_timezone(&chrono::Local)
    }
}

#[cfg(feature = "chrono")]
impl From<UtcInstant> for chrono::DateTime<chrono::Utc> {
    fn from(instant: UtcInstant) -> Self {
        instant.to_datetime()
    }
}

#[cfg(feature = "chrono")]
impl fmt::Display for UtcInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_datetime().format("%Y-%m-%dT%H:%M:%S%.3fZ"))
    }
}

#[cfg(not(feature = "chrono"))]
impl fmt::Display for UtcInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.unix_secs(), self.subsec_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_millis_bounds() {
        let zero = NtpTimestamp {
            seconds: 0,
            fraction: 0,
        };
        assert_eq!(zero.fraction_millis(), 0);

        let max = NtpTimestamp {
            seconds: 0,
            fraction: u32::MAX,
        };
        assert_eq!(max.fraction_millis(), 999);

        let half = NtpTimestamp {
            seconds: 0,
            fraction: 0x8000_0000,
        };
        assert_eq!(half.fraction_millis(), 500);
    }

    #[test]
    fn test_millis_no_overflow_at_max_seconds() {
        let ts = NtpTimestamp {
            seconds: u32::MAX,
            fraction: u32::MAX,
        };
        assert_eq!(ts.millis_since_epoch(), 4_294_967_295_999);
        assert_eq!(UtcInstant::from(ts), UtcInstant::MAX);
    }

    #[test]
    fn test_unix_epoch() {
        let ts = NtpTimestamp {
            seconds: NTP_EPOCH_UNIX_OFFSET_SECS as u32,
            fraction: 0,
        };
        let instant = UtcInstant::from(ts);
        assert_eq!(instant.unix_millis(), 0);
        assert_eq!(instant.unix_secs(), 0);
        assert_eq!(instant.subsec_millis(), 0);
    }

    #[test]
    fn test_before_unix_epoch() {
        // 1969-12-31T23:59:59.500Z
        let instant = UtcInstant::from_unix_millis(-500).unwrap();
        assert_eq!(instant.unix_secs(), -1);
        assert_eq!(instant.subsec_millis(), 500);
    }

    #[test]
    fn test_from_unix_millis_range() {
        assert_eq!(
            UtcInstant::from_unix_millis(-NTP_EPOCH_UNIX_OFFSET_MILLIS),
            Some(UtcInstant::NTP_EPOCH)
        );
        assert_eq!(
            UtcInstant::from_unix_millis(-NTP_EPOCH_UNIX_OFFSET_MILLIS - 1),
            None
        );
        assert_eq!(UtcInstant::from_unix_millis(i64::MAX), None);
        assert_eq!(UtcInstant::from_ntp_millis(u64::MAX), None);
    }

    #[test]
    fn test_unix_millis_roundtrip() {
        let unix_millis = 1_711_972_800_123;
        let instant = UtcInstant::from_unix_millis(unix_millis).unwrap();
        assert_eq!(instant.unix_millis(), unix_millis);
        assert_eq!(instant.subsec_millis(), 123);
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn test_chrono_conversion() {
        let ts = NtpTimestamp {
            seconds: 3_920_961_600,
            fraction: 0,
        };
        let instant = UtcInstant::from(ts);
        assert_eq!(instant.to_string(), "2024-04-01T12:00:00.000Z");
        let dt: chrono::DateTime<chrono::Utc> = instant.into();
        assert_eq!(dt.timestamp(), 1_711_972_800);
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn test_chrono_ntp_epoch() {
        assert_eq!(UtcInstant::NTP_EPOCH.to_string(), "1900-01-01T00:00:00.000Z");
    }
}

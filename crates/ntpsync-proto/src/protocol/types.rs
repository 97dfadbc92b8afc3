//! Header field types for the first bytes of an NTP packet.
//!
//! Documentation is derived from IETF RFC 5905 Section 7.3.

/// A 2-bit integer warning of an impending leap second to be inserted or deleted in the last
/// minute of the current month.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum LeapIndicator {
    /// No leap required.
    #[default]
    NoWarning = 0,
    /// Last minute of the day has 61 seconds.
    AddOne = 1,
    /// Last minute of the day has 59 seconds.
    SubOne = 2,
    /// Clock unsynchronized.
    Unknown = 3,
}

impl LeapIndicator {
    /// Extract the leap indicator from the two most significant bits of `li_vn_mode`.
    pub const fn from_header(li_vn_mode: u8) -> Self {
        match li_vn_mode >> 6 {
            0 => LeapIndicator::NoWarning,
            1 => LeapIndicator::AddOne,
            2 => LeapIndicator::SubOne,
            _ => LeapIndicator::Unknown,
        }
    }
}

/// A 3-bit integer representing the NTP version number.
///
/// Note that while this struct is 8-bits, this field is packed to 3 in the actual header.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Version(u8);

impl Version {
    /// Version 1.
    pub const V1: Self = Version(1);
    /// Version 2.
    pub const V2: Self = Version(2);
    /// Version 3, the version sent by this client.
    pub const V3: Self = Version(3);
    /// Version 4.
    pub const V4: Self = Version(4);

    /// Extract the version number from bits 3-5 of `li_vn_mode`.
    pub const fn from_header(li_vn_mode: u8) -> Self {
        Version((li_vn_mode >> 3) & 0b111)
    }

    /// The numeric version.
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// A 3-bit integer representing the association mode.
///
/// All eight bit patterns are defined, so decoding a mode never fails.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum Mode {
    /// Reserved mode (value 0).
    Reserved = 0,
    /// Symmetric active mode (value 1).
    SymmetricActive = 1,
    /// Symmetric passive mode (value 2).
    SymmetricPassive = 2,
    /// Client mode (value 3).
    #[default]
    Client = 3,
    /// Server mode (value 4).
    Server = 4,
    /// Broadcast mode (value 5).
    Broadcast = 5,
    /// NTP control message mode (value 6).
    NtpControlMessage = 6,
    /// Reserved for private use (value 7).
    ReservedForPrivateUse = 7,
}

impl Mode {
    /// Extract the mode from the three least significant bits of `li_vn_mode`.
    pub const fn from_header(li_vn_mode: u8) -> Self {
        match li_vn_mode & 0b111 {
            0 => Mode::Reserved,
            1 => Mode::SymmetricActive,
            2 => Mode::SymmetricPassive,
            3 => Mode::Client,
            4 => Mode::Server,
            5 => Mode::Broadcast,
            6 => Mode::NtpControlMessage,
            _ => Mode::ReservedForPrivateUse,
        }
    }
}

/// An 8-bit integer representing the stratum of the replying server.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Stratum(pub u8);

impl Stratum {
    /// Unspecified or invalid. Also used by Kiss-o'-Death replies.
    pub const UNSPECIFIED: Self = Stratum(0);
    /// The primary server (e.g. equipped with a GPS receiver).
    pub const PRIMARY: Self = Stratum(1);
    /// Unsynchronized.
    pub const UNSYNCHRONIZED: Self = Stratum(16);

    /// Whether the stratum is in the secondary range (2-15).
    pub fn is_secondary(&self) -> bool {
        (2..=15).contains(&self.0)
    }
}

/// Pack the leap indicator, version and mode into the first header byte.
pub const fn li_vn_mode(leap_indicator: LeapIndicator, version: Version, mode: Mode) -> u8 {
    ((leap_indicator as u8) << 6) | ((version.0 & 0b111) << 3) | (mode as u8 & 0b111)
}

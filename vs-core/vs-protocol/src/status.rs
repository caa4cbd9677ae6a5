//! Acknowledgement status codes.

use core::fmt;

/// Status carried in an acknowledgement frame
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckStatus {
    Ok = 0x00,
    /// Received frame failed its checksum
    ChecksumError = 0x01,
    UnknownCommand = 0x02,
    /// Payload has the wrong length or shape
    InvalidPayload = 0x03,
    /// Address refused (null, misaligned, out of range)
    InvalidAddress = 0x04,
    TypeUnsupported = 0x05,
    /// Defined by the protocol, never produced by the rate handler
    RateUnachievable = 0x06,
    /// Device busy or a resource limit was hit (e.g. too many variables)
    BusyOrLimit = 0x07,
    GeneralFailure = 0xFF,
}

impl AckStatus {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_ok(self) -> bool {
        self == AckStatus::Ok
    }
}

impl TryFrom<u8> for AckStatus {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(AckStatus::Ok),
            0x01 => Ok(AckStatus::ChecksumError),
            0x02 => Ok(AckStatus::UnknownCommand),
            0x03 => Ok(AckStatus::InvalidPayload),
            0x04 => Ok(AckStatus::InvalidAddress),
            0x05 => Ok(AckStatus::TypeUnsupported),
            0x06 => Ok(AckStatus::RateUnachievable),
            0x07 => Ok(AckStatus::BusyOrLimit),
            0xFF => Ok(AckStatus::GeneralFailure),
            other => Err(other),
        }
    }
}

impl fmt::Display for AckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AckStatus::Ok => "ok",
            AckStatus::ChecksumError => "checksum error",
            AckStatus::UnknownCommand => "unknown command",
            AckStatus::InvalidPayload => "invalid payload",
            AckStatus::InvalidAddress => "invalid address",
            AckStatus::TypeUnsupported => "type unsupported",
            AckStatus::RateUnachievable => "rate unachievable",
            AckStatus::BusyOrLimit => "busy or limit",
            AckStatus::GeneralFailure => "general failure",
        };
        f.write_str(name)
    }
}

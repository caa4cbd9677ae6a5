//! Error types for vs-protocol

use core::fmt;

use crate::AckStatus;

/// Error assembling a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Frame does not fit the output buffer
    TooLarge { needed: usize, capacity: usize },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::TooLarge { needed, capacity } => {
                write!(f, "Frame too large: {} bytes, capacity {}", needed, capacity)
            }
        }
    }
}

/// Error parsing a host request payload
///
/// Each variant maps onto the acknowledgement status the device reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestError {
    UnknownCommand(u8),
    /// Payload length does not match the command's layout
    LengthMismatch { expected: usize, actual: usize },
    /// Start-monitor asked for more variables than the table holds
    TooManyVariables { requested: usize, max: usize },
    UnsupportedType(u8),
}

impl RequestError {
    pub fn status(&self) -> AckStatus {
        match self {
            RequestError::UnknownCommand(_) => AckStatus::UnknownCommand,
            RequestError::LengthMismatch { .. } => AckStatus::InvalidPayload,
            RequestError::TooManyVariables { .. } => AckStatus::BusyOrLimit,
            RequestError::UnsupportedType(_) => AckStatus::TypeUnsupported,
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::UnknownCommand(id) => write!(f, "Unknown command: {:#04x}", id),
            RequestError::LengthMismatch { expected, actual } => {
                write!(f, "Payload length {} (expected {})", actual, expected)
            }
            RequestError::TooManyVariables { requested, max } => {
                write!(f, "Too many variables: {} (max {})", requested, max)
            }
            RequestError::UnsupportedType(tag) => write!(f, "Unsupported type tag: {:#04x}", tag),
        }
    }
}

/// Error parsing a device response frame (host side)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseError {
    UnknownCommand(u8),
    UnknownStatus(u8),
    /// Payload length does not match the response layout
    Malformed { command: u8, len: usize },
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseError::UnknownCommand(id) => write!(f, "Unknown response command: {:#04x}", id),
            ResponseError::UnknownStatus(code) => write!(f, "Unknown ack status: {:#04x}", code),
            ResponseError::Malformed { command, len } => {
                write!(f, "Malformed payload for {:#04x}: {} bytes", command, len)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FrameError {}

#[cfg(feature = "std")]
impl std::error::Error for RequestError {}

#[cfg(feature = "std")]
impl std::error::Error for ResponseError {}

//! Error types for fw-core

use core::fmt;

use vs_protocol::AckStatus;

/// Memory access refused by a [`VariableMemory`](crate::VariableMemory)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    /// Address zero
    NullAddress,
    /// Address is not aligned for the declared type
    Misaligned { address: u32, align: usize },
    /// Address falls outside the accessible region
    OutOfRange { address: u32 },
}

impl MemoryError {
    /// Acknowledgement status reported to the host
    pub fn status(&self) -> AckStatus {
        AckStatus::InvalidAddress
    }
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::NullAddress => write!(f, "Null address"),
            MemoryError::Misaligned { address, align } => {
                write!(f, "Address {:#010x} not aligned to {}", address, align)
            }
            MemoryError::OutOfRange { address } => {
                write!(f, "Address {:#010x} out of range", address)
            }
        }
    }
}

/// Error queuing a device-initiated error report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportError {
    /// Engine was built without error reports
    Disabled,
    /// A report is already waiting to be sent
    Pending,
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Disabled => write!(f, "Error reports are disabled"),
            ReportError::Pending => write!(f, "An error report is already pending"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MemoryError {}

#[cfg(feature = "std")]
impl std::error::Error for ReportError {}

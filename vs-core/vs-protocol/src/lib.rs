//! VarScope wire model.
//!
//! This crate defines everything both ends of the VarScope link agree on:
//! - Protocol constants (markers, buffer capacity, table capacity)
//! - Command ids, acknowledgement status codes and variable type tags
//! - The frame encoder and the byte-driven frame decoder
//! - Typed request/response payload codecs
//!
//! It is `no_std` and allocation-free so the firmware core can use it directly.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod command;
pub mod error;
pub mod frame;
pub mod request;
pub mod response;
pub mod status;
pub mod value;

pub use command::{Command, DeviceCommand};
pub use error::{FrameError, RequestError, ResponseError};
pub use frame::{DecodeEvent, DropReason, FrameDecoder, FrameRef, checksum, encode_frame};
pub use request::{MonitorRequest, Request, SetVariableRequest, VarDescriptor};
pub use response::Response;
pub use status::AckStatus;
pub use value::{Value, VarType};

/// Start-of-packet marker
pub const SOP: u8 = 0xA5;

/// End-of-packet marker
pub const EOP: u8 = 0x5A;

/// Capacity of the shared receive-payload / transmit-assembly buffer
pub const SHARED_BUFFER_SIZE: usize = 128;

/// Framing bytes around a payload: SOP + CMD + LEN(2) + CHECKSUM + EOP
pub const FRAME_OVERHEAD: usize = 6;

/// Maximum number of variables monitored at once
pub const MAX_MONITORED_VARS: usize = 10;

/// Sample period used until a rate is requested (100 Hz)
pub const DEFAULT_SAMPLE_PERIOD_MS: u32 = 10;

/// Bytes per variable descriptor in a start-monitor payload (address + type)
pub const VAR_DESCRIPTOR_LEN: usize = 5;

/// Largest monitor-data payload: timestamp + one f32 per variable
pub const MONITOR_DATA_CAPACITY: usize = 4 + MAX_MONITORED_VARS * 4;

/// Largest error-report message that still fits a frame next to its code byte
pub const ERROR_MESSAGE_CAPACITY: usize = SHARED_BUFFER_SIZE - FRAME_OVERHEAD - 1;

pub(crate) fn read_u32_le(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

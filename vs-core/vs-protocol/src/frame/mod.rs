//! Wire framing.
//!
//! ```text
//! ┌─────┬─────┬──────────┬─────────────┬──────────┬─────┐
//! │ SOP │ CMD │ LEN (LE) │ PAYLOAD     │ CHECKSUM │ EOP │
//! │ 1   │ 1   │ 2        │ LEN bytes   │ 1        │ 1   │
//! └─────┴─────┴──────────┴─────────────┴──────────┴─────┘
//! ```
//!
//! CHECKSUM is the XOR of CMD, both LEN bytes and every PAYLOAD byte.

mod decoder;
mod encode;

pub use decoder::{DecodeEvent, DropReason, FrameDecoder, RxState};
pub use encode::encode_frame;

/// A validated frame borrowed from a decoder buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRef<'a> {
    pub command: u8,
    pub payload: &'a [u8],
}

/// XOR checksum over command, length and payload
pub fn checksum(command: u8, payload: &[u8]) -> u8 {
    let len = payload.len() as u16;
    let [len_lo, len_hi] = len.to_le_bytes();
    payload
        .iter()
        .fold(command ^ len_lo ^ len_hi, |acc, byte| acc ^ byte)
}

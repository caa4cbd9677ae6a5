use super::FrameRef;
use crate::{EOP, SHARED_BUFFER_SIZE, SOP};

/// Receive state of [`FrameDecoder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxState {
    AwaitStart,
    AwaitCommand,
    AwaitLengthLow,
    AwaitLengthHigh,
    AwaitPayload,
    AwaitChecksum,
    AwaitEnd,
}

/// Why a frame was discarded without an acknowledgement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Declared payload length exceeds the decoder buffer
    Oversize { command: u8, len: usize },
    /// Byte in the end-marker position was not EOP
    BadEndMarker { command: u8, byte: u8 },
}

/// Outcome of feeding one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeEvent<'a> {
    /// Checksum and end marker verified
    Frame(FrameRef<'a>),
    /// Checksum byte did not match; the sender gets a checksum-error ack
    ChecksumMismatch {
        command: u8,
        expected: u8,
        received: u8,
    },
    Dropped(DropReason),
}

/// Byte-driven frame decoder
///
/// Every byte advances exactly one transition, and every completed or failed
/// frame returns the decoder to [`RxState::AwaitStart`], so a corrupted
/// frame never blocks the ones after it.
pub struct FrameDecoder<const N: usize = SHARED_BUFFER_SIZE> {
    state: RxState,
    command: u8,
    len: usize,
    received: usize,
    checksum: u8,
    buffer: [u8; N],
}

impl<const N: usize> FrameDecoder<N> {
    pub const fn new() -> Self {
        Self {
            state: RxState::AwaitStart,
            command: 0,
            len: 0,
            received: 0,
            checksum: 0,
            buffer: [0; N],
        }
    }

    pub fn state(&self) -> RxState {
        self.state
    }

    /// Abandon any partial frame
    pub fn reset(&mut self) {
        self.state = RxState::AwaitStart;
    }

    /// Feed one byte, returning an event when a frame completes or fails
    pub fn push(&mut self, byte: u8) -> Option<DecodeEvent<'_>> {
        match self.state {
            RxState::AwaitStart => {
                if byte == SOP {
                    self.checksum = 0;
                    self.state = RxState::AwaitCommand;
                }
                None
            }
            RxState::AwaitCommand => {
                self.command = byte;
                self.checksum ^= byte;
                self.state = RxState::AwaitLengthLow;
                None
            }
            RxState::AwaitLengthLow => {
                self.len = byte as usize;
                self.checksum ^= byte;
                self.state = RxState::AwaitLengthHigh;
                None
            }
            RxState::AwaitLengthHigh => {
                self.len |= (byte as usize) << 8;
                self.checksum ^= byte;
                if self.len > N {
                    self.state = RxState::AwaitStart;
                    return Some(DecodeEvent::Dropped(DropReason::Oversize {
                        command: self.command,
                        len: self.len,
                    }));
                }
                self.received = 0;
                self.state = if self.len == 0 {
                    RxState::AwaitChecksum
                } else {
                    RxState::AwaitPayload
                };
                None
            }
            RxState::AwaitPayload => {
                self.buffer[self.received] = byte;
                self.received += 1;
                self.checksum ^= byte;
                if self.received >= self.len {
                    self.state = RxState::AwaitChecksum;
                }
                None
            }
            RxState::AwaitChecksum => {
                if byte == self.checksum {
                    self.state = RxState::AwaitEnd;
                    None
                } else {
                    self.state = RxState::AwaitStart;
                    Some(DecodeEvent::ChecksumMismatch {
                        command: self.command,
                        expected: self.checksum,
                        received: byte,
                    })
                }
            }
            RxState::AwaitEnd => {
                self.state = RxState::AwaitStart;
                if byte == EOP {
                    Some(DecodeEvent::Frame(FrameRef {
                        command: self.command,
                        payload: &self.buffer[..self.len],
                    }))
                } else {
                    Some(DecodeEvent::Dropped(DropReason::BadEndMarker {
                        command: self.command,
                        byte,
                    }))
                }
            }
        }
    }
}

impl<const N: usize> Default for FrameDecoder<N> {
    fn default() -> Self {
        Self::new()
    }
}

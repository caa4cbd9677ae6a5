//! Receive side: bytes in, dispatched commands out.

use embassy_sync::blocking_mutex::raw::RawMutex;
use log::{debug, trace};
use vs_protocol::{AckStatus, DecodeEvent, FrameDecoder};

use crate::{Engine, TickSource, VariableMemory, dispatch};

/// Handle for the context that receives bytes from the transport
///
/// Owns the frame decoder and its payload buffer; commands run against the
/// borrowed [`Engine`] as soon as a frame's end marker arrives.
pub struct Ingress<'a, M: RawMutex, C, Mem> {
    engine: &'a Engine<M>,
    clock: &'a C,
    memory: &'a Mem,
    decoder: FrameDecoder,
}

impl<'a, M, C, Mem> Ingress<'a, M, C, Mem>
where
    M: RawMutex,
    C: TickSource,
    Mem: VariableMemory,
{
    pub(crate) fn new(engine: &'a Engine<M>, clock: &'a C, memory: &'a Mem) -> Self {
        Self {
            engine,
            clock,
            memory,
            decoder: FrameDecoder::new(),
        }
    }

    /// Feed one received byte
    pub fn feed_byte(&mut self, byte: u8) {
        match self.decoder.push(byte) {
            None => {}
            Some(DecodeEvent::Frame(frame)) => {
                trace!(
                    "Frame {:#04x} with {} payload bytes",
                    frame.command,
                    frame.payload.len()
                );
                dispatch::dispatch(self.engine, self.clock, self.memory, frame);
            }
            Some(DecodeEvent::ChecksumMismatch {
                command,
                expected,
                received,
            }) => {
                debug!(
                    "Checksum mismatch for {:#04x}: expected {:#04x}, got {:#04x}",
                    command, expected, received
                );
                self.engine.queue_ack(command, AckStatus::ChecksumError);
            }
            Some(DecodeEvent::Dropped(reason)) => {
                debug!("Dropped frame: {:?}", reason);
            }
        }
    }

    /// Feed a received packet byte by byte
    pub fn feed_packet(&mut self, data: &[u8]) {
        for &byte in data {
            self.feed_byte(byte);
        }
    }

    /// Abandon any partially received frame
    pub fn reset(&mut self) {
        self.decoder.reset();
    }
}

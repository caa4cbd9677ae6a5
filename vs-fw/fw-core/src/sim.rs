//! Simulation helpers for running the engine off-device.
//!
//! - [`SimMemory`]: a little-endian byte arena standing in for device RAM
//! - [`ManualClock`]: a tick source the caller advances by hand
//! - [`RecordingSink`]: a transport that keeps every frame it is given

use core::convert::Infallible;
use core::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::vec::Vec;

use vs_protocol::{Value, VarType};

use crate::{FrameSink, MemoryError, TickSource, VariableMemory};

/// Byte arena mapped at a fixed base address
///
/// Accesses are bounds-checked and must be naturally aligned for the
/// declared type, like on a 32-bit MCU without unaligned access support.
pub struct SimMemory {
    base: u32,
    bytes: Mutex<Vec<u8>>,
}

impl SimMemory {
    pub fn new(base: u32, size: usize) -> Self {
        Self {
            base,
            bytes: Mutex::new(std::vec![0; size]),
        }
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    /// Address of the byte at `offset` into the arena
    pub fn address_of(&self, offset: usize) -> u32 {
        self.base.wrapping_add(offset as u32)
    }

    /// Read a value, panicking on a refused address (test convenience)
    pub fn get(&self, address: u32, var_type: VarType) -> Value {
        match self.read(address, var_type) {
            Ok(value) => value,
            Err(err) => panic!("SimMemory read failed: {err}"),
        }
    }

    /// Write a value, panicking on a refused address (test convenience)
    pub fn set(&self, address: u32, value: Value) {
        if let Err(err) = self.write(address, value) {
            panic!("SimMemory write failed: {err}");
        }
    }

    /// Copy of the whole arena
    pub fn snapshot(&self) -> Vec<u8> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<u8>> {
        // A poisoned arena is still plain bytes
        self.bytes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn offset(&self, address: u32, size: usize) -> Result<usize, MemoryError> {
        if address == 0 {
            return Err(MemoryError::NullAddress);
        }
        if address as usize % size != 0 {
            return Err(MemoryError::Misaligned {
                address,
                align: size,
            });
        }
        let offset = address
            .checked_sub(self.base)
            .ok_or(MemoryError::OutOfRange { address })? as usize;
        if offset + size > self.lock().len() {
            return Err(MemoryError::OutOfRange { address });
        }
        Ok(offset)
    }
}

impl VariableMemory for SimMemory {
    fn read(&self, address: u32, var_type: VarType) -> Result<Value, MemoryError> {
        let size = var_type.size();
        let offset = self.offset(address, size)?;
        let bytes = self.lock();
        let raw = &bytes[offset..offset + size];

        Ok(match var_type {
            VarType::I8 => Value::I8(raw[0] as i8),
            VarType::U8 => Value::U8(raw[0]),
            VarType::Bool => Value::Bool(raw[0] != 0),
            VarType::I16 => Value::I16(i16::from_le_bytes([raw[0], raw[1]])),
            VarType::U16 => Value::U16(u16::from_le_bytes([raw[0], raw[1]])),
            VarType::I32 => Value::I32(i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]])),
            VarType::U32 => Value::U32(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]])),
            VarType::F32 => Value::F32(f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]])),
            VarType::F64 => {
                let mut wide = [0u8; 8];
                wide.copy_from_slice(raw);
                Value::F64(f64::from_le_bytes(wide))
            }
        })
    }

    fn write(&self, address: u32, value: Value) -> Result<(), MemoryError> {
        let offset = self.offset(address, value.var_type().size())?;
        let mut bytes = self.lock();
        let mut put = |raw: &[u8]| bytes[offset..offset + raw.len()].copy_from_slice(raw);

        match value {
            Value::I8(v) => put(&v.to_le_bytes()),
            Value::U8(v) => put(&[v]),
            Value::Bool(v) => put(&[v as u8]),
            Value::I16(v) => put(&v.to_le_bytes()),
            Value::U16(v) => put(&v.to_le_bytes()),
            Value::I32(v) => put(&v.to_le_bytes()),
            Value::U32(v) => put(&v.to_le_bytes()),
            Value::F32(v) => put(&v.to_le_bytes()),
            Value::F64(v) => put(&v.to_le_bytes()),
        }
        Ok(())
    }
}

/// Tick source advanced by hand
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU32,
}

impl ManualClock {
    pub fn new(start_ms: u32) -> Self {
        Self {
            now_ms: AtomicU32::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: u32) {
        self.now_ms.store(now_ms, Ordering::Relaxed);
    }

    /// Advance, wrapping at `u32::MAX` like a hardware tick counter
    pub fn advance(&self, delta_ms: u32) {
        let now = self.now_ms.load(Ordering::Relaxed);
        self.set(now.wrapping_add(delta_ms));
    }
}

impl TickSource for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now_ms.load(Ordering::Relaxed)
    }
}

/// Transport that records every frame
#[derive(Debug, Default)]
pub struct RecordingSink {
    frames: Vec<Vec<u8>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    /// Remove and return everything recorded so far
    pub fn take(&mut self) -> Vec<Vec<u8>> {
        core::mem::take(&mut self.frames)
    }
}

impl FrameSink for RecordingSink {
    type Error = Infallible;

    fn send_frame(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        self.frames.push(frame.to_vec());
        Ok(())
    }
}

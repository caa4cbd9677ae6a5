//! Volatile access through raw device addresses.

use core::mem::align_of;
use core::ptr;

use vs_protocol::{Value, VarType};

use super::VariableMemory;
use crate::MemoryError;

/// [`VariableMemory`] over the device's own address space
///
/// Every access is a single volatile load or store of the declared width.
/// Null and misaligned addresses are refused before any pointer is formed.
#[derive(Debug, Clone, Copy)]
pub struct RawMemory {
    _private: (),
}

impl RawMemory {
    /// # Safety
    ///
    /// The host decides which addresses are read and written. The caller
    /// must ensure that every non-null, aligned address a connected host can
    /// name is valid for volatile reads and writes of the declared type, and
    /// that writing any bit pattern of that type there is sound. In practice
    /// this means the link is only exposed to a trusted debug host.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

fn checked_ptr<T>(address: u32) -> Result<*mut T, MemoryError> {
    if address == 0 {
        return Err(MemoryError::NullAddress);
    }
    let align = align_of::<T>();
    if address as usize % align != 0 {
        return Err(MemoryError::Misaligned { address, align });
    }
    Ok(ptr::with_exposed_provenance_mut(address as usize))
}

/// # Safety
///
/// See [`RawMemory::new`].
unsafe fn load<T: Copy>(address: u32) -> Result<T, MemoryError> {
    let ptr = checked_ptr::<T>(address)?;
    // SAFETY: non-null and aligned; validity is the RawMemory::new contract
    Ok(unsafe { ptr::read_volatile(ptr) })
}

/// # Safety
///
/// See [`RawMemory::new`].
unsafe fn store<T: Copy>(address: u32, value: T) -> Result<(), MemoryError> {
    let ptr = checked_ptr::<T>(address)?;
    // SAFETY: non-null and aligned; validity is the RawMemory::new contract
    unsafe { ptr::write_volatile(ptr, value) };
    Ok(())
}

impl VariableMemory for RawMemory {
    fn read(&self, address: u32, var_type: VarType) -> Result<Value, MemoryError> {
        // SAFETY: RawMemory only exists under the RawMemory::new contract
        unsafe {
            Ok(match var_type {
                VarType::I8 => Value::I8(load(address)?),
                VarType::U8 => Value::U8(load(address)?),
                VarType::I16 => Value::I16(load(address)?),
                VarType::U16 => Value::U16(load(address)?),
                VarType::I32 => Value::I32(load(address)?),
                VarType::U32 => Value::U32(load(address)?),
                VarType::F32 => Value::F32(load(address)?),
                VarType::F64 => Value::F64(load(address)?),
                // Read as a byte: any non-zero pattern is true
                VarType::Bool => Value::Bool(load::<u8>(address)? != 0),
            })
        }
    }

    fn write(&self, address: u32, value: Value) -> Result<(), MemoryError> {
        // SAFETY: RawMemory only exists under the RawMemory::new contract
        unsafe {
            match value {
                Value::I8(v) => store(address, v),
                Value::U8(v) => store(address, v),
                Value::I16(v) => store(address, v),
                Value::U16(v) => store(address, v),
                Value::I32(v) => store(address, v),
                Value::U32(v) => store(address, v),
                Value::F32(v) => store(address, v),
                Value::F64(v) => store(address, v),
                Value::Bool(v) => store(address, v as u8),
            }
        }
    }
}

//! Typed access to monitored variables.
//!
//! The engine handles addresses and type tags as opaque data. Turning an
//! address into a load or store happens only behind [`VariableMemory`]; on a
//! device that is [`RawMemory`], the one place in the crate that dereferences
//! host-supplied addresses.

mod raw;

pub use raw::RawMemory;

use vs_protocol::{Value, VarType};

use crate::MemoryError;

/// Reads and writes variables by address and declared type
///
/// Both methods take `&self`: the ingress context writes and the service
/// context reads through the same memory, outside any engine lock.
pub trait VariableMemory {
    fn read(&self, address: u32, var_type: VarType) -> Result<Value, MemoryError>;

    fn write(&self, address: u32, value: Value) -> Result<(), MemoryError>;
}

impl<T: VariableMemory + ?Sized> VariableMemory for &T {
    fn read(&self, address: u32, var_type: VarType) -> Result<Value, MemoryError> {
        (**self).read(address, var_type)
    }

    fn write(&self, address: u32, value: Value) -> Result<(), MemoryError> {
        (**self).write(address, value)
    }
}

//! Variable type tags and typed values.
//!
//! Every monitored variable travels on the wire as an f32. [`Value`] is the
//! in-memory representation on the device side; the conversions here are the
//! only place the widening (for samples) and narrowing (for writes) happen.

/// Declared original type of a monitored variable
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    I8 = 0x00,
    U8 = 0x01,
    I16 = 0x02,
    U16 = 0x03,
    I32 = 0x04,
    U32 = 0x05,
    F32 = 0x06,
    /// Narrowed to f32 on the wire
    F64 = 0x07,
    /// Stored as one byte, zero/non-zero
    Bool = 0x08,
}

impl VarType {
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Size of the variable in device memory
    pub fn size(self) -> usize {
        match self {
            VarType::I8 | VarType::U8 | VarType::Bool => 1,
            VarType::I16 | VarType::U16 => 2,
            VarType::I32 | VarType::U32 | VarType::F32 => 4,
            VarType::F64 => 8,
        }
    }
}

impl TryFrom<u8> for VarType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(VarType::I8),
            0x01 => Ok(VarType::U8),
            0x02 => Ok(VarType::I16),
            0x03 => Ok(VarType::U16),
            0x04 => Ok(VarType::I32),
            0x05 => Ok(VarType::U32),
            0x06 => Ok(VarType::F32),
            0x07 => Ok(VarType::F64),
            0x08 => Ok(VarType::Bool),
            other => Err(other),
        }
    }
}

/// A variable's value in its declared representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    F32(f32),
    F64(f64),
    Bool(bool),
}

impl Value {
    /// Convert a wire float into `var_type`.
    ///
    /// Integers truncate toward zero (saturating at the type bounds, NaN maps
    /// to 0). Booleans are true for any non-zero value.
    pub fn from_f32(var_type: VarType, value: f32) -> Self {
        match var_type {
            VarType::I8 => Value::I8(value as i8),
            VarType::U8 => Value::U8(value as u8),
            VarType::I16 => Value::I16(value as i16),
            VarType::U16 => Value::U16(value as u16),
            VarType::I32 => Value::I32(value as i32),
            VarType::U32 => Value::U32(value as u32),
            VarType::F32 => Value::F32(value),
            VarType::F64 => Value::F64(value as f64),
            VarType::Bool => Value::Bool(value != 0.0),
        }
    }

    /// Widen (or narrow, for f64) to the wire float
    pub fn to_f32(self) -> f32 {
        match self {
            Value::I8(v) => v as f32,
            Value::U8(v) => v as f32,
            Value::I16(v) => v as f32,
            Value::U16(v) => v as f32,
            Value::I32(v) => v as f32,
            Value::U32(v) => v as f32,
            Value::F32(v) => v,
            Value::F64(v) => v as f32,
            Value::Bool(v) => {
                if v {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    pub fn var_type(&self) -> VarType {
        match self {
            Value::I8(_) => VarType::I8,
            Value::U8(_) => VarType::U8,
            Value::I16(_) => VarType::I16,
            Value::U16(_) => VarType::U16,
            Value::I32(_) => VarType::I32,
            Value::U32(_) => VarType::U32,
            Value::F32(_) => VarType::F32,
            Value::F64(_) => VarType::F64,
            Value::Bool(_) => VarType::Bool,
        }
    }
}

//! Typed interpretation of little-endian bytes read from the target

use super::error::{BridgeError, BridgeResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive types the target stores in little-endian order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl ValueType {
    /// Width of the type in bytes
    pub const fn size(&self) -> usize {
        match self {
            ValueType::U8 | ValueType::I8 => 1,
            ValueType::U16 | ValueType::I16 => 2,
            ValueType::U32 | ValueType::I32 | ValueType::F32 => 4,
            ValueType::U64 | ValueType::I64 | ValueType::F64 => 8,
        }
    }
}

/// A decoded value read from the target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum MemoryValue {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
}

impl MemoryValue {
    /// Decodes `bytes` as `value_type`; the slice must be exactly the type's width
    pub fn from_le_bytes(bytes: &[u8], value_type: ValueType) -> BridgeResult<Self> {
        if bytes.len() != value_type.size() {
            return Err(BridgeError::InvalidValueType(format!(
                "{value_type:?} needs {} bytes, got {}",
                value_type.size(),
                bytes.len()
            )));
        }

        let mut wide = [0u8; 8];
        wide[..bytes.len()].copy_from_slice(bytes);
        let raw = u64::from_le_bytes(wide);

        // Truncating casts reinterpret the low bytes, which is exactly the stored value
        Ok(match value_type {
            ValueType::U8 => MemoryValue::U8(raw as u8),
            ValueType::U16 => MemoryValue::U16(raw as u16),
            ValueType::U32 => MemoryValue::U32(raw as u32),
            ValueType::U64 => MemoryValue::U64(raw),
            ValueType::I8 => MemoryValue::I8(raw as u8 as i8),
            ValueType::I16 => MemoryValue::I16(raw as u16 as i16),
            ValueType::I32 => MemoryValue::I32(raw as u32 as i32),
            ValueType::I64 => MemoryValue::I64(raw as i64),
            ValueType::F32 => MemoryValue::F32(f32::from_bits(raw as u32)),
            ValueType::F64 => MemoryValue::F64(f64::from_bits(raw)),
        })
    }

    /// Encodes the value as it would be stored on the target
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match self {
            MemoryValue::U8(v) => v.to_le_bytes().to_vec(),
            MemoryValue::U16(v) => v.to_le_bytes().to_vec(),
            MemoryValue::U32(v) => v.to_le_bytes().to_vec(),
            MemoryValue::U64(v) => v.to_le_bytes().to_vec(),
            MemoryValue::I8(v) => v.to_le_bytes().to_vec(),
            MemoryValue::I16(v) => v.to_le_bytes().to_vec(),
            MemoryValue::I32(v) => v.to_le_bytes().to_vec(),
            MemoryValue::I64(v) => v.to_le_bytes().to_vec(),
            MemoryValue::F32(v) => v.to_le_bytes().to_vec(),
            MemoryValue::F64(v) => v.to_le_bytes().to_vec(),
        }
    }

    /// The type tag of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            MemoryValue::U8(_) => ValueType::U8,
            MemoryValue::U16(_) => ValueType::U16,
            MemoryValue::U32(_) => ValueType::U32,
            MemoryValue::U64(_) => ValueType::U64,
            MemoryValue::I8(_) => ValueType::I8,
            MemoryValue::I16(_) => ValueType::I16,
            MemoryValue::I32(_) => ValueType::I32,
            MemoryValue::I64(_) => ValueType::I64,
            MemoryValue::F32(_) => ValueType::F32,
            MemoryValue::F64(_) => ValueType::F64,
        }
    }
}

impl fmt::Display for MemoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryValue::U8(v) => write!(f, "{v}"),
            MemoryValue::U16(v) => write!(f, "{v}"),
            MemoryValue::U32(v) => write!(f, "{v}"),
            MemoryValue::U64(v) => write!(f, "{v}"),
            MemoryValue::I8(v) => write!(f, "{v}"),
            MemoryValue::I16(v) => write!(f, "{v}"),
            MemoryValue::I32(v) => write!(f, "{v}"),
            MemoryValue::I64(v) => write!(f, "{v}"),
            MemoryValue::F32(v) => write!(f, "{v}"),
            MemoryValue::F64(v) => write!(f, "{v}"),
        }
    }
}

/// Reads up to eight bytes as an unsigned little-endian integer
pub fn le_uint(bytes: &[u8]) -> BridgeResult<u64> {
    if bytes.len() > 8 {
        return Err(BridgeError::InvalidValueType(format!(
            "integer of {} bytes does not fit in 64 bits",
            bytes.len()
        )));
    }
    let mut wide = [0u8; 8];
    wide[..bytes.len()].copy_from_slice(bytes);
    Ok(u64::from_le_bytes(wide))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_integers() {
        let bytes = [0xEF, 0xBE, 0xAD, 0xDE];
        assert_eq!(
            MemoryValue::from_le_bytes(&bytes, ValueType::U32).unwrap(),
            MemoryValue::U32(0xDEADBEEF)
        );
        assert_eq!(
            MemoryValue::from_le_bytes(&[0xFF, 0xFF], ValueType::I16).unwrap(),
            MemoryValue::I16(-1)
        );
        assert_eq!(
            MemoryValue::from_le_bytes(&[0x80], ValueType::I8).unwrap(),
            MemoryValue::I8(-128)
        );
    }

    #[test]
    fn test_decode_floats() {
        let bytes = 100.0f32.to_le_bytes();
        assert_eq!(
            MemoryValue::from_le_bytes(&bytes, ValueType::F32).unwrap(),
            MemoryValue::F32(100.0)
        );
        let bytes = (-0.5f64).to_le_bytes();
        assert_eq!(
            MemoryValue::from_le_bytes(&bytes, ValueType::F64).unwrap(),
            MemoryValue::F64(-0.5)
        );
    }

    #[test]
    fn test_size_mismatch() {
        let result = MemoryValue::from_le_bytes(&[1, 2, 3], ValueType::U32);
        assert!(matches!(result, Err(BridgeError::InvalidValueType(_))));
    }

    #[test]
    fn test_to_bytes_matches_decode() {
        let value = MemoryValue::I32(-42);
        let bytes = value.to_le_bytes();
        assert_eq!(bytes.len(), value.value_type().size());
        assert_eq!(
            MemoryValue::from_le_bytes(&bytes, ValueType::I32).unwrap(),
            value
        );
    }

    #[test]
    fn test_le_uint() {
        assert_eq!(le_uint(&[]).unwrap(), 0);
        assert_eq!(le_uint(&[0x10, 0x61, 0x2D, 0x04]).unwrap(), 0x042D6110);
        assert!(le_uint(&[0; 9]).is_err());
    }
}

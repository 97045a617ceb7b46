use std::fmt;
use std::str::FromStr;

use crate::error::IrError;

/// Scalar class of an element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCode {
    Int,
    UInt,
    Float,
    /// Opaque pointer-sized handle.
    Handle,
}

/// Element type of a tensor or an expression: class, bit width and vector lanes.
///
/// `bool` is represented as a one-bit unsigned integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DType {
    code: TypeCode,
    bits: u8,
    lanes: u16,
}

impl DType {
    pub const F32: DType = DType::float(32);
    pub const F64: DType = DType::float(64);
    pub const I32: DType = DType::int(32);
    pub const I64: DType = DType::int(64);
    pub const BOOL: DType = DType::bool();

    pub const fn new(code: TypeCode, bits: u8, lanes: u16) -> Self {
        Self { code, bits, lanes }
    }

    pub const fn int(bits: u8) -> Self {
        Self::new(TypeCode::Int, bits, 1)
    }

    pub const fn uint(bits: u8) -> Self {
        Self::new(TypeCode::UInt, bits, 1)
    }

    pub const fn float(bits: u8) -> Self {
        Self::new(TypeCode::Float, bits, 1)
    }

    pub const fn bool() -> Self {
        Self::new(TypeCode::UInt, 1, 1)
    }

    pub const fn handle() -> Self {
        Self::new(TypeCode::Handle, 64, 1)
    }

    /// Returns the same scalar type with `lanes` vector lanes.
    pub const fn with_lanes(self, lanes: u16) -> Self {
        Self::new(self.code, self.bits, lanes)
    }

    pub const fn code(&self) -> TypeCode {
        self.code
    }

    pub const fn bits(&self) -> u8 {
        self.bits
    }

    pub const fn lanes(&self) -> u16 {
        self.lanes
    }

    pub fn is_float(&self) -> bool {
        self.code == TypeCode::Float
    }

    pub fn is_int(&self) -> bool {
        self.code == TypeCode::Int
    }

    pub fn is_uint(&self) -> bool {
        self.code == TypeCode::UInt && self.bits != 1
    }

    pub fn is_bool(&self) -> bool {
        self.code == TypeCode::UInt && self.bits == 1
    }

    /// Size of one element in bytes, rounded up for sub-byte types.
    pub fn size(&self) -> usize {
        (self.bits as usize * self.lanes as usize).div_ceil(8)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_bool() {
            write!(f, "bool")?;
        } else {
            let prefix = match self.code {
                TypeCode::Int => "int",
                TypeCode::UInt => "uint",
                TypeCode::Float => "float",
                TypeCode::Handle => "handle",
            };
            write!(f, "{prefix}{}", self.bits)?;
        }
        if self.lanes != 1 {
            write!(f, "x{}", self.lanes)?;
        }
        Ok(())
    }
}

impl FromStr for DType {
    type Err = IrError;

    /// Parses the `Display` form back, e.g. `float32`, `int8x4`, `bool`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || IrError::InvalidDType(s.to_string());

        let (scalar, lanes) = match s.split_once('x') {
            Some((scalar, lanes)) => (scalar, lanes.parse::<u16>().map_err(|_| invalid())?),
            None => (s, 1),
        };
        if lanes == 0 {
            return Err(invalid());
        }

        if scalar == "bool" {
            return Ok(DType::bool().with_lanes(lanes));
        }

        let (code, bits) = if let Some(bits) = scalar.strip_prefix("uint") {
            (TypeCode::UInt, bits)
        } else if let Some(bits) = scalar.strip_prefix("int") {
            (TypeCode::Int, bits)
        } else if let Some(bits) = scalar.strip_prefix("float") {
            (TypeCode::Float, bits)
        } else if let Some(bits) = scalar.strip_prefix("handle") {
            (TypeCode::Handle, bits)
        } else {
            return Err(invalid());
        };

        let bits = bits.parse::<u8>().map_err(|_| invalid())?;
        if bits == 0 {
            return Err(invalid());
        }
        Ok(DType::new(code, bits, lanes))
    }
}

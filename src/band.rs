use serde::{Deserialize, Serialize};
use std::fmt;

/// Only the first three bands of a raster are ever read or written.
pub const MAX_EDIT_BANDS: usize = 3;

/// Raster band data types, numbered the way the host's data providers report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BandDataType {
    Unknown,
    Byte,
    UInt16,
    Int16,
    UInt32,
    Int32,
    Float32,
    Float64,
    CInt16,
    CInt32,
    CFloat32,
    CFloat64,
    Argb32,
    Argb32Premultiplied,
}

/// Whether a band stores whole numbers or floating point values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Integer,
    Float,
}

/// Range and display precision of the values a band type can hold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericDomain {
    pub kind: NumericKind,
    pub min: f64,
    pub max: f64,
    /// Decimal places shown when editing a value of this type
    pub decimals: usize,
}

impl NumericDomain {
    const fn integer(min: f64, max: f64) -> Self {
        Self {
            kind: NumericKind::Integer,
            min,
            max,
            decimals: 0,
        }
    }

    const fn float(min: f64, max: f64) -> Self {
        Self {
            kind: NumericKind::Float,
            min,
            max,
            decimals: 5,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && self.min <= value && value <= self.max
    }
}

impl BandDataType {
    pub const ALL: [BandDataType; 14] = [
        Self::Unknown,
        Self::Byte,
        Self::UInt16,
        Self::Int16,
        Self::UInt32,
        Self::Int32,
        Self::Float32,
        Self::Float64,
        Self::CInt16,
        Self::CInt32,
        Self::CFloat32,
        Self::CFloat64,
        Self::Argb32,
        Self::Argb32Premultiplied,
    ];

    /// Looks up a type by the host's numeric code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Byte => 1,
            Self::UInt16 => 2,
            Self::Int16 => 3,
            Self::UInt32 => 4,
            Self::Int32 => 5,
            Self::Float32 => 6,
            Self::Float64 => 7,
            Self::CInt16 => 8,
            Self::CInt32 => 9,
            Self::CFloat32 => 10,
            Self::CFloat64 => 11,
            Self::Argb32 => 12,
            Self::Argb32Premultiplied => 13,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Byte => "Byte",
            Self::UInt16 => "UInt16",
            Self::Int16 => "Int16",
            Self::UInt32 => "UInt32",
            Self::Int32 => "Int32",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::CInt16 => "CInt16",
            Self::CInt32 => "CInt32",
            Self::CFloat32 => "CFloat32",
            Self::CFloat64 => "CFloat64",
            Self::Argb32 => "ARGB32",
            Self::Argb32Premultiplied => "ARGB32_Premultiplied",
        }
    }

    /// Numeric domain of the type, `None` for types cells can't be edited in.
    pub fn domain(self) -> Option<NumericDomain> {
        let domain = match self {
            Self::Byte => NumericDomain::integer(0.0, u8::MAX as f64),
            Self::UInt16 => NumericDomain::integer(0.0, u16::MAX as f64),
            Self::Int16 => NumericDomain::integer(i16::MIN as f64, i16::MAX as f64),
            Self::UInt32 => NumericDomain::integer(0.0, u32::MAX as f64),
            Self::Int32 => NumericDomain::integer(i32::MIN as f64, i32::MAX as f64),
            Self::Float32 => NumericDomain::float(f32::MIN as f64, f32::MAX as f64),
            Self::Float64 => NumericDomain::float(f64::MIN, f64::MAX),
            _ => return None,
        };
        Some(domain)
    }

    pub fn is_supported(self) -> bool {
        self.domain().is_some()
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self.domain(),
            Some(NumericDomain {
                kind: NumericKind::Integer,
                ..
            })
        )
    }
}

impl fmt::Display for BandDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single band's value at a cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BandValue {
    Int(i64),
    Float(f64),
}

impl BandValue {
    /// Converts a raw value into the representation a band of `data_type` stores.
    ///
    /// Integral types truncate toward zero, everything else stays floating point.
    pub fn coerce(data_type: BandDataType, value: f64) -> Self {
        if data_type.is_integral() {
            Self::Int(value.trunc() as i64)
        } else {
            Self::Float(value)
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

impl fmt::Display for BandValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Cached metadata of one band of the active raster
#[derive(Debug, Clone, PartialEq)]
pub struct BandInfo {
    /// 1-based band number
    pub band: usize,
    pub data_type: BandDataType,
    pub nodata: Option<f64>,
}

impl BandInfo {
    pub fn domain(&self) -> Option<NumericDomain> {
        self.data_type.domain()
    }

    pub fn nodata_value(&self) -> Option<BandValue> {
        self.nodata.map(|v| BandValue::coerce(self.data_type, v))
    }
}

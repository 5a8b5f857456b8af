//! Closed value type produced by the flattener for every builtin leaf.

use std::sync::Arc;

use crate::{
    error::ValueTypeError,
    time::{RosDuration, RosTime},
    types::BuiltinKind,
};

/// A decoded builtin value.
/// Exactly one variant per [`BuiltinKind`]; no lossy conversions.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Bool(bool),
    Byte(u8),
    Char(i8),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(Arc<str>),
    Time(RosTime),
    Duration(RosDuration),
}

impl DecodedValue {
    pub fn string(s: impl AsRef<str>) -> Self {
        Self::String(Arc::from(s.as_ref()))
    }

    /// The value a zero-filled buffer decodes to.
    pub fn zero(kind: BuiltinKind) -> Self {
        match kind {
            BuiltinKind::Bool => Self::Bool(false),
            BuiltinKind::Byte => Self::Byte(0),
            BuiltinKind::Char => Self::Char(0),
            BuiltinKind::I8 => Self::I8(0),
            BuiltinKind::I16 => Self::I16(0),
            BuiltinKind::I32 => Self::I32(0),
            BuiltinKind::I64 => Self::I64(0),
            BuiltinKind::U8 => Self::U8(0),
            BuiltinKind::U16 => Self::U16(0),
            BuiltinKind::U32 => Self::U32(0),
            BuiltinKind::U64 => Self::U64(0),
            BuiltinKind::F32 => Self::F32(0.0),
            BuiltinKind::F64 => Self::F64(0.0),
            BuiltinKind::String => Self::String(Arc::from("")),
            BuiltinKind::Time => Self::Time(RosTime::default()),
            BuiltinKind::Duration => Self::Duration(RosDuration::default()),
        }
    }

    pub fn kind(&self) -> BuiltinKind {
        match self {
            Self::Bool(_) => BuiltinKind::Bool,
            Self::Byte(_) => BuiltinKind::Byte,
            Self::Char(_) => BuiltinKind::Char,
            Self::I8(_) => BuiltinKind::I8,
            Self::I16(_) => BuiltinKind::I16,
            Self::I32(_) => BuiltinKind::I32,
            Self::I64(_) => BuiltinKind::I64,
            Self::U8(_) => BuiltinKind::U8,
            Self::U16(_) => BuiltinKind::U16,
            Self::U32(_) => BuiltinKind::U32,
            Self::U64(_) => BuiltinKind::U64,
            Self::F32(_) => BuiltinKind::F32,
            Self::F64(_) => BuiltinKind::F64,
            Self::String(_) => BuiltinKind::String,
            Self::Time(_) => BuiltinKind::Time,
            Self::Duration(_) => BuiltinKind::Duration,
        }
    }

    /// Numeric view of the value; `time` and `duration` become seconds.
    /// Returns `None` for strings.
    pub fn as_f64(&self) -> Option<f64> {
        Some(match self {
            Self::Bool(v) => f64::from(u8::from(*v)),
            Self::Byte(v) | Self::U8(v) => f64::from(*v),
            Self::Char(v) | Self::I8(v) => f64::from(*v),
            Self::I16(v) => f64::from(*v),
            Self::I32(v) => f64::from(*v),
            Self::I64(v) => *v as f64,
            Self::U16(v) => f64::from(*v),
            Self::U32(v) => f64::from(*v),
            Self::U64(v) => *v as f64,
            Self::F32(v) => f64::from(*v),
            Self::F64(v) => *v,
            Self::Time(t) => t.as_secs_f64(),
            Self::Duration(d) => d.as_secs_f64(),
            Self::String(_) => return None,
        })
    }

    pub fn try_bool(&self) -> Result<bool, ValueTypeError> {
        match self {
            Self::Bool(v) => Ok(*v),
            _ => Err(self.type_mismatch(BuiltinKind::Bool)),
        }
    }

    pub fn try_i32(&self) -> Result<i32, ValueTypeError> {
        match self {
            Self::I32(v) => Ok(*v),
            _ => Err(self.type_mismatch(BuiltinKind::I32)),
        }
    }

    pub fn try_i64(&self) -> Result<i64, ValueTypeError> {
        match self {
            Self::I64(v) => Ok(*v),
            _ => Err(self.type_mismatch(BuiltinKind::I64)),
        }
    }

    pub fn try_u8(&self) -> Result<u8, ValueTypeError> {
        match self {
            Self::U8(v) => Ok(*v),
            _ => Err(self.type_mismatch(BuiltinKind::U8)),
        }
    }

    pub fn try_u32(&self) -> Result<u32, ValueTypeError> {
        match self {
            Self::U32(v) => Ok(*v),
            _ => Err(self.type_mismatch(BuiltinKind::U32)),
        }
    }

    pub fn try_u64(&self) -> Result<u64, ValueTypeError> {
        match self {
            Self::U64(v) => Ok(*v),
            _ => Err(self.type_mismatch(BuiltinKind::U64)),
        }
    }

    pub fn try_f32(&self) -> Result<f32, ValueTypeError> {
        match self {
            Self::F32(v) => Ok(*v),
            _ => Err(self.type_mismatch(BuiltinKind::F32)),
        }
    }

    pub fn try_f64(&self) -> Result<f64, ValueTypeError> {
        match self {
            Self::F64(v) => Ok(*v),
            _ => Err(self.type_mismatch(BuiltinKind::F64)),
        }
    }

    pub fn try_str(&self) -> Result<&str, ValueTypeError> {
        match self {
            Self::String(v) => Ok(v.as_ref()),
            _ => Err(self.type_mismatch(BuiltinKind::String)),
        }
    }

    pub fn try_time(&self) -> Result<RosTime, ValueTypeError> {
        match self {
            Self::Time(v) => Ok(*v),
            _ => Err(self.type_mismatch(BuiltinKind::Time)),
        }
    }

    pub fn try_duration(&self) -> Result<RosDuration, ValueTypeError> {
        match self {
            Self::Duration(v) => Ok(*v),
            _ => Err(self.type_mismatch(BuiltinKind::Duration)),
        }
    }

    pub fn type_mismatch(&self, expected: BuiltinKind) -> ValueTypeError {
        ValueTypeError::new(expected.type_name(), self.kind().type_name())
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for DecodedValue {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    RosTime => Time,
    RosDuration => Duration,
}

impl From<&str> for DecodedValue {
    fn from(v: &str) -> Self {
        Self::string(v)
    }
}

impl From<String> for DecodedValue {
    fn from(v: String) -> Self {
        Self::String(Arc::from(v))
    }
}

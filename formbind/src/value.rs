use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use time::OffsetDateTime;

use crate::{Attachment, FormType, Kind, ScalarType, Shape};

/// A dynamically-typed value, as produced by [`convert`](crate::convert) and
/// consumed by [`coerce`](crate::coerce).
///
/// Every value except [`Value::Nil`] knows its exact [`Shape`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value at all.
    Nil,
    /// A `bool`.
    Bool(bool),
    /// An `i8`.
    I8(i8),
    /// An `i16`.
    I16(i16),
    /// An `i32`.
    I32(i32),
    /// An `i64`.
    I64(i64),
    /// An `isize`.
    ISize(isize),
    /// A `u8`.
    U8(u8),
    /// A `u16`.
    U16(u16),
    /// A `u32`.
    U32(u32),
    /// A `u64`.
    U64(u64),
    /// A `usize`.
    USize(usize),
    /// An `f32`.
    F32(f32),
    /// An `f64`.
    F64(f64),
    /// A `String`.
    String(String),
    /// A timestamp.
    Time(OffsetDateTime),
    /// A file attachment descriptor.
    Attachment(Attachment),
    /// An `Option<T>`: a boxed cell, or nil.
    Pointer {
        /// Shape of the `Option<T>` itself.
        shape: &'static Shape,
        /// The pointee, `None` for a nil pointer.
        inner: Option<Box<Value>>,
    },
    /// A `Vec<T>` or `[T; N]`.
    Sequence {
        /// Shape of the container.
        shape: &'static Shape,
        /// Elements, each with the container's element shape.
        items: Vec<Value>,
    },
}

macro_rules! scalar_shape {
    ($value:expr, $($variant:ident => $ty:ty),* $(,)?) => {
        match $value {
            $(Value::$variant(_) => Some(<$ty as FormType>::SHAPE),)*
            Value::Pointer { shape, .. } | Value::Sequence { shape, .. } => Some(*shape),
            Value::Nil => None,
        }
    };
}

macro_rules! cast_numeric {
    ($value:expr, $to:expr, $($variant:ident),*) => {
        match $value {
            $(Value::$variant(n) => Some(match $to {
                ScalarType::I8 => Value::I8(n as i8),
                ScalarType::I16 => Value::I16(n as i16),
                ScalarType::I32 => Value::I32(n as i32),
                ScalarType::I64 => Value::I64(n as i64),
                ScalarType::ISize => Value::ISize(n as isize),
                ScalarType::U8 => Value::U8(n as u8),
                ScalarType::U16 => Value::U16(n as u16),
                ScalarType::U32 => Value::U32(n as u32),
                ScalarType::U64 => Value::U64(n as u64),
                ScalarType::USize => Value::USize(n as usize),
                ScalarType::F32 => Value::F32(n as f32),
                ScalarType::F64 => Value::F64(n as f64),
                _ => return Err($value),
            }),)*
            _ => None,
        }
    };
}

impl Value {
    /// The exact shape of this value, `None` for [`Value::Nil`].
    pub fn shape(&self) -> Option<&'static Shape> {
        scalar_shape!(
            self,
            Bool => bool,
            I8 => i8,
            I16 => i16,
            I32 => i32,
            I64 => i64,
            ISize => isize,
            U8 => u8,
            U16 => u16,
            U32 => u32,
            U64 => u64,
            USize => usize,
            F32 => f32,
            F64 => f64,
            String => String,
            Time => OffsetDateTime,
            Attachment => Attachment,
        )
    }

    /// The kind of this value, [`Kind::Invalid`] for [`Value::Nil`].
    pub fn kind(&self) -> Kind {
        self.shape().map_or(Kind::Invalid, Shape::kind)
    }

    /// Human-readable type name, used in error messages.
    pub fn type_name(&self) -> String {
        match self.shape() {
            Some(shape) => shape.to_string(),
            None => "nil".to_string(),
        }
    }

    /// Whether this is nil, or a pointer holding nothing.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil | Value::Pointer { inner: None, .. })
    }

    /// Converts a numeric value to another numeric scalar with `as` semantics
    /// (wrapping for integers, rounding for floats). Any other scalar
    /// converts only to itself.
    ///
    /// Gives the value back when no such conversion exists.
    pub fn cast(self, to: ScalarType) -> Result<Value, Value> {
        if self.shape().and_then(Shape::scalar_type) == Some(to) {
            return Ok(self);
        }
        if !to.is_numeric() {
            return Err(self);
        }
        let cast = cast_numeric!(self, to, I8, I16, I32, I64, ISize, U8, U16, U32, U64, USize, F32, F64);
        cast.ok_or(self)
    }
}

//! Static type descriptors for destination fields.
//!
//! Every type that can appear in a destination record implements [`FormType`],
//! which hands out a `'static` [`Shape`]. Shapes are resolved once per type at
//! compile time, so the converter and the coercion engine dispatch on a closed
//! [`Kind`] instead of inspecting types at each call.

use core::fmt;

use crate::{ValueMismatch, value::Value};

/// Describes the declared type of a destination field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    /// Name of the type, without generic parameters (`i32`, `Option`, `Vec`, `User`).
    pub type_identifier: &'static str,

    /// What the type is made of.
    pub def: Def,
}

/// The structure of a [`Shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Def {
    /// One of the supported leaf types.
    Scalar(ScalarType),

    /// An optional value (`Option<T>`), the pointer side of the pointer/value duality.
    Option(&'static Shape),

    /// A growable sequence (`Vec<T>`).
    List(&'static Shape),

    /// A fixed-length sequence (`[T; N]`).
    Array {
        /// Element shape.
        t: &'static Shape,
        /// Declared length.
        n: usize,
    },

    /// A record produced by `#[derive(Record)]`.
    Record(&'static RecordShape),

    /// Anything else. Never converted to.
    Opaque,
}

/// Leaf types the converter knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// `bool`
    Bool,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `isize`
    ISize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `usize`
    USize,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `String`
    String,
    /// `time::OffsetDateTime`
    Time,
    /// [`crate::Attachment`]
    Attachment,
}

impl ScalarType {
    /// The [`Kind`] this scalar classifies as.
    pub const fn kind(self) -> Kind {
        match self {
            ScalarType::Bool => Kind::Bool,
            ScalarType::I8 => Kind::Int8,
            ScalarType::I16 => Kind::Int16,
            ScalarType::I32 => Kind::Int32,
            ScalarType::I64 => Kind::Int64,
            ScalarType::ISize => Kind::Int,
            ScalarType::U8 => Kind::Uint8,
            ScalarType::U16 => Kind::Uint16,
            ScalarType::U32 => Kind::Uint32,
            ScalarType::U64 => Kind::Uint64,
            ScalarType::USize => Kind::Uint,
            ScalarType::F32 => Kind::Float32,
            ScalarType::F64 => Kind::Float64,
            ScalarType::String => Kind::String,
            ScalarType::Time => Kind::Time,
            ScalarType::Attachment => Kind::Attachment,
        }
    }

    /// Whether values of this scalar take part in numeric conversions.
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            ScalarType::I8
                | ScalarType::I16
                | ScalarType::I32
                | ScalarType::I64
                | ScalarType::ISize
                | ScalarType::U8
                | ScalarType::U16
                | ScalarType::U32
                | ScalarType::U64
                | ScalarType::USize
                | ScalarType::F32
                | ScalarType::F64
        )
    }
}

/// Closed classification of a field's base type, after one level of
/// `Option` has been looked through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// The kind of the nil value.
    Invalid,
    /// `bool`
    Bool,
    /// Native-width signed integer, parsed as 64 bits.
    Int,
    /// `i8`
    Int8,
    /// `i16`
    Int16,
    /// `i32`
    Int32,
    /// `i64`
    Int64,
    /// Native-width unsigned integer, parsed as 64 bits.
    Uint,
    /// `u8`
    Uint8,
    /// `u16`
    Uint16,
    /// `u32`
    Uint32,
    /// `u64`
    Uint64,
    /// `f32`
    Float32,
    /// `f64`
    Float64,
    /// `String`
    String,
    /// Timestamp, recognized by type identity.
    Time,
    /// `Vec<T>` or `[T; N]` of non-attachment elements.
    Sequence,
    /// A single attachment or a sequence of them.
    Attachment,
    /// Everything else.
    Unsupported,
}

impl Kind {
    /// Bit width enforced when parsing an integer of this kind.
    pub const fn bits(self) -> Option<u32> {
        match self {
            Kind::Int8 | Kind::Uint8 => Some(8),
            Kind::Int16 | Kind::Uint16 => Some(16),
            Kind::Int32 | Kind::Uint32 => Some(32),
            Kind::Int | Kind::Int64 | Kind::Uint | Kind::Uint64 => Some(64),
            _ => None,
        }
    }
}

impl Shape {
    /// Builds the shape of a leaf type.
    pub const fn scalar(type_identifier: &'static str, scalar: ScalarType) -> Self {
        Shape {
            type_identifier,
            def: Def::Scalar(scalar),
        }
    }

    /// Returns the inner shape for `Option<T>`, and whether a level was removed.
    pub const fn unwrap_option(&'static self) -> (&'static Shape, bool) {
        match self.def {
            Def::Option(inner) => (inner, true),
            _ => (self, false),
        }
    }

    /// Whether this is `Option<T>`.
    pub const fn is_option(&self) -> bool {
        matches!(self.def, Def::Option(_))
    }

    /// The scalar type, if this is a leaf.
    pub const fn scalar_type(&self) -> Option<ScalarType> {
        match self.def {
            Def::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Element shape of a `Vec<T>` or `[T; N]`.
    pub const fn element(&self) -> Option<&'static Shape> {
        match self.def {
            Def::List(t) | Def::Array { t, .. } => Some(t),
            _ => None,
        }
    }

    /// Whether this is `Attachment` or `Option<Attachment>`.
    pub fn is_attachment(&'static self) -> bool {
        let (base, _) = self.unwrap_option();
        base.scalar_type() == Some(ScalarType::Attachment)
    }

    /// Classifies this shape, looking through one level of `Option`.
    pub fn kind(&'static self) -> Kind {
        let (base, _) = self.unwrap_option();
        match base.def {
            Def::Scalar(scalar) => scalar.kind(),
            Def::List(t) | Def::Array { t, .. } if t.is_attachment() => Kind::Attachment,
            Def::List(_) | Def::Array { .. } => Kind::Sequence,
            Def::Option(_) | Def::Record(_) | Def::Opaque => Kind::Unsupported,
        }
    }

    /// The record descriptor, if this shape was derived with `#[derive(Record)]`.
    pub const fn record(&self) -> Option<&'static RecordShape> {
        match self.def {
            Def::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.def {
            Def::Option(inner) => write!(f, "Option<{inner}>"),
            Def::List(t) => write!(f, "Vec<{t}>"),
            Def::Array { t, n } => write!(f, "[{t}; {n}]"),
            Def::Scalar(_) | Def::Record(_) | Def::Opaque => f.write_str(self.type_identifier),
        }
    }
}

/// Descriptor of a record emitted by `#[derive(Record)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordShape {
    /// Name of the record type.
    pub type_identifier: &'static str,

    /// Fields in declaration order.
    pub fields: &'static [Field],
}

/// One field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// The Rust field name.
    pub name: &'static str,

    /// Declared type of the field.
    pub shape: &'static Shape,

    /// Tags attached with `#[tag(key = "value")]`.
    pub tags: &'static [FieldTag],

    /// `false` when the field was marked `#[tag(readonly)]`.
    pub writable: bool,
}

impl Field {
    /// The raw tag string registered under `key`, if any.
    pub fn tag(&self, key: &str) -> Option<&'static str> {
        self.tags.iter().find(|t| t.key == key).map(|t| t.value)
    }
}

/// A single `key = "value"` pair from a `#[tag(...)]` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldTag {
    /// The tag key (`form`, `json`, ...).
    pub key: &'static str,

    /// The raw tag string, e.g. `name,omitempty`.
    pub value: &'static str,
}

/// A type that can be the declared type of a destination field, or a
/// destination itself.
///
/// Implemented for the supported scalars, `Option<T>`, `Vec<T>`, `[T; N]`,
/// and every `#[derive(Record)]` type.
pub trait FormType: Sized {
    /// The static descriptor of this type.
    const SHAPE: &'static Shape;

    /// Extracts `Self` from a value that has already been coerced to
    /// [`Self::SHAPE`].
    fn from_value(value: Value) -> Result<Self, ValueMismatch>;

    /// Returns the record view of `self` when `Self` is a record.
    fn as_record_mut(&mut self) -> Option<&mut dyn Record> {
        None
    }
}

/// A destination record whose fields can be assigned by index.
///
/// Implemented by `#[derive(Record)]`.
pub trait Record {
    /// The descriptor of this record's type.
    fn record_shape(&self) -> &'static RecordShape;

    /// Assigns `value` to the field at `index`.
    ///
    /// `value` must already have the field's exact shape. Read-only fields
    /// and out-of-range indices reject the value.
    fn set_field(&mut self, index: usize, value: Value) -> Result<(), ValueMismatch>;
}

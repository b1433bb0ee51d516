use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::fmt;

use crate::{Field, NumError, Shape, Value};

/// Error returned by [`Decoder::decode`](crate::Decoder::decode).
///
/// Carries the destination field when the failure can be attributed to one.
#[derive(Debug)]
pub struct DecodeError {
    field: Option<&'static Field>,
    kind: DecodeErrorKind,
}

impl DecodeError {
    /// Creates an error that is not tied to a field.
    pub fn new(kind: DecodeErrorKind) -> Self {
        DecodeError { field: None, kind }
    }

    /// Attributes this error to `field`.
    pub fn with_field(mut self, field: &'static Field) -> Self {
        self.field = Some(field);
        self
    }

    /// The field the error is attributed to, if any.
    pub fn field(&self) -> Option<&'static Field> {
        self.field
    }

    /// Name of the field the error is attributed to, if any.
    pub fn field_name(&self) -> Option<&'static str> {
        self.field.map(|f| f.name)
    }

    /// What went wrong.
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    /// Consumes the error, returning what went wrong.
    pub fn into_kind(self) -> DecodeErrorKind {
        self.kind
    }

    /// Whether this is a programming error or an input-validation error.
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            Some(field) => write!(f, "field `{}`: {}", field.name, self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl core::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        core::error::Error::source(&self.kind)
    }
}

impl From<DecodeErrorKind> for DecodeError {
    fn from(kind: DecodeErrorKind) -> Self {
        DecodeError::new(kind)
    }
}

/// Broad classification of a [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The destination type does not fit the decoder. Retrying with other
    /// input will not help.
    Configuration,
    /// The submitted values are malformed for their fields. These are meant
    /// to be reported back to whoever filled the form.
    Input,
}

/// The specific failure behind a [`DecodeError`].
#[derive(Debug)]
#[non_exhaustive]
pub enum DecodeErrorKind {
    /// The destination is not a record.
    NotPointerToRecord {
        /// The destination's type.
        shape: &'static Shape,
    },

    /// The resolved field is read-only.
    FieldNotSettable,

    /// A scalar field received zero or several values.
    NotSingleValue {
        /// Type that expected a single value.
        shape: &'static Shape,
        /// How many values were received.
        count: usize,
    },

    /// A single-attachment field received several attachments.
    MultipleAttachments {
        /// How many attachments were received.
        count: usize,
    },

    /// Attachments were submitted for a field that cannot hold them.
    UnsupportedAttachmentField {
        /// The field's declared type.
        shape: &'static Shape,
    },

    /// A value cannot be brought to the destination type.
    TypeIncompatible {
        /// Type of the value.
        from: String,
        /// Destination type.
        to: &'static Shape,
    },

    /// The destination type is outside what the converter supports.
    Unsupported {
        /// The offending type.
        shape: &'static Shape,
    },

    /// A fixed-length sequence received the wrong number of elements.
    LengthMismatch {
        /// The sequence type.
        shape: &'static Shape,
        /// Number of elements received.
        got: usize,
    },

    /// Malformed literal.
    Parse(ParseError),

    /// Failure on one element of a sequence.
    Element {
        /// Position of the element.
        index: usize,
        /// What went wrong with it.
        source: Box<DecodeErrorKind>,
    },
}

impl DecodeErrorKind {
    /// Builds [`DecodeErrorKind::TypeIncompatible`] for `value` and `to`.
    pub fn incompatible(value: &Value, to: &'static Shape) -> Self {
        DecodeErrorKind::TypeIncompatible {
            from: value.type_name(),
            to,
        }
    }

    /// Wraps this error as the failure of element `index`.
    pub fn at_element(self, index: usize) -> Self {
        DecodeErrorKind::Element {
            index,
            source: Box::new(self),
        }
    }

    /// Whether this is a programming error or an input-validation error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            DecodeErrorKind::NotPointerToRecord { .. }
            | DecodeErrorKind::FieldNotSettable
            | DecodeErrorKind::UnsupportedAttachmentField { .. }
            | DecodeErrorKind::Unsupported { .. } => ErrorCategory::Configuration,
            DecodeErrorKind::Element { source, .. } => source.category(),
            _ => ErrorCategory::Input,
        }
    }

    /// The innermost error, looking through [`DecodeErrorKind::Element`].
    pub fn root(&self) -> &DecodeErrorKind {
        match self {
            DecodeErrorKind::Element { source, .. } => source.root(),
            other => other,
        }
    }
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeErrorKind::NotPointerToRecord { shape } => {
                write!(f, "destination must be a record, got `{shape}`")
            }
            DecodeErrorKind::FieldNotSettable => write!(f, "field cannot be set"),
            DecodeErrorKind::NotSingleValue { shape, count } => {
                write!(f, "expected a single value for `{shape}`, got {count}")
            }
            DecodeErrorKind::MultipleAttachments { count } => {
                write!(
                    f,
                    "expected at most one attachment for a single-attachment field, got {count}"
                )
            }
            DecodeErrorKind::UnsupportedAttachmentField { shape } => {
                write!(f, "unsupported attachment field type `{shape}`")
            }
            DecodeErrorKind::TypeIncompatible { from, to } => {
                write!(f, "type incompatible: {from} -> {to}")
            }
            DecodeErrorKind::Unsupported { shape } => write!(f, "unsupported type `{shape}`"),
            DecodeErrorKind::LengthMismatch { shape, got } => {
                let expected = match shape.def {
                    crate::Def::Array { n, .. } => n.to_string(),
                    _ => "?".to_string(),
                };
                write!(f, "`{shape}` needs {expected} elements, got {got}")
            }
            DecodeErrorKind::Parse(err) => write!(f, "{err}"),
            DecodeErrorKind::Element { index, source } => write!(f, "element {index}: {source}"),
        }
    }
}

impl core::error::Error for DecodeErrorKind {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            DecodeErrorKind::Parse(err) => Some(err),
            DecodeErrorKind::Element { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<ParseError> for DecodeErrorKind {
    fn from(err: ParseError) -> Self {
        DecodeErrorKind::Parse(err)
    }
}

/// A literal that could not be parsed into its target type.
#[derive(Debug)]
pub enum ParseError {
    /// Boolean, integer or float literal.
    Number(NumError),
    /// Timestamp that is not RFC 3339.
    Time {
        /// The rejected input.
        input: String,
        /// The underlying parse failure.
        error: time::error::Parse,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Number(err) => write!(f, "{err}"),
            ParseError::Time { input, error } => {
                write!(f, "parsing {input:?} as an RFC 3339 timestamp: {error}")
            }
        }
    }
}

impl core::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            ParseError::Number(err) => Some(err),
            ParseError::Time { error, .. } => Some(error),
        }
    }
}

impl From<NumError> for ParseError {
    fn from(err: NumError) -> Self {
        ParseError::Number(err)
    }
}

impl From<NumError> for DecodeErrorKind {
    fn from(err: NumError) -> Self {
        DecodeErrorKind::Parse(ParseError::Number(err))
    }
}

/// A value handed to [`FormType::from_value`](crate::FormType::from_value)
/// that does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueMismatch {
    /// Type name of the rejected value.
    pub found: String,
}

impl ValueMismatch {
    /// Records the type of `value`.
    pub fn of(value: &Value) -> Self {
        ValueMismatch {
            found: value.type_name(),
        }
    }
}

impl fmt::Display for ValueMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unexpected value of type {}", self.found)
    }
}

impl core::error::Error for ValueMismatch {}

#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

extern crate alloc;

// Lets `#[derive(Record)]` refer to `::formbind` from inside this crate's tests.
#[cfg(test)]
extern crate self as formbind;

mod tracing_macros;
#[allow(unused_imports)]
pub(crate) use tracing_macros::{debug, trace};

mod attachment;
mod coerce;
mod convert;
mod decode;
mod error;
mod form;
mod impls;
mod number;
mod resolve;
mod shape;
mod tag;
mod value;

pub use attachment::Attachment;
pub use coerce::coerce;
pub use convert::convert;
pub use decode::{DEFAULT_TAG, Decoder, from_form};
pub use error::{DecodeError, DecodeErrorKind, ErrorCategory, ParseError, ValueMismatch};
pub use form::{AttachmentMap, MultipartForm, ValueMap};
pub use number::{NumError, NumErrorReason};
pub use resolve::resolve;
pub use shape::{Def, Field, FieldTag, FormType, Kind, Record, RecordShape, ScalarType, Shape};
pub use tag::{TagOptions, parse_tag};
pub use value::Value;

pub use formbind_macros::Record;

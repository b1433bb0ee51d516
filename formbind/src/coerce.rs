//! Final adaptation of a dynamic value to a field's exact declared type.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::{Attachment, Def, DecodeErrorKind, FormType, Shape, Value, trace};

/// Brings `value` to the exact shape `target`, or explains why it can't.
///
/// Rules are tried in order:
///
/// 1. nil (or a nil pointer) becomes the zero value of `target`;
/// 2. a value that already has shape `target` is returned unchanged;
/// 3. a value directly convertible to `target` (numeric widening or
///    narrowing) is converted;
/// 4. for an `Option<T>` target, a value convertible to `T` is boxed;
/// 5. a boxed value whose pointee converts to a non-optional `target` is
///    unboxed;
/// 6. sequences are coerced element by element into `target`'s element type;
/// 7. anything else is [`DecodeErrorKind::TypeIncompatible`].
///
/// This also adapts raw attachment values, which never go through
/// [`convert`](crate::convert).
pub fn coerce(value: Value, target: &'static Shape) -> Result<Value, DecodeErrorKind> {
    if value.is_nil() {
        trace!(%target, "nil value, using zero value");
        return zero_value(target);
    }

    if value.shape() == Some(target) {
        return Ok(value);
    }

    let value = match convert_direct(value, target) {
        Ok(converted) => return Ok(converted),
        Err(value) => value,
    };

    if let Def::Option(inner) = target.def {
        let value = match convert_identity(value, inner) {
            Ok(converted) => {
                return Ok(Value::Pointer {
                    shape: target,
                    inner: Some(Box::new(converted)),
                });
            }
            Err(value) => value,
        };
        return coerce_sequence(value, target);
    }

    let value = match value {
        Value::Pointer {
            inner: Some(pointee),
            shape,
        } => match convert_identity(*pointee, target) {
            Ok(converted) => return Ok(converted),
            Err(pointee) => Value::Pointer {
                shape,
                inner: Some(Box::new(pointee)),
            },
        },
        other => other,
    };

    coerce_sequence(value, target)
}

/// Rule 6, falling back to rule 7.
fn coerce_sequence(value: Value, target: &'static Shape) -> Result<Value, DecodeErrorKind> {
    let (element, len) = match target.def {
        Def::List(t) => (t, None),
        Def::Array { t, n } => (t, Some(n)),
        _ => return Err(DecodeErrorKind::incompatible(&value, target)),
    };
    let Value::Sequence { items, .. } = value else {
        return Err(DecodeErrorKind::incompatible(&value, target));
    };
    if let Some(n) = len
        && items.len() != n
    {
        return Err(DecodeErrorKind::LengthMismatch {
            shape: target,
            got: items.len(),
        });
    }

    let items = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| coerce(item, element).map_err(|e| e.at_element(index)))
        .collect::<Result<Vec<_>, _>>()?;
    trace!(%target, len = items.len(), "coerced sequence");
    Ok(Value::Sequence {
        shape: target,
        items,
    })
}

/// Rule 3: numeric conversions between scalars.
fn convert_direct(value: Value, target: &'static Shape) -> Result<Value, Value> {
    match (target.def, value.shape().and_then(Shape::scalar_type)) {
        (Def::Scalar(to), Some(from)) if from.is_numeric() && to.is_numeric() => value.cast(to),
        _ => Err(value),
    }
}

/// Rules 2 and 3 together: the value as-is when shapes match, else converted.
fn convert_identity(value: Value, target: &'static Shape) -> Result<Value, Value> {
    if value.shape() == Some(target) {
        return Ok(value);
    }
    convert_direct(value, target)
}

/// The value a field of shape `shape` holds when nothing was assigned.
fn zero_value(shape: &'static Shape) -> Result<Value, DecodeErrorKind> {
    let value = match shape.def {
        Def::Option(_) => Value::Pointer { shape, inner: None },
        Def::List(_) => Value::Sequence {
            shape,
            items: Vec::new(),
        },
        Def::Array { t, n } => Value::Sequence {
            shape,
            items: (0..n).map(|_| zero_value(t)).collect::<Result<_, _>>()?,
        },
        Def::Scalar(scalar) => {
            use crate::ScalarType as S;
            match scalar {
                S::Bool => Value::Bool(false),
                S::I8 => Value::I8(0),
                S::I16 => Value::I16(0),
                S::I32 => Value::I32(0),
                S::I64 => Value::I64(0),
                S::ISize => Value::ISize(0),
                S::U8 => Value::U8(0),
                S::U16 => Value::U16(0),
                S::U32 => Value::U32(0),
                S::U64 => Value::U64(0),
                S::USize => Value::USize(0),
                S::F32 => Value::F32(0.0),
                S::F64 => Value::F64(0.0),
                S::String => Value::String(Default::default()),
                S::Time => Value::Time(time::OffsetDateTime::UNIX_EPOCH),
                S::Attachment => Value::Attachment(Attachment::default()),
            }
        }
        Def::Record(_) | Def::Opaque => return Err(DecodeErrorKind::Unsupported { shape }),
    };
    Ok(value)
}

/// Shape of the value the decoder builds from a raw attachment list.
pub(crate) const ATTACHMENT_LIST: &Shape = <Vec<Attachment> as FormType>::SHAPE;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCategory;
    use time::OffsetDateTime;

    #[test]
    fn nil_becomes_the_zero_value() {
        assert_eq!(coerce(Value::Nil, i32::SHAPE).unwrap(), Value::I32(0));
        assert_eq!(
            coerce(Value::Nil, String::SHAPE).unwrap(),
            Value::String(String::new())
        );
        assert_eq!(
            coerce(Value::Nil, <Option<u8>>::SHAPE).unwrap(),
            Value::Pointer {
                shape: <Option<u8>>::SHAPE,
                inner: None
            }
        );
        let nil_pointer = Value::Pointer {
            shape: <Option<String>>::SHAPE,
            inner: None,
        };
        assert_eq!(coerce(nil_pointer, bool::SHAPE).unwrap(), Value::Bool(false));
        assert_eq!(
            coerce(Value::Nil, <[u8; 2]>::SHAPE).unwrap(),
            Value::Sequence {
                shape: <[u8; 2]>::SHAPE,
                items: vec![Value::U8(0), Value::U8(0)],
            }
        );
        assert_eq!(
            coerce(Value::Nil, OffsetDateTime::SHAPE).unwrap(),
            Value::Time(OffsetDateTime::UNIX_EPOCH)
        );
    }

    #[test]
    fn exact_shapes_pass_through() {
        let value = Value::String("Alice".into());
        assert_eq!(coerce(value.clone(), String::SHAPE).unwrap(), value);
    }

    #[test]
    fn numbers_narrow_and_widen() {
        assert_eq!(coerce(Value::I64(30), i8::SHAPE).unwrap(), Value::I8(30));
        assert_eq!(coerce(Value::U64(7), u32::SHAPE).unwrap(), Value::U32(7));
        assert_eq!(coerce(Value::I64(-1), isize::SHAPE).unwrap(), Value::ISize(-1));
        assert_eq!(coerce(Value::F64(0.5), f32::SHAPE).unwrap(), Value::F32(0.5));
        assert_eq!(coerce(Value::I32(3), f64::SHAPE).unwrap(), Value::F64(3.0));
    }

    #[test]
    fn values_are_boxed_into_options() {
        assert_eq!(
            coerce(Value::I64(9), <Option<u16>>::SHAPE).unwrap(),
            Value::Pointer {
                shape: <Option<u16>>::SHAPE,
                inner: Some(Box::new(Value::U16(9))),
            }
        );
        let file = Attachment::new("photo.png");
        assert_eq!(
            coerce(Value::Attachment(file.clone()), <Option<Attachment>>::SHAPE).unwrap(),
            Value::Pointer {
                shape: <Option<Attachment>>::SHAPE,
                inner: Some(Box::new(Value::Attachment(file))),
            }
        );
    }

    #[test]
    fn pointers_are_unboxed_into_values() {
        let boxed = Value::Pointer {
            shape: <Option<i64>>::SHAPE,
            inner: Some(Box::new(Value::I64(12))),
        };
        assert_eq!(coerce(boxed, u8::SHAPE).unwrap(), Value::U8(12));
    }

    #[test]
    fn pointers_do_not_convert_between_pointee_types() {
        let boxed = Value::Pointer {
            shape: <Option<i64>>::SHAPE,
            inner: Some(Box::new(Value::I64(12))),
        };
        let err = coerce(boxed, <Option<i32>>::SHAPE).unwrap_err();
        assert_eq!(
            err.to_string(),
            "type incompatible: Option<i64> -> Option<i32>"
        );
    }

    #[test]
    fn sequences_coerce_element_wise() {
        let value = Value::Sequence {
            shape: <Vec<i64>>::SHAPE,
            items: vec![Value::I64(1), Value::I64(2), Value::I64(3)],
        };
        assert_eq!(
            coerce(value.clone(), <Vec<u8>>::SHAPE).unwrap(),
            Value::Sequence {
                shape: <Vec<u8>>::SHAPE,
                items: vec![Value::U8(1), Value::U8(2), Value::U8(3)],
            }
        );
        assert_eq!(
            coerce(value.clone(), <[i32; 3]>::SHAPE).unwrap(),
            Value::Sequence {
                shape: <[i32; 3]>::SHAPE,
                items: vec![Value::I32(1), Value::I32(2), Value::I32(3)],
            }
        );
        assert!(matches!(
            coerce(value, <[i32; 2]>::SHAPE),
            Err(DecodeErrorKind::LengthMismatch { got: 3, .. })
        ));
    }

    #[test]
    fn attachment_lists_coerce_into_optional_elements() {
        let files = Value::Sequence {
            shape: ATTACHMENT_LIST,
            items: vec![Value::Attachment(Attachment::new("a.txt"))],
        };
        assert_eq!(
            coerce(files, <Vec<Option<Attachment>>>::SHAPE).unwrap(),
            Value::Sequence {
                shape: <Vec<Option<Attachment>>>::SHAPE,
                items: vec![Value::Pointer {
                    shape: <Option<Attachment>>::SHAPE,
                    inner: Some(Box::new(Value::Attachment(Attachment::new("a.txt")))),
                }],
            }
        );
    }

    #[test]
    fn element_failures_name_the_position() {
        let value = Value::Sequence {
            shape: <Vec<String>>::SHAPE,
            items: vec![Value::String("a".into()), Value::String("b".into())],
        };
        let err = coerce(value, <Vec<bool>>::SHAPE).unwrap_err();
        assert_eq!(err.to_string(), "element 0: type incompatible: String -> bool");
    }

    #[test]
    fn incompatible_values() {
        let err = coerce(Value::String("x".into()), i32::SHAPE).unwrap_err();
        assert_eq!(err.to_string(), "type incompatible: String -> i32");
        assert_eq!(err.category(), ErrorCategory::Input);

        let err = coerce(Value::Attachment(Attachment::new("a")), String::SHAPE).unwrap_err();
        assert_eq!(err.to_string(), "type incompatible: Attachment -> String");

        let err = coerce(Value::Bool(true), <Vec<bool>>::SHAPE).unwrap_err();
        assert_eq!(err.to_string(), "type incompatible: bool -> Vec<bool>");
    }
}

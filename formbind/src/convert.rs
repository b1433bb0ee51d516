//! String-to-value conversion, keyed by the target's [`Kind`].

use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::vec::Vec;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::number::{parse_bool, parse_float, parse_int, parse_uint};
use crate::{Def, DecodeErrorKind, Kind, ParseError, Shape, Value, trace};

/// Converts raw strings into a value of (or convertible to) `target`.
///
/// Scalars need exactly one input string. Sequences convert each string on
/// its own and keep the input order. When `target` is an `Option`, the result
/// is a boxed [`Value::Pointer`] holding the exact inner type.
///
/// Integers come back as `i64`/`u64` and floats as `f64` for non-optional
/// targets; [`coerce`](crate::coerce) narrows them to the declared width.
pub fn convert<S: AsRef<str>>(
    values: &[S],
    target: &'static Shape,
) -> Result<Value, DecodeErrorKind> {
    let (base, is_pointer) = target.unwrap_option();
    let kind = target.kind();
    trace!(%target, ?kind, count = values.len(), "converting");

    let value = match kind {
        Kind::Bool => Value::Bool(parse_bool(single(values, base)?)?),
        Kind::Int | Kind::Int8 | Kind::Int16 | Kind::Int32 | Kind::Int64 => {
            let bits = kind.bits().unwrap_or(64);
            Value::I64(parse_int(single(values, base)?, bits, base.type_identifier)?)
        }
        Kind::Uint | Kind::Uint8 | Kind::Uint16 | Kind::Uint32 | Kind::Uint64 => {
            let bits = kind.bits().unwrap_or(64);
            Value::U64(parse_uint(single(values, base)?, bits, base.type_identifier)?)
        }
        Kind::Float32 | Kind::Float64 => {
            Value::F64(parse_float(single(values, base)?, base.type_identifier)?)
        }
        Kind::String => Value::String(single(values, base)?.to_string()),
        Kind::Time => {
            let input = single(values, base)?;
            let parsed =
                OffsetDateTime::parse(input, &Rfc3339).map_err(|error| ParseError::Time {
                    input: input.to_string(),
                    error,
                })?;
            Value::Time(parsed)
        }
        Kind::Sequence => convert_sequence(values, base)?,
        Kind::Attachment | Kind::Unsupported | Kind::Invalid => {
            return Err(DecodeErrorKind::Unsupported { shape: target });
        }
    };

    if !is_pointer {
        return Ok(value);
    }

    // Box the exact base type, so `Option<i8>` holds an `i8` rather than an `i64`.
    let value = match base.def {
        Def::Scalar(scalar) => value
            .cast(scalar)
            .map_err(|v| DecodeErrorKind::incompatible(&v, base))?,
        _ => value,
    };
    Ok(Value::Pointer {
        shape: target,
        inner: Some(Box::new(value)),
    })
}

fn single<'a, S: AsRef<str>>(
    values: &'a [S],
    shape: &'static Shape,
) -> Result<&'a str, DecodeErrorKind> {
    match values {
        [value] => Ok(value.as_ref()),
        _ => Err(DecodeErrorKind::NotSingleValue {
            shape,
            count: values.len(),
        }),
    }
}

fn convert_sequence<S: AsRef<str>>(
    values: &[S],
    shape: &'static Shape,
) -> Result<Value, DecodeErrorKind> {
    let element = match shape.def {
        Def::List(t) => t,
        Def::Array { t, n } => {
            if values.len() != n {
                return Err(DecodeErrorKind::LengthMismatch {
                    shape,
                    got: values.len(),
                });
            }
            t
        }
        _ => return Err(DecodeErrorKind::Unsupported { shape }),
    };

    // One level only: elements are scalars, possibly optional.
    if !matches!(element.unwrap_option().0.def, Def::Scalar(_)) || element.is_attachment() {
        return Err(DecodeErrorKind::Unsupported { shape });
    }

    let mut items = Vec::with_capacity(values.len());
    for (index, raw) in values.iter().enumerate() {
        let item =
            convert(core::slice::from_ref(raw), element).map_err(|e| e.at_element(index))?;
        let item = match element.def {
            Def::Scalar(scalar) => item.cast(scalar).unwrap_or_else(|v| v),
            _ => item,
        };
        items.push(item);
    }

    trace!(%shape, len = items.len(), "converted sequence");
    Ok(Value::Sequence { shape, items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FormType, NumErrorReason};

    fn parse_error(err: DecodeErrorKind) -> NumErrorReason {
        match err.root() {
            DecodeErrorKind::Parse(ParseError::Number(num)) => num.reason,
            other => panic!("expected a number parse error, got {other:?}"),
        }
    }

    #[test]
    fn integers_parse_wide_and_enforce_width() {
        assert_eq!(convert(&["30"], i32::SHAPE).unwrap(), Value::I64(30));
        assert_eq!(convert(&["0x10"], u16::SHAPE).unwrap(), Value::U64(16));
        assert_eq!(convert(&["-0b11"], isize::SHAPE).unwrap(), Value::I64(-3));
        assert_eq!(
            parse_error(convert(&["300"], u8::SHAPE).unwrap_err()),
            NumErrorReason::Range
        );
        assert_eq!(
            parse_error(convert(&["notanumber"], i64::SHAPE).unwrap_err()),
            NumErrorReason::Syntax
        );
    }

    #[test]
    fn scalars_need_exactly_one_value() {
        let none: [&str; 0] = [];
        for shape in [
            bool::SHAPE,
            i8::SHAPE,
            u64::SHAPE,
            f32::SHAPE,
            String::SHAPE,
            OffsetDateTime::SHAPE,
        ] {
            assert!(matches!(
                convert(&none, shape),
                Err(DecodeErrorKind::NotSingleValue { count: 0, .. })
            ));
            assert!(matches!(
                convert(&["1", "2"], shape),
                Err(DecodeErrorKind::NotSingleValue { count: 2, .. })
            ));
        }
    }

    #[test]
    fn floats_stay_f64_until_coercion() {
        assert_eq!(convert(&["1.25"], f32::SHAPE).unwrap(), Value::F64(1.25));
        assert_eq!(
            parse_error(convert(&["1,5"], f64::SHAPE).unwrap_err()),
            NumErrorReason::Syntax
        );
    }

    #[test]
    fn booleans() {
        assert_eq!(convert(&["t"], bool::SHAPE).unwrap(), Value::Bool(true));
        assert_eq!(convert(&["False"], bool::SHAPE).unwrap(), Value::Bool(false));
        assert_eq!(
            parse_error(convert(&["yes"], bool::SHAPE).unwrap_err()),
            NumErrorReason::Syntax
        );
    }

    #[test]
    fn timestamps_are_strict_rfc3339() {
        let value = convert(&["2024-05-01T12:30:00Z"], OffsetDateTime::SHAPE).unwrap();
        let Value::Time(t) = value else {
            panic!("expected a timestamp, got {value:?}");
        };
        assert_eq!(t.unix_timestamp(), 1_714_566_600);

        let err = convert(&["01/05/2024"], OffsetDateTime::SHAPE).unwrap_err();
        assert!(matches!(err, DecodeErrorKind::Parse(ParseError::Time { .. })));
    }

    #[test]
    fn optional_targets_box_the_exact_base_type() {
        assert_eq!(
            convert(&["Alice"], <Option<String>>::SHAPE).unwrap(),
            Value::Pointer {
                shape: <Option<String>>::SHAPE,
                inner: Some(Box::new(Value::String("Alice".into()))),
            }
        );
        assert_eq!(
            convert(&["-5"], <Option<i8>>::SHAPE).unwrap(),
            Value::Pointer {
                shape: <Option<i8>>::SHAPE,
                inner: Some(Box::new(Value::I8(-5))),
            }
        );
        assert_eq!(
            convert(&["2.5"], <Option<f32>>::SHAPE).unwrap(),
            Value::Pointer {
                shape: <Option<f32>>::SHAPE,
                inner: Some(Box::new(Value::F32(2.5))),
            }
        );
    }

    #[test]
    fn sequences_convert_each_value_in_order() {
        assert_eq!(
            convert(&["1", "2", "3"], <Vec<i32>>::SHAPE).unwrap(),
            Value::Sequence {
                shape: <Vec<i32>>::SHAPE,
                items: vec![Value::I32(1), Value::I32(2), Value::I32(3)],
            }
        );
        assert_eq!(
            convert(&["x", "y"], <Vec<Option<String>>>::SHAPE).unwrap(),
            Value::Sequence {
                shape: <Vec<Option<String>>>::SHAPE,
                items: vec![
                    Value::Pointer {
                        shape: <Option<String>>::SHAPE,
                        inner: Some(Box::new(Value::String("x".into()))),
                    },
                    Value::Pointer {
                        shape: <Option<String>>::SHAPE,
                        inner: Some(Box::new(Value::String("y".into()))),
                    },
                ],
            }
        );
        let none: [&str; 0] = [];
        assert_eq!(
            convert(&none, <Vec<u8>>::SHAPE).unwrap(),
            Value::Sequence {
                shape: <Vec<u8>>::SHAPE,
                items: vec![],
            }
        );
    }

    #[test]
    fn sequence_failures_name_the_element() {
        let err = convert(&["1", "two", "3"], <Vec<i32>>::SHAPE).unwrap_err();
        assert!(matches!(err, DecodeErrorKind::Element { index: 1, .. }));
        assert_eq!(parse_error(err), NumErrorReason::Syntax);
    }

    #[test]
    fn arrays_need_their_declared_length() {
        assert_eq!(
            convert(&["true", "0"], <[bool; 2]>::SHAPE).unwrap(),
            Value::Sequence {
                shape: <[bool; 2]>::SHAPE,
                items: vec![Value::Bool(true), Value::Bool(false)],
            }
        );
        assert!(matches!(
            convert(&["true"], <[bool; 2]>::SHAPE),
            Err(DecodeErrorKind::LengthMismatch { got: 1, .. })
        ));
    }

    #[test]
    fn optional_sequences_are_boxed() {
        let value = convert(&["a"], <Option<Vec<String>>>::SHAPE).unwrap();
        assert_eq!(
            value,
            Value::Pointer {
                shape: <Option<Vec<String>>>::SHAPE,
                inner: Some(Box::new(Value::Sequence {
                    shape: <Vec<String>>::SHAPE,
                    items: vec![Value::String("a".into())],
                })),
            }
        );
    }

    #[test]
    fn unsupported_targets() {
        for shape in [
            <Option<Option<u8>>>::SHAPE,
            <Vec<Vec<u8>>>::SHAPE,
            <Option<crate::Attachment>>::SHAPE,
            <Vec<crate::Attachment>>::SHAPE,
        ] {
            assert!(
                matches!(convert(&["1"], shape), Err(DecodeErrorKind::Unsupported { .. })),
                "{shape}"
            );
        }
    }
}

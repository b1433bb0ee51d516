//! [`FormType`] for the supported scalars and containers.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use time::OffsetDateTime;

use crate::{Attachment, Def, FormType, ScalarType, Shape, Value, ValueMismatch};

macro_rules! impl_scalar {
    ($($ty:ty => $variant:ident as $name:literal),* $(,)?) => {
        $(
            impl FormType for $ty {
                const SHAPE: &'static Shape = &const { Shape::scalar($name, ScalarType::$variant) };

                fn from_value(value: Value) -> Result<Self, ValueMismatch> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(ValueMismatch::of(&other)),
                    }
                }
            }
        )*
    };
}

impl_scalar! {
    bool => Bool as "bool",
    i8 => I8 as "i8",
    i16 => I16 as "i16",
    i32 => I32 as "i32",
    i64 => I64 as "i64",
    isize => ISize as "isize",
    u8 => U8 as "u8",
    u16 => U16 as "u16",
    u32 => U32 as "u32",
    u64 => U64 as "u64",
    usize => USize as "usize",
    f32 => F32 as "f32",
    f64 => F64 as "f64",
    String => String as "String",
    OffsetDateTime => Time as "OffsetDateTime",
    Attachment => Attachment as "Attachment",
}

impl<T: FormType> FormType for Option<T> {
    const SHAPE: &'static Shape = &const {
        Shape {
            type_identifier: "Option",
            def: Def::Option(T::SHAPE),
        }
    };

    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Nil | Value::Pointer { inner: None, .. } => Ok(None),
            Value::Pointer {
                inner: Some(inner), ..
            } => T::from_value(*inner).map(Some),
            other => Err(ValueMismatch::of(&other)),
        }
    }
}

impl<T: FormType> FormType for Vec<T> {
    const SHAPE: &'static Shape = &const {
        Shape {
            type_identifier: "Vec",
            def: Def::List(T::SHAPE),
        }
    };

    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Sequence { items, .. } => items.into_iter().map(T::from_value).collect(),
            other => Err(ValueMismatch::of(&other)),
        }
    }
}

impl<T: FormType, const N: usize> FormType for [T; N] {
    const SHAPE: &'static Shape = &const {
        Shape {
            type_identifier: "array",
            def: Def::Array { t: T::SHAPE, n: N },
        }
    };

    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        let found = value.type_name();
        let items = Vec::<T>::from_value(match value {
            Value::Sequence { items, .. } => Value::Sequence {
                shape: <Vec<T>>::SHAPE,
                items,
            },
            other => other,
        })?;
        items.try_into().map_err(|_| ValueMismatch { found })
    }
}

impl<T: FormType> FormType for Box<T> {
    const SHAPE: &'static Shape = T::SHAPE;

    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        T::from_value(value).map(Box::new)
    }

    fn as_record_mut(&mut self) -> Option<&mut dyn crate::Record> {
        (**self).as_record_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kind;

    #[test]
    fn shapes_display_as_rust_types() {
        assert_eq!(<Option<i32>>::SHAPE.to_string(), "Option<i32>");
        assert_eq!(<Vec<u8>>::SHAPE.to_string(), "Vec<u8>");
        assert_eq!(<[bool; 3]>::SHAPE.to_string(), "[bool; 3]");
        assert_eq!(<Vec<Option<String>>>::SHAPE.to_string(), "Vec<Option<String>>");
    }

    #[test]
    fn kinds_look_through_one_option() {
        assert_eq!(<i16>::SHAPE.kind(), Kind::Int16);
        assert_eq!(<Option<u32>>::SHAPE.kind(), Kind::Uint32);
        assert_eq!(<isize>::SHAPE.kind(), Kind::Int);
        assert_eq!(<Option<OffsetDateTime>>::SHAPE.kind(), Kind::Time);
        assert_eq!(<Vec<f32>>::SHAPE.kind(), Kind::Sequence);
        assert_eq!(<Option<Vec<f32>>>::SHAPE.kind(), Kind::Sequence);
        assert_eq!(<Option<Option<u8>>>::SHAPE.kind(), Kind::Unsupported);
        assert_eq!(<Option<Attachment>>::SHAPE.kind(), Kind::Attachment);
        assert_eq!(<Vec<Attachment>>::SHAPE.kind(), Kind::Attachment);
    }

    #[test]
    fn from_value_requires_exact_shape() {
        assert_eq!(i32::from_value(Value::I32(7)), Ok(7));
        assert_eq!(
            i32::from_value(Value::I64(7)),
            Err(ValueMismatch {
                found: "i64".into()
            })
        );
        assert_eq!(<Option<u8>>::from_value(Value::Nil), Ok(None));
        let items = vec![Value::U8(1), Value::U8(2)];
        assert_eq!(
            <[u8; 2]>::from_value(Value::Sequence {
                shape: <[u8; 2]>::SHAPE,
                items: items.clone(),
            }),
            Ok([1, 2])
        );
        assert!(
            <[u8; 3]>::from_value(Value::Sequence {
                shape: <[u8; 2]>::SHAPE,
                items,
            })
            .is_err()
        );
    }
}

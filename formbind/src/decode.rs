use alloc::borrow::Cow;

use crate::coerce::ATTACHMENT_LIST;
use crate::{
    Attachment, AttachmentMap, DecodeError, DecodeErrorKind, Def, Field, FormType, MultipartForm,
    Record, RecordShape, ScalarType, Value, ValueMap, coerce, convert, debug, resolve, trace,
};

/// The tag key consulted by [`Decoder::new`].
pub const DEFAULT_TAG: &str = "form";

/// Binds submitted values and attachments onto a record.
///
/// A decoder only holds the tag key it matches field tags under, so
/// differently configured decoders can be used side by side.
///
/// ```
/// use formbind::{Decoder, MultipartForm, Record};
///
/// #[derive(Debug, Default, Record)]
/// struct Signup {
///     #[tag(form = "name")]
///     name: String,
///     #[tag(form = "age")]
///     age: u8,
/// }
///
/// let form = MultipartForm::new()
///     .with_value("name", "Alice")
///     .with_value("age", "30");
///
/// let mut signup = Signup::default();
/// Decoder::new().decode_form(&mut signup, &form).unwrap();
/// assert_eq!(signup.name, "Alice");
/// assert_eq!(signup.age, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoder {
    tag: Cow<'static, str>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    /// A decoder matching `#[tag(form = "...")]`.
    pub const fn new() -> Self {
        Decoder {
            tag: Cow::Borrowed(DEFAULT_TAG),
        }
    }

    /// A decoder matching tags registered under `tag` instead.
    pub fn with_tag(tag: impl Into<Cow<'static, str>>) -> Self {
        Decoder { tag: tag.into() }
    }

    /// The tag key this decoder matches.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Decodes a whole submission into `dst`.
    pub fn decode_form<T: FormType>(
        &self,
        dst: &mut T,
        form: &MultipartForm,
    ) -> Result<(), DecodeError> {
        self.decode(dst, &form.values, &form.files)
    }

    /// Assigns every resolvable key of `values` and `files` to the matching
    /// field of `dst`.
    ///
    /// Keys that match no field, and keys with an empty value list, are
    /// skipped. Decoding stops at the first failing field; fields assigned
    /// before it keep their new values.
    pub fn decode<T: FormType>(
        &self,
        dst: &mut T,
        values: &ValueMap,
        files: &AttachmentMap,
    ) -> Result<(), DecodeError> {
        let Some(record) = dst.as_record_mut() else {
            return Err(DecodeError::new(DecodeErrorKind::NotPointerToRecord {
                shape: T::SHAPE,
            }));
        };
        let shape = record.record_shape();
        debug!(
            record = shape.type_identifier,
            tag = %self.tag,
            values = values.len(),
            files = files.len(),
            "decoding"
        );

        for (key, raw) in values {
            if raw.is_empty() {
                trace!(key = %key, "no values, skipping");
                continue;
            }
            let Some((index, field)) = self.field_for(shape, key)? else {
                continue;
            };
            let converted = convert(raw, field.shape).map_err(|e| attributed(e, field))?;
            let coerced = coerce(converted, field.shape).map_err(|e| attributed(e, field))?;
            assign(record, index, field, coerced)?;
        }

        for (key, list) in files {
            let Some((index, field)) = self.field_for(shape, key)? else {
                continue;
            };
            let Some(value) = attachment_value(field, list)? else {
                trace!(key = %key, "no attachments, skipping");
                continue;
            };
            let coerced = coerce(value, field.shape).map_err(|e| attributed(e, field))?;
            assign(record, index, field, coerced)?;
        }

        Ok(())
    }

    /// Resolves `key` to a writable field, `None` when nothing matches.
    fn field_for(
        &self,
        shape: &'static RecordShape,
        key: &str,
    ) -> Result<Option<(usize, &'static Field)>, DecodeError> {
        let Some(index) = resolve(shape, &self.tag, key) else {
            return Ok(None);
        };
        let field = &shape.fields[index];
        if !field.writable {
            return Err(attributed(DecodeErrorKind::FieldNotSettable, field));
        }
        Ok(Some((index, field)))
    }
}

/// Picks the value to coerce from a raw attachment list, based on the
/// field's declared shape.
fn attachment_value(
    field: &'static Field,
    list: &[Attachment],
) -> Result<Option<Value>, DecodeError> {
    let (base, _) = field.shape.unwrap_option();
    match field.shape.def {
        Def::List(t) | Def::Array { t, .. } if t.is_attachment() => Ok(Some(Value::Sequence {
            shape: ATTACHMENT_LIST,
            items: list.iter().cloned().map(Value::Attachment).collect(),
        })),
        Def::Option(_) if base.scalar_type() == Some(ScalarType::Attachment) => match list {
            [] => Ok(None),
            [single] => Ok(Some(Value::Attachment(single.clone()))),
            _ => Err(attributed(
                DecodeErrorKind::MultipleAttachments { count: list.len() },
                field,
            )),
        },
        _ => Err(attributed(
            DecodeErrorKind::UnsupportedAttachmentField { shape: field.shape },
            field,
        )),
    }
}

fn assign(
    record: &mut dyn Record,
    index: usize,
    field: &'static Field,
    value: Value,
) -> Result<(), DecodeError> {
    record.set_field(index, value).map_err(|mismatch| {
        attributed(
            DecodeErrorKind::TypeIncompatible {
                from: mismatch.found,
                to: field.shape,
            },
            field,
        )
    })?;
    trace!(field = field.name, "assigned");
    Ok(())
}

fn attributed(kind: DecodeErrorKind, field: &'static Field) -> DecodeError {
    DecodeError::new(kind).with_field(field)
}

/// Decodes `form` into a fresh `T::default()` using [`DEFAULT_TAG`].
pub fn from_form<T: FormType + Default>(form: &MultipartForm) -> Result<T, DecodeError> {
    let mut value = T::default();
    Decoder::new().decode_form(&mut value, form)?;
    Ok(value)
}

use alloc::string::String;
use alloc::vec::Vec;

use indexmap::IndexMap;

use crate::Attachment;

/// Submitted field values, keyed by name. A key may carry several values.
pub type ValueMap = IndexMap<String, Vec<String>>;

/// Submitted attachments, keyed by name.
pub type AttachmentMap = IndexMap<String, Vec<Attachment>>;

/// A parsed form submission: plain values plus file attachments.
///
/// Keys keep their insertion order, which is the order the decoder visits
/// them in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    /// Plain field values.
    pub values: ValueMap,

    /// File attachments.
    pub files: AttachmentMap,
}

impl MultipartForm {
    /// An empty submission.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one value under `key`.
    pub fn add_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    /// Appends one attachment under `key`.
    pub fn add_file(&mut self, key: impl Into<String>, file: Attachment) {
        self.files.entry(key.into()).or_default().push(file);
    }

    /// Builder form of [`MultipartForm::add_value`].
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_value(key, value);
        self
    }

    /// Appends every value of `values` under `key`. An empty iterator still
    /// registers the key, with no values.
    pub fn with_values<I>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.values
            .entry(key.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Builder form of [`MultipartForm::add_file`].
    pub fn with_file(mut self, key: impl Into<String>, file: Attachment) -> Self {
        self.add_file(key, file);
        self
    }
}

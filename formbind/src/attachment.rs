use alloc::string::String;

use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

/// Descriptor of an uploaded file: its name and part headers.
///
/// Never carries the file's bytes. The decoder moves attachments into
/// `Option<Attachment>` and `Vec<Attachment>` fields without looking inside.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attachment {
    /// File name as submitted by the client.
    pub filename: String,

    /// Headers of the multipart part.
    pub headers: HeaderMap,

    /// Size of the content in bytes, as reported by the transport.
    pub size: u64,
}

impl Attachment {
    /// Creates a descriptor for `filename` with no headers.
    pub fn new(filename: impl Into<String>) -> Self {
        Attachment {
            filename: filename.into(),
            ..Attachment::default()
        }
    }

    /// Adds a part header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Sets the reported size.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// The part's `Content-Type`, if present and valid UTF-8.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE)?.to_str().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_comes_from_headers() {
        let plain = Attachment::new("notes.txt");
        assert_eq!(plain.content_type(), None);

        let png = Attachment::new("photo.png")
            .with_header(CONTENT_TYPE, HeaderValue::from_static("image/png"))
            .with_size(2048);
        assert_eq!(png.content_type(), Some("image/png"));
        assert_eq!(png.size, 2048);
        assert_eq!(png.filename, "photo.png");
    }
}

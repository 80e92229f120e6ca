//! Typed multipart form fields.

/// One part of a `multipart/form-data` body.
///
/// Parts are serialized in the order they were added to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartField {
    /// A plain `name=value` form field.
    Text { name: String, value: String },
    /// A file upload carrying raw bytes.
    File {
        name: String,
        filename: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

impl MultipartField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn file(
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self::File {
            name: name.into(),
            filename: filename.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// The raw content written between the part headers and the next delimiter.
    pub fn content(&self) -> &[u8] {
        match self {
            Self::Text { value, .. } => value.as_bytes(),
            Self::File { bytes, .. } => bytes,
        }
    }
}

//! `multipart/form-data` body assembly.

use rand::distributions::Alphanumeric;
use rand::Rng;
use thiserror::Error;

use crate::multipart::field::MultipartField;

/// Literal prefix of every generated boundary.
pub const BOUNDARY_PREFIX: &str = "----GatewayFormBoundary";

const BOUNDARY_SUFFIX_LEN: usize = 16;
const MAX_BOUNDARY_ATTEMPTS: usize = 8;

/// RFC 2046 caps boundaries at 70 characters.
const MAX_BOUNDARY_LEN: usize = 70;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MultipartError {
    #[error("boundary '{0}' occurs inside field content")]
    BoundaryCollision(String),

    #[error("'{0}' is not a valid multipart boundary")]
    InvalidBoundary(String),
}

/// Generate a boundary from the fixed prefix and a random alphanumeric suffix.
pub fn generate_boundary() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(BOUNDARY_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{}{}", BOUNDARY_PREFIX, suffix)
}

#[derive(Debug, Clone)]
enum Boundary {
    Generated(String),
    Supplied(String),
}

impl Boundary {
    fn as_str(&self) -> &str {
        match self {
            Boundary::Generated(b) | Boundary::Supplied(b) => b,
        }
    }
}

/// Encoded form body plus the boundary it was produced with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    bytes: Vec<u8>,
    boundary: String,
}

impl EncodedBody {
    /// Value for the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Ordered multipart form builder.
///
/// ```
/// use content_gateway::multipart::MultipartForm;
///
/// let body = MultipartForm::with_boundary("XyZ")
///     .text("model", "whisper-1")
///     .encode()
///     .unwrap();
/// assert_eq!(body.content_type(), "multipart/form-data; boundary=XyZ");
/// ```
#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: Boundary,
    fields: Vec<MultipartField>,
}

impl MultipartForm {
    /// A form with a freshly generated boundary.
    pub fn new() -> Self {
        Self {
            boundary: Boundary::Generated(generate_boundary()),
            fields: Vec::new(),
        }
    }

    /// A form using a caller-chosen boundary. Encoding fails instead of
    /// picking another boundary if this one collides with field content.
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: Boundary::Supplied(boundary.into()),
            fields: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        self.boundary.as_str()
    }

    pub fn push(&mut self, field: MultipartField) {
        self.fields.push(field);
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(MultipartField::text(name, value));
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        self.push(MultipartField::file(name, filename, content_type, bytes));
        self
    }

    /// Serialize all fields in order, followed by the closing delimiter.
    pub fn encode(&self) -> Result<EncodedBody, MultipartError> {
        let boundary = match &self.boundary {
            Boundary::Supplied(b) => {
                validate_boundary(b)?;
                if self.collides(b) {
                    return Err(MultipartError::BoundaryCollision(b.clone()));
                }
                b.clone()
            }
            Boundary::Generated(b) => self.free_boundary(b)?,
        };

        let mut body = Vec::with_capacity(self.estimated_len(&boundary));
        for field in &self.fields {
            write_part(&mut body, &boundary, field);
        }
        body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

        Ok(EncodedBody {
            bytes: body,
            boundary,
        })
    }

    fn free_boundary(&self, first: &str) -> Result<String, MultipartError> {
        let mut candidate = first.to_string();
        for _ in 0..MAX_BOUNDARY_ATTEMPTS {
            if !self.collides(&candidate) {
                return Ok(candidate);
            }
            tracing::debug!(boundary = %candidate, "Multipart boundary collided with content, regenerating");
            candidate = generate_boundary();
        }
        Err(MultipartError::BoundaryCollision(candidate))
    }

    fn collides(&self, boundary: &str) -> bool {
        let delimiter = format!("--{}", boundary);
        self.fields
            .iter()
            .any(|field| contains(field.content(), delimiter.as_bytes()))
    }

    fn estimated_len(&self, boundary: &str) -> usize {
        let per_part = boundary.len() + 128;
        self.fields
            .iter()
            .map(|f| f.content().len() + per_part)
            .sum::<usize>()
            + boundary.len()
            + 8
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

fn write_part(body: &mut Vec<u8>, boundary: &str, field: &MultipartField) {
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    match field {
        MultipartField::Text { name, value } => {
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    escape_param(name)
                )
                .as_bytes(),
            );
            body.extend_from_slice(value.as_bytes());
        }
        MultipartField::File {
            name,
            filename,
            content_type,
            bytes,
        } => {
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    escape_param(name),
                    escape_param(filename)
                )
                .as_bytes(),
            );
            body.extend_from_slice(
                format!("Content-Type: {}\r\n\r\n", strip_line_breaks(content_type)).as_bytes(),
            );
            body.extend_from_slice(bytes);
        }
    }
    body.extend_from_slice(b"\r\n");
}

/// Percent-encode the characters that would end a quoted header parameter,
/// matching what browsers send for form field names and filenames.
fn escape_param(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("%22"),
            '\r' => out.push_str("%0D"),
            '\n' => out.push_str("%0A"),
            _ => out.push(c),
        }
    }
    out
}

fn strip_line_breaks(value: &str) -> String {
    value.chars().filter(|c| !matches!(c, '\r' | '\n')).collect()
}

fn validate_boundary(boundary: &str) -> Result<(), MultipartError> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || "'()+_,-./:=? ".contains(c);
    let valid = !boundary.is_empty()
        && boundary.len() <= MAX_BOUNDARY_LEN
        && !boundary.ends_with(' ')
        && boundary.chars().all(allowed);
    if valid {
        Ok(())
    } else {
        Err(MultipartError::InvalidBoundary(boundary.to_string()))
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty()
        && haystack.len() >= needle.len()
        && haystack.windows(needle.len()).any(|w| w == needle)
}

//! Correlation id type, header name, and generation.

use std::borrow::Cow;
use std::fmt;

use http::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

/// The request header callers use to supply their own correlation id.
pub const CORRELATION_ID_HEADER: &str = "RacCorrelationId";

/// [`CORRELATION_ID_HEADER`] in the lowercase form `http` stores header names in.
pub const CORRELATION_ID_HEADER_NAME: HeaderName = HeaderName::from_static("raccorrelationid");

/// The logging context key the correlation id is bound under.
pub const CORRELATION_ID_KEY: &str = "RacCorrelationId";

/// Identifier grouping every log line produced while handling one request.
///
/// Either adopted verbatim from the caller's `RacCorrelationId` header or
/// generated as a UUID v4 in hyphenated form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a fresh id (UUID v4, e.g. `67e55044-10b1-426f-9247-bb680e5fe0c8`).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Adopt a caller-supplied value. Returns `None` for blank input
    /// (empty or whitespace only); anything else is kept as is.
    pub fn adopt(value: &str) -> Option<Self> {
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Header form of the id, or `None` if it cannot be sent back as a header value.
    pub fn to_header_value(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.0).ok()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CorrelationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Raw `RacCorrelationId` header value as observed on the request.
///
/// The bytes are decoded as UTF-8; invalid sequences become U+FFFD rather
/// than hiding the value.
pub fn header_value(headers: &HeaderMap) -> Option<Cow<'_, str>> {
    headers
        .get(&CORRELATION_ID_HEADER_NAME)
        .map(|v| String::from_utf8_lossy(v.as_bytes()))
}

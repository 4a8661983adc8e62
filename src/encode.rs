//! Query text and its URL encoding.
//!
//! The user's query travels through an invocation as a [`Query`], published
//! to hooks under the reserved name [`QUERY`]. Encoding percent-escapes
//! every byte outside the RFC 3986 unreserved set, so the result is safe in
//! any URL query component and a standard percent-decoder restores the
//! input exactly.

use std::borrow::Cow;
use std::fmt;

/// Name under which the query is visible to hooks and diagnostics.
pub const QUERY: &str = "QUERY";

/// Percent-encode `s` for embedding in a URL query component.
#[must_use]
pub fn encode(s: &str) -> Cow<'_, str> {
    urlencoding::encode(s)
}

/// Inverse of [`encode`]. Returns `None` if the decoded bytes are not UTF-8.
#[must_use]
pub fn decode(s: &str) -> Option<Cow<'_, str>> {
    urlencoding::decode(s).ok()
}

/// The free-text lookup input of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    text: String,
}

impl Query {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Join positional tokens with single spaces.
    #[must_use]
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Self {
        let text = words
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
        Self { text }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// The query, percent-encoded.
    #[must_use]
    pub fn encoded(&self) -> Cow<'_, str> {
        encode(&self.text)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

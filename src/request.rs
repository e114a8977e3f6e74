//! Form request encoding
//!
//! A [`FormRequest`] collects key-value pairs in insertion order and renders
//! them as an `application/x-www-form-urlencoded` body.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::constants::{FORM_FIELD_SEPARATOR, FORM_KEY_VALUE_SEPARATOR};

/// Characters left untouched when encoding a URI component
///
/// Everything outside ASCII alphanumerics and these marks is percent-encoded,
/// including space, which becomes `%20` rather than `+`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// An immutable key-value pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValuePair {
    key:   String,
    value: String,
}

impl KeyValuePair {
    /// Create a new pair
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key:   key.into(),
            value: value.into(),
        }
    }

    /// The key stored in this pair
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The value stored in this pair
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    fn encode_into(&self, out: &mut String) {
        out.extend(utf8_percent_encode(&self.key, URI_COMPONENT));
        out.push(FORM_KEY_VALUE_SEPARATOR);
        out.extend(utf8_percent_encode(&self.value, URI_COMPONENT));
    }
}

/// Ordered set of form fields for a single request
///
/// Duplicate keys are kept as separate pairs and appear in the body in the
/// order they were appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormRequest {
    pairs: Vec<KeyValuePair>,
}

impl FormRequest {
    /// Create an empty request
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a key-value pair
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push(KeyValuePair::new(key, value));
    }

    /// Number of pairs appended so far
    #[must_use]
    pub const fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether no pair has been appended
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over the pairs in insertion order
    pub fn pairs(&self) -> impl Iterator<Item = &KeyValuePair> {
        self.pairs.iter()
    }

    /// Render the URL encoded body for this request
    ///
    /// Returns the empty string when no pairs were appended.
    #[must_use]
    pub fn data(&self) -> String {
        let mut body = String::new();

        for (i, pair) in self.pairs.iter().enumerate() {
            if i > 0 {
                body.push(FORM_FIELD_SEPARATOR);
            }
            pair.encode_into(&mut body);
        }

        body
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormRequest {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut request = Self::new();
        request.extend(iter);
        request
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for FormRequest {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.append(key, value);
        }
    }
}

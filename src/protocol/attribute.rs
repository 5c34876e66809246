//! Attribute words
//!
//! Splits `=key=value` data words into a key and an optional value.

/// A decoded attribute word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name
    pub key: String,

    /// Attribute value; `None` for a bare `=key` word
    pub value: Option<String>,
}

impl Attribute {
    /// Value as stored in a reply (missing value is the empty string)
    pub fn value_or_empty(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    pub fn into_parts(self) -> (String, String) {
        (self.key, self.value.unwrap_or_default())
    }
}

/// Parse an attribute word
///
/// Returns `None` for words without `=`. Everything up to the first `=`
/// is the word prefix and is discarded; the remainder splits at its next
/// `=` into key and value.
pub fn parse_attribute(word: &str) -> Option<Attribute> {
    let (_prefix, rest) = word.split_once('=')?;

    let attribute = match rest.split_once('=') {
        Some((key, value)) => Attribute {
            key: key.to_string(),
            value: Some(value.to_string()),
        },
        None => Attribute {
            key: rest.to_string(),
            value: None,
        },
    };

    Some(attribute)
}

//! Source text length contract.

use chalkboard_error::{ContentError, ContentErrorKind};
use serde::{Deserialize, Serialize};

/// Inclusive character-count bounds for source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBounds {
    /// Minimum characters
    pub min_chars: usize,
    /// Maximum characters
    pub max_chars: usize,
}

impl Default for ContentBounds {
    fn default() -> Self {
        Self {
            min_chars: 100,
            max_chars: 50_000,
        }
    }
}

/// Trimmed source text known to satisfy [`ContentBounds`].
///
/// # Examples
///
/// ```
/// use chalkboard_core::{ContentBounds, SourceText};
///
/// let bounds = ContentBounds { min_chars: 5, max_chars: 20 };
/// let text = SourceText::new("  hello world  ", bounds).unwrap();
/// assert_eq!(text.as_str(), "hello world");
///
/// let err = SourceText::new("hi", bounds).unwrap_err();
/// assert_eq!(err.code(), "CONTENT_TOO_SHORT");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText(String);

impl SourceText {
    /// Trim and check length in characters.
    #[track_caller]
    pub fn new(text: impl AsRef<str>, bounds: ContentBounds) -> Result<Self, ContentError> {
        let trimmed = text.as_ref().trim();
        let length = trimmed.chars().count();
        if length < bounds.min_chars {
            return Err(ContentError::new(ContentErrorKind::TooShort {
                length,
                min: bounds.min_chars,
            }));
        }
        if length > bounds.max_chars {
            return Err(ContentError::new(ContentErrorKind::TooLong {
                length,
                max: bounds.max_chars,
            }));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    /// Take the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for SourceText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_characters_not_bytes() {
        let bounds = ContentBounds {
            min_chars: 3,
            max_chars: 3,
        };
        assert!(SourceText::new("äöü", bounds).is_ok());
    }

    #[test]
    fn too_long_carries_length() {
        let bounds = ContentBounds {
            min_chars: 1,
            max_chars: 4,
        };
        let err = SourceText::new("abcdef", bounds).unwrap_err();
        assert_eq!(err.kind, ContentErrorKind::TooLong { length: 6, max: 4 });
        assert_eq!(err.code(), "CONTENT_TOO_LONG");
    }
}

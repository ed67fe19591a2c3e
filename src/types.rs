use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Caller-assigned identifier of an indexed document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for DocumentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Location of one word occurrence inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WordPosition {
    /// Ordinal of the word among the document's kept tokens
    pub word_index: usize,
    /// Codepoint offset of the word's first character
    pub codepoint_index: usize,
}

impl WordPosition {
    pub const fn new(word_index: usize, codepoint_index: usize) -> Self {
        Self {
            word_index,
            codepoint_index,
        }
    }
}

/// One matching occurrence returned by instance queries: the resident word and where it occurs.
pub type WordInstance = (String, WordPosition);

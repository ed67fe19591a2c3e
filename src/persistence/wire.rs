//! Binary message for the words of one document.
//!
//! Encoded with postcard: the entry list and every string or position list carry a
//! varint length prefix, `WordRef` is a varint discriminant (`0` = text, `1` = index)
//! followed by its payload, and positions are pairs of varints.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::types::WordPosition;

/// A word either spelled out or referenced through the shard dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WordRef {
    Text(String),
    Index(u32),
}

impl WordRef {
    /// Returns the word text, looking dictionary references up in `dictionary`.
    pub fn resolve<'a>(&'a self, dictionary: &'a [String]) -> Result<&'a str, CodecError> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Index(index) => dictionary
                .get(*index as usize)
                .map(String::as_str)
                .ok_or(CodecError::UnknownWord {
                    index: *index,
                    dictionary_len: dictionary.len(),
                }),
        }
    }
}

/// One word of a document with every position it occurs at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: WordRef,
    pub positions: Vec<WordPosition>,
}

/// All words of one document held by a shard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub entries: Vec<WordEntry>,
}

impl DocumentEntry {
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        postcard::to_stdvec(self).map_err(|e| CodecError::encode("document entry", e))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        postcard::from_bytes(bytes).map_err(|e| CodecError::decode("document entry", e))
    }
}

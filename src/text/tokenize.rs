//! Word tokenization with positional metadata.
//!
//! Text is split on UAX#29 word boundaries. A segment is kept when it is word-like
//! (contains at least one alphanumeric character) or when the whole segment is an
//! emoji sequence; whitespace and punctuation segments are dropped. Kept tokens carry
//! their ordinal among kept tokens and the codepoint offset of their first character.

use unicode_segmentation::{UWordBoundIndices, UnicodeSegmentation};

use super::codepoint::CodepointIndexer;
use super::emoji::is_emoji_sequence;

/// A word extracted from document content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token<'a> {
    pub text: &'a str,
    /// Ordinal of this token among the kept tokens of the content (0-based)
    pub word_index: usize,
    /// Offset of the token's first codepoint within the content
    pub codepoint_index: usize,
}

impl<'a> Token<'a> {
    pub const fn new(text: &'a str, word_index: usize, codepoint_index: usize) -> Self {
        Self {
            text,
            word_index,
            codepoint_index,
        }
    }
}

/// Tokenizes `content` lazily in a single forward pass.
///
/// # Example
///
/// ```
/// use prefix_shard_index::text::{Token, tokenize};
///
/// let tokens: Vec<_> = tokenize("hello 💙 world").collect();
/// assert_eq!(
///     tokens,
///     vec![
///         Token::new("hello", 0, 0),
///         Token::new("💙", 1, 6),
///         Token::new("world", 2, 8),
///     ]
/// );
/// ```
pub fn tokenize(content: &str) -> Tokens<'_> {
    Tokens {
        content,
        segments: content.split_word_bound_indices(),
        indexer: CodepointIndexer::new(),
        utf16_offset: 0,
        word_index: 0,
    }
}

/// Iterator over the kept tokens of a string. See [`tokenize`].
#[derive(Debug)]
pub struct Tokens<'a> {
    content: &'a str,
    segments: UWordBoundIndices<'a>,
    indexer: CodepointIndexer<'a>,
    /// UTF-16 offset of the next segment's first code unit
    utf16_offset: usize,
    word_index: usize,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for (_, segment) in self.segments.by_ref() {
            let segment_start = self.utf16_offset;
            self.utf16_offset += segment.encode_utf16().count();

            if !is_word_like(segment) && !is_emoji_sequence(segment, false) {
                continue;
            }

            // Non-empty segments always start inside the content.
            let codepoint_index = self
                .indexer
                .codepoint_index_for(self.content, segment_start)
                .ok()?;
            let token = Token::new(segment, self.word_index, codepoint_index);
            self.word_index += 1;
            return Some(token);
        }

        None
    }
}

impl std::iter::FusedIterator for Tokens<'_> {}

fn is_word_like(segment: &str) -> bool {
    segment.chars().any(char::is_alphanumeric)
}

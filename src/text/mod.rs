//! Text processing: word segmentation, emoji classification and offset mapping.
//!
//! The tokenizer is the only entry point most callers need; the codepoint indexer
//! and emoji classifier are exposed for hosts that do their own segmentation.

pub mod codepoint;
pub mod emoji;
pub mod tokenize;

pub use codepoint::CodepointIndexer;
pub use emoji::is_emoji_sequence;
pub use tokenize::{Token, Tokens, tokenize};

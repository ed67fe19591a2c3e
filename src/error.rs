//! Error handling types and utilities.

/// Error returned when a UTF-16 offset cannot be mapped to a codepoint offset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodepointError {
    /// The offset lies outside `[0, len)` of the string's UTF-16 representation.
    #[error("utf-16 offset {offset} is outside the string bounds (utf-16 length {len})")]
    OutOfRange { offset: usize, len: usize },
}

/// Error returned by the shard router.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// Routing was attempted before any shard was added.
    #[error("index has no shards; add at least one shard before routing words")]
    NoShards,
    /// A shard position passed by the caller does not exist.
    #[error("shard position {position} is out of range ({count} shards)")]
    NoSuchShard { position: usize, count: usize },
}

/// Error raised while encoding or decoding persisted shard data.
///
/// Corrupt input is never retried or repaired; the error is surfaced to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("compression failed: {0}")]
    Compress(String),
    #[error("decompression failed: {0}")]
    Decompress(String),
    #[error("encryption failed: {0}")]
    Encrypt(String),
    #[error("decryption failed: {0}")]
    Decrypt(String),
    #[error("failed to encode {what}: {reason}")]
    Encode { what: &'static str, reason: String },
    #[error("failed to decode {what}: {reason}")]
    Decode { what: &'static str, reason: String },
    /// A word entry referenced a dictionary slot that does not exist.
    #[error("word dictionary index {index} out of range (dictionary has {dictionary_len} words)")]
    UnknownWord { index: u32, dictionary_len: usize },
    /// A blocking codec task panicked or was cancelled.
    #[error("codec task failed: {0}")]
    Task(String),
}

impl CodecError {
    pub(crate) fn encode(what: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Encode {
            what,
            reason: err.to_string(),
        }
    }

    pub(crate) fn decode(what: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            what,
            reason: err.to_string(),
        }
    }
}

/// Error returned for invalid index configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(String),
    #[error("max_shard_postings must be greater than zero")]
    ZeroCapacity,
    #[error("compression_level {0} is outside the supported range 1..=22")]
    CompressionLevel(i32),
}

//! Sharded prefix-search word index.
//!
//! Documents are tokenized into words with positional metadata, stored in per-shard
//! prefix tries, routed across shards ordered by word range, and persisted one shard at
//! a time in a compact compressed form.

pub mod config;
pub mod error;
pub mod index;
pub mod persistence;
pub mod shard;
pub mod text;
pub mod tracing;
pub mod types;

pub use config::IndexConfig;
pub use error::{CodecError, CodepointError, ConfigError, IndexError};
pub use index::PrefixIndex;
pub use persistence::{PersistenceOptions, SerializedShard, deserialize, serialize};
pub use shard::Shard;
pub use text::{Token, tokenize};
pub use types::{DocumentId, WordInstance, WordPosition};

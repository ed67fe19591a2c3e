//! Shard persistence.
//!
//! A shard is stored as a [`SerializedShard`]: a word dictionary, the shard bounds, and
//! one opaque blob per document. Each blob is the document's [`DocumentEntry`] encoded
//! with postcard, compressed, and optionally encrypted.
//!
//! The dictionary is built sequentially from a full scan of the trie in ascending word
//! order; words held by more than one document get a dictionary slot and every other
//! word is written inline. Per-document blobs are then built (or opened) on blocking
//! threads in parallel. The first failing document fails the whole batch.

pub mod codec;
pub mod wire;

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

use crate::config::IndexConfig;
use crate::error::CodecError;
use crate::shard::Shard;
use crate::text::Token;
use crate::types::DocumentId;
use codec::{Cipher, Compressor, ZstdCompressor};
use wire::{DocumentEntry, WordEntry, WordRef};

/// Persisted form of one shard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedShard {
    /// Dictionary of shared words in first-seen order
    pub words: Vec<String>,
    pub first_word: Option<String>,
    pub last_word: Option<String>,
    /// Compressed (and possibly encrypted) word entries per document
    pub documents: BTreeMap<DocumentId, Vec<u8>>,
}

impl SerializedShard {
    /// Encodes the whole envelope as a single byte string.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        postcard::to_stdvec(self).map_err(|e| CodecError::encode("serialized shard", e))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        postcard::from_bytes(bytes).map_err(|e| CodecError::decode("serialized shard", e))
    }
}

/// Compressor and optional cipher applied to every document blob.
#[derive(Clone)]
pub struct PersistenceOptions {
    compressor: Arc<dyn Compressor>,
    cipher: Option<Arc<dyn Cipher>>,
}

impl Default for PersistenceOptions {
    fn default() -> Self {
        Self::new(Arc::new(ZstdCompressor::default()))
    }
}

impl fmt::Debug for PersistenceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistenceOptions")
            .field("encrypted", &self.cipher.is_some())
            .finish_non_exhaustive()
    }
}

impl PersistenceOptions {
    pub fn new(compressor: Arc<dyn Compressor>) -> Self {
        Self {
            compressor,
            cipher: None,
        }
    }

    /// zstd at the configured level, without encryption.
    pub fn from_config(config: &IndexConfig) -> Self {
        Self::new(Arc::new(ZstdCompressor::new(config.compression_level)))
    }

    #[must_use]
    pub fn with_cipher(mut self, cipher: Arc<dyn Cipher>) -> Self {
        self.cipher = Some(cipher);
        self
    }

    pub const fn is_encrypted(&self) -> bool {
        self.cipher.is_some()
    }

    fn seal(&self, encoded: &[u8]) -> Result<Vec<u8>, CodecError> {
        let compressed = self.compressor.compress(encoded)?;
        match &self.cipher {
            Some(cipher) => cipher.encrypt(&compressed),
            None => Ok(compressed),
        }
    }

    fn open(&self, blob: &[u8]) -> Result<Vec<u8>, CodecError> {
        match &self.cipher {
            Some(cipher) => self.compressor.decompress(&cipher.decrypt(blob)?),
            None => self.compressor.decompress(blob),
        }
    }
}

/// Serializes `shard` into its persisted form.
pub async fn serialize(shard: &Shard, options: &PersistenceOptions) -> Result<SerializedShard, CodecError> {
    let started = Instant::now();

    let mut words = Vec::new();
    let mut documents: BTreeMap<DocumentId, Vec<WordEntry>> = BTreeMap::new();
    for (word, postings) in shard.word_entries() {
        let word = if postings.len() > 1 {
            let index = u32::try_from(words.len()).map_err(|e| CodecError::encode("word dictionary", e))?;
            words.push(word);
            WordRef::Index(index)
        } else {
            WordRef::Text(word)
        };

        for (document, positions) in postings {
            documents.entry(document.clone()).or_default().push(WordEntry {
                word: word.clone(),
                positions: positions.clone(),
            });
        }
    }

    let tasks = documents.into_iter().map(|(document, entries)| {
        let options = options.clone();
        tokio::task::spawn_blocking(move || {
            let encoded = DocumentEntry { entries }.encode()?;
            let blob = options.seal(&encoded)?;
            tracing::debug!(
                "Encoded document '{}': {} bytes, {} stored",
                document,
                encoded.len(),
                blob.len()
            );
            Ok::<_, CodecError>((document, blob))
        })
    });
    let documents: BTreeMap<_, _> = try_join_all(tasks.map(join_task)).await?.into_iter().collect();

    tracing::info!(
        "Serialized shard with {} words ({} in dictionary) and {} documents in {:?}",
        shard.word_count(),
        words.len(),
        documents.len(),
        started.elapsed()
    );

    Ok(SerializedShard {
        words,
        first_word: shard.first_word().map(str::to_string),
        last_word: shard.last_word().map(str::to_string),
        documents,
    })
}

/// Rebuilds a shard from its persisted form.
///
/// Words are re-inserted document by document in ascending id order; the bounds are
/// then restored exactly as stored.
pub async fn deserialize(serialized: SerializedShard, options: &PersistenceOptions) -> Result<Shard, CodecError> {
    let started = Instant::now();
    let SerializedShard {
        words,
        first_word,
        last_word,
        documents,
    } = serialized;

    let tasks = documents.into_iter().map(|(document, blob)| {
        let options = options.clone();
        tokio::task::spawn_blocking(move || {
            let encoded = options.open(&blob)?;
            let entry = DocumentEntry::decode(&encoded)?;
            Ok::<_, CodecError>((document, entry))
        })
    });
    let decoded = try_join_all(tasks.map(join_task)).await?;

    let mut shard = Shard::new();
    for (document, entry) in &decoded {
        for WordEntry { word, positions } in &entry.entries {
            let text = word.resolve(&words)?;
            for position in positions {
                shard.add_word(
                    document,
                    &Token::new(text, position.word_index, position.codepoint_index),
                );
            }
        }
    }
    shard.set_bounds(first_word, last_word);

    tracing::info!(
        "Deserialized shard with {} words and {} documents in {:?}",
        shard.word_count(),
        decoded.len(),
        started.elapsed()
    );
    Ok(shard)
}

async fn join_task<T>(handle: JoinHandle<Result<T, CodecError>>) -> Result<T, CodecError> {
    handle.await.map_err(|e| CodecError::Task(e.to_string()))?
}

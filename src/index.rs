//! Multi-shard router.
//!
//! Shards are kept in ascending order of their `last_word`, with an unbounded
//! (null) `last_word` sorting after every bounded one. A word belongs to the first
//! shard whose `last_word` is null or not smaller than the word, falling back to the
//! last shard. Routing a word into a shard widens that shard's bounds, which is how
//! coverage grows without an explicit re-partition step.

use ahash::AHashSet;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::config::IndexConfig;
use crate::error::IndexError;
use crate::shard::Shard;
use crate::text::tokenize;
use crate::types::{DocumentId, WordInstance};

/// Ordered collection of shards covering the whole word space.
#[derive(Debug, Default)]
pub struct PrefixIndex {
    shards: Vec<Shard>,
    config: IndexConfig,
}

impl PrefixIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: IndexConfig) -> Self {
        Self {
            shards: Vec::new(),
            config,
        }
    }

    pub const fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Inserts `shard` keeping ascending `last_word` order; ties go after existing shards.
    pub fn add_shard(&mut self, shard: Shard) {
        let position = self
            .shards
            .partition_point(|existing| cmp_upper(existing.last_word(), shard.last_word()) != Ordering::Greater);
        self.shards.insert(position, shard);
    }

    pub fn shards(&self) -> &[Shard] {
        &self.shards
    }

    pub fn shard(&self, position: usize) -> Option<&Shard> {
        self.shards.get(position)
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    pub fn into_shards(self) -> Vec<Shard> {
        self.shards
    }

    /// The shard responsible for `word`.
    pub fn get_shard(&self, word: &str) -> Result<&Shard, IndexError> {
        let position = self.route(word)?;
        Ok(&self.shards[position])
    }

    /// Replaces the indexed content of `document` across the whole index.
    ///
    /// The document is first removed from every shard, then each token is routed to its
    /// owning shard independently. Every shard that lost or gained postings for the
    /// document records it as updated. Shards pushed over the configured capacity are
    /// split afterwards.
    pub fn update_document(&mut self, document: &DocumentId, content: &str) -> Result<(), IndexError> {
        if self.shards.is_empty() {
            return Err(IndexError::NoShards);
        }

        let mut touched = BTreeSet::new();
        for (position, shard) in self.shards.iter_mut().enumerate() {
            if shard.remove_document(document) {
                touched.insert(position);
            }
        }

        for token in tokenize(content) {
            let position = self.route(token.text)?;
            self.shards[position].add_word(document, &token);
            touched.insert(position);
        }

        for &position in &touched {
            self.shards[position].mark_updated(document);
        }
        tracing::debug!("Updated document '{}' across {} shard(s)", document, touched.len());

        if let Some(capacity) = self.config.max_shard_postings {
            // Highest position first so inserted shards do not shift pending positions.
            for &position in touched.iter().rev() {
                self.split_while_over(position, capacity);
            }
        }

        Ok(())
    }

    /// Removes `document` from every shard. Returns `true` if any shard held it.
    pub fn remove_document(&mut self, document: &DocumentId) -> bool {
        let mut removed = false;
        for shard in &mut self.shards {
            if shard.remove_document(document) {
                shard.mark_updated(document);
                removed = true;
            }
        }
        removed
    }

    /// Union of the matching documents of every shard.
    pub fn matching_documents(&self, prefix: &str) -> AHashSet<DocumentId> {
        self.shards
            .iter()
            .flat_map(|shard| shard.matching_documents(prefix))
            .collect()
    }

    /// Concatenation of the matching instances of every shard, in shard order.
    pub fn matching_instances(&self, prefix: &str, document: &DocumentId) -> Vec<WordInstance> {
        self.shards
            .iter()
            .flat_map(|shard| shard.matching_instances(prefix, document))
            .collect()
    }

    /// Splits the shard at `position` and inserts the upper half right after it.
    ///
    /// Returns `false` (leaving the shard as it was) when the split would move all or
    /// none of the shard's postings.
    pub fn split_shard(&mut self, position: usize) -> Result<bool, IndexError> {
        let count = self.shards.len();
        let shard = self
            .shards
            .get_mut(position)
            .ok_or(IndexError::NoSuchShard { position, count })?;

        let bounds = (
            shard.first_word().map(str::to_string),
            shard.last_word().map(str::to_string),
        );
        let upper = shard.split();
        if shard.is_empty() || upper.is_empty() {
            shard.absorb(upper);
            shard.set_bounds(bounds.0, bounds.1);
            return Ok(false);
        }

        tracing::info!(
            "Split shard {} into [{:?}..={:?}] and [{:?}..={:?}]",
            position,
            shard.first_word(),
            shard.last_word(),
            upper.first_word(),
            upper.last_word()
        );
        self.shards.insert(position + 1, upper);
        Ok(true)
    }

    /// Splits the shard at `position` until it and every shard split off it fit `capacity`.
    fn split_while_over(&mut self, position: usize, capacity: usize) {
        let postings = self.shards[position].posting_count();
        if postings <= capacity {
            return;
        }

        if let Ok(true) = self.split_shard(position) {
            // Upper half first so the lower position stays valid.
            self.split_while_over(position + 1, capacity);
            self.split_while_over(position, capacity);
        } else {
            tracing::warn!(
                "Shard {} holds {} positions (capacity {}) but cannot be split further",
                position,
                postings,
                capacity
            );
        }
    }

    fn route(&self, word: &str) -> Result<usize, IndexError> {
        if self.shards.is_empty() {
            return Err(IndexError::NoShards);
        }

        let position = self
            .shards
            .iter()
            .position(|shard| shard.last_word().is_none_or(|last| last >= word))
            .unwrap_or(self.shards.len() - 1);
        Ok(position)
    }
}

/// Orders upper bounds with `None` as positive infinity.
fn cmp_upper(left: Option<&str>, right: Option<&str>) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(left), Some(right)) => left.cmp(right),
    }
}

//! Shared fixtures and helpers for integration tests.
//!
//! # Available Fixtures
//!
//! - `corpus`: a handful of short documents mixing ASCII words, accents and emoji
//! - `seeded_index`: a [`PrefixIndex`] over two bounded shards and one open shard
//! - `loaded_index`: `seeded_index` with the whole `corpus` indexed
//!
//! [`TempWorkspace`] gives tests a throwaway directory for files such as configs.

use prefix_shard_index::{DocumentId, PrefixIndex, Shard, WordInstance};
use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory that is removed when dropped.
#[allow(dead_code)] // Used by a subset of the integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Used by a subset of the integration test crates
impl TempWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Writes `content` to `path` inside the workspace and returns the full path.
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn create_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root.join(path);
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
        full_path
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
pub fn doc(id: &str) -> DocumentId {
    DocumentId::from(id)
}

/// Sorted instances, for comparisons that ignore cross-word order.
#[allow(dead_code)]
pub fn sorted(mut instances: Vec<WordInstance>) -> Vec<WordInstance> {
    instances.sort();
    instances
}

#[fixture]
#[allow(dead_code)]
pub fn corpus() -> Vec<(DocumentId, &'static str)> {
    vec![
        (doc("greeting"), "hello 💙 world"),
        (doc("planets"), "Mercury, Venus, Earth and Mars. Hello again!"),
        (doc("french"), "héllo à tous, ça va?"),
        (doc("reaction"), "great job 👍🏽 see you at 10:30"),
        (doc("family"), "say hi to the 👨‍👩‍👧 family"),
    ]
}

#[fixture]
#[allow(dead_code)]
pub fn seeded_index() -> PrefixIndex {
    prefix_shard_index::tracing::init();

    let mut index = PrefixIndex::new();
    index.add_shard(Shard::with_bounds(Some("a".into()), Some("h".into())));
    index.add_shard(Shard::with_bounds(Some("i".into()), Some("s".into())));
    index.add_shard(Shard::new());
    index
}

#[fixture]
#[allow(dead_code)]
pub fn loaded_index(seeded_index: PrefixIndex, corpus: Vec<(DocumentId, &'static str)>) -> PrefixIndex {
    let mut index = seeded_index;
    for (id, content) in &corpus {
        index
            .update_document(id, content)
            .expect("seeded index has shards");
    }
    index
}

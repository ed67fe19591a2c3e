//! A single shard of the word index: a prefix trie over one contiguous word range.
//!
//! A shard tracks the inclusive bounds of the words it is responsible for
//! (`first_word`/`last_word`). Bounds only widen as words are added and are only
//! recomputed by [`Shard::split`]. Word ordering is plain codepoint order, the same
//! order the trie walks in, so bounds never depend on the host locale.

mod trie;

use ahash::AHashSet;

use crate::text::{Token, tokenize};
use crate::types::{DocumentId, WordInstance, WordPosition};
use trie::WordTrie;

pub use trie::Postings;

/// Prefix trie from word text to per-document positions, with bounds tracking.
#[derive(Debug, Default)]
pub struct Shard {
    trie: WordTrie,
    first_word: Option<String>,
    last_word: Option<String>,
    /// Documents touched since the last flush
    updated_documents: AHashSet<DocumentId>,
}

impl Shard {
    /// Creates an empty shard with unbounded (null) range.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty shard that already claims the range `first..=last`.
    pub fn with_bounds(first_word: Option<String>, last_word: Option<String>) -> Self {
        Self {
            first_word,
            last_word,
            ..Self::default()
        }
    }

    pub fn first_word(&self) -> Option<&str> {
        self.first_word.as_deref()
    }

    pub fn last_word(&self) -> Option<&str> {
        self.last_word.as_deref()
    }

    /// Records one occurrence of `token` in `document`, widening the bounds if needed.
    pub fn add_word(&mut self, document: &DocumentId, token: &Token<'_>) {
        let text = token.text;
        self.trie.push(
            text,
            document,
            WordPosition::new(token.word_index, token.codepoint_index),
        );

        if self.first_word.as_deref().is_none_or(|first| text < first) {
            self.first_word = Some(text.to_string());
        }
        if self.last_word.as_deref().is_none_or(|last| text > last) {
            self.last_word = Some(text.to_string());
        }
    }

    /// Deletes every posting of `document`. Bounds are left untouched.
    ///
    /// Returns `true` if the shard held any posting for the document.
    pub fn remove_document(&mut self, document: &DocumentId) -> bool {
        let removed = self.trie.remove_document(document);
        if removed > 0 {
            tracing::debug!("Removed {} positions of document '{}'", removed, document);
        }
        removed > 0
    }

    /// Replaces the indexed content of `document` with `content`.
    pub fn update_document(&mut self, document: &DocumentId, content: &str) {
        self.remove_document(document);
        self.mark_updated(document);

        for token in tokenize(content) {
            self.add_word(document, &token);
        }
    }

    /// Documents that have at least one resident word starting with `prefix`.
    ///
    /// Matching is case-sensitive and exact on codepoints; the empty prefix matches
    /// every resident word.
    pub fn matching_documents(&self, prefix: &str) -> AHashSet<DocumentId> {
        self.trie
            .find_prefix(prefix)
            .into_iter()
            .flat_map(|(_, postings)| postings.keys())
            .cloned()
            .collect()
    }

    /// Every occurrence in `document` of a resident word starting with `prefix`.
    ///
    /// Occurrences of the same word keep their insertion order.
    pub fn matching_instances(&self, prefix: &str, document: &DocumentId) -> Vec<WordInstance> {
        let mut instances = Vec::new();
        for (word, postings) in self.trie.find_prefix(prefix) {
            if let Some(positions) = postings.get(document) {
                instances.extend(positions.iter().map(|position| (word.clone(), *position)));
            }
        }
        instances
    }

    /// Moves the upper half of this shard's postings into a new shard.
    ///
    /// Resident words are taken in ascending order and the split point is the first
    /// word at which the running occurrence count reaches half of the total; that word
    /// and every word after it move to the returned shard. Both shards get bounds
    /// recomputed from the words they now hold (null when empty). No posting is
    /// created, merged or dropped.
    pub fn split(&mut self) -> Self {
        let words: Vec<(String, usize)> = self
            .trie
            .entries()
            .into_iter()
            .map(|(word, postings)| (word, trie::occurrences(postings)))
            .collect();
        let total: usize = words.iter().map(|(_, count)| count).sum();

        let mut running = 0;
        let split_at = words
            .iter()
            .position(|(_, count)| {
                running += count;
                running * 2 >= total
            })
            .unwrap_or(words.len());

        let mut other = Self::new();
        for (word, _) in &words[split_at..] {
            if let Some(postings) = self.trie.remove(word) {
                for document in postings.keys() {
                    self.updated_documents.insert(document.clone());
                    other.updated_documents.insert(document.clone());
                }
                other.trie.merge(word, postings);
            }
        }

        let (lower, upper) = words.split_at(split_at);
        self.first_word = lower.first().map(|(word, _)| word.clone());
        self.last_word = lower.last().map(|(word, _)| word.clone());
        other.first_word = upper.first().map(|(word, _)| word.clone());
        other.last_word = upper.last().map(|(word, _)| word.clone());

        tracing::debug!(
            "Split shard at word {} of {}: {} positions kept, {} moved",
            split_at,
            words.len(),
            self.posting_count(),
            other.posting_count()
        );

        other
    }

    /// Total number of stored word occurrences.
    pub const fn posting_count(&self) -> usize {
        self.trie.occurrence_count()
    }

    /// Number of distinct resident words.
    pub const fn word_count(&self) -> usize {
        self.trie.word_count()
    }

    /// Number of distinct documents with at least one resident word.
    pub fn document_count(&self) -> usize {
        self.matching_documents("").len()
    }

    pub const fn is_empty(&self) -> bool {
        self.trie.word_count() == 0
    }

    /// Every resident word with its postings, in ascending word order.
    pub fn word_entries(&self) -> Vec<(String, &Postings)> {
        self.trie.entries()
    }

    /// Documents updated since the last call to [`Shard::clear_updated_documents`].
    pub fn updated_documents(&self) -> impl Iterator<Item = &DocumentId> {
        self.updated_documents.iter()
    }

    pub fn clear_updated_documents(&mut self) {
        self.updated_documents.clear();
    }

    pub(crate) fn mark_updated(&mut self, document: &DocumentId) {
        if !self.updated_documents.contains(document) {
            self.updated_documents.insert(document.clone());
        }
    }

    /// Moves all postings of `other` back into this shard.
    pub(crate) fn absorb(&mut self, other: Self) {
        self.updated_documents.extend(other.updated_documents);
        for (word, postings) in other.trie.into_entries() {
            self.trie.merge(&word, postings);
        }
    }

    /// Overwrites both bounds.
    pub(crate) fn set_bounds(&mut self, first_word: Option<String>, last_word: Option<String>) {
        self.first_word = first_word;
        self.last_word = last_word;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    fn doc(id: &str) -> DocumentId {
        DocumentId::from(id)
    }

    fn docs(ids: &[&str]) -> AHashSet<DocumentId> {
        ids.iter().map(|id| doc(id)).collect()
    }

    fn sample_shard() -> Shard {
        let mut shard = Shard::new();
        shard.update_document(&doc("a"), "hello world");
        shard.update_document(&doc("b"), "hello mars");
        shard.update_document(&doc("c"), "salve helios");
        shard
    }

    #[rstest]
    #[case("he", &["a", "b", "c"])]
    #[case("hello", &["a", "b"])]
    #[case("m", &["b"])]
    #[case("help", &[])]
    #[case("He", &[])]
    #[case("", &["a", "b", "c"])]
    fn test_matching_documents(#[case] prefix: &str, #[case] expected: &[&str]) {
        check!(sample_shard().matching_documents(prefix) == docs(expected));
    }

    #[test]
    fn test_matching_instances() {
        let mut shard = Shard::new();
        shard.update_document(&doc("a"), "hello world hello helios");
        shard.update_document(&doc("b"), "mars");

        let mut instances = shard.matching_instances("he", &doc("a"));
        instances.sort();
        check!(
            instances
                == vec![
                    ("helios".to_string(), WordPosition::new(3, 18)),
                    ("hello".to_string(), WordPosition::new(0, 0)),
                    ("hello".to_string(), WordPosition::new(2, 12)),
                ]
        );
        check!(shard.matching_instances("he", &doc("b")).is_empty());
    }

    #[test]
    fn test_bounds_start_null_and_widen() {
        let mut shard = Shard::new();
        check!(shard.first_word().is_none());
        check!(shard.last_word().is_none());

        shard.update_document(&doc("a"), "mars");
        check!(shard.first_word() == Some("mars"));
        check!(shard.last_word() == Some("mars"));

        shard.update_document(&doc("b"), "earth");
        check!(shard.first_word() == Some("earth"));
        check!(shard.last_word() == Some("mars"));

        shard.update_document(&doc("c"), "venus");
        check!(shard.first_word() == Some("earth"));
        check!(shard.last_word() == Some("venus"));
    }

    #[test]
    fn test_remove_document_keeps_bounds() {
        let mut shard = sample_shard();
        check!(shard.remove_document(&doc("c")));
        check!(!shard.remove_document(&doc("c")));
        check!(shard.matching_documents("he") == docs(&["a", "b"]));
        check!(shard.matching_documents("salve").is_empty());
        check!(shard.last_word() == Some("world"));
        check!(shard.first_word() == Some("helios"));
    }

    #[test]
    fn test_update_replaces_content() {
        let mut shard = Shard::new();
        shard.update_document(&doc("a"), "alpha beta");
        shard.update_document(&doc("a"), "gamma");

        check!(shard.matching_documents("alpha").is_empty());
        check!(
            shard.matching_instances("gamma", &doc("a"))
                == vec![("gamma".to_string(), WordPosition::new(0, 0))]
        );
        check!(shard.posting_count() == 1);
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut once = Shard::new();
        once.update_document(&doc("a"), "to be or not to be");
        let mut twice = Shard::new();
        twice.update_document(&doc("a"), "to be or not to be");
        twice.update_document(&doc("a"), "to be or not to be");

        check!(once.posting_count() == twice.posting_count());
        check!(once.matching_instances("", &doc("a")) == twice.matching_instances("", &doc("a")));
    }

    #[test]
    fn test_updated_documents_tracking() {
        let mut shard = sample_shard();
        let mut updated: Vec<_> = shard.updated_documents().cloned().collect();
        updated.sort();
        check!(updated == vec![doc("a"), doc("b"), doc("c")]);

        shard.clear_updated_documents();
        check!(shard.updated_documents().next().is_none());

        // Direct word insertion is not a document update.
        shard.add_word(&doc("d"), &Token::new("zeta", 0, 0));
        check!(shard.updated_documents().next().is_none());
    }

    #[test]
    fn test_split_by_occurrence_count() {
        let mut shard = Shard::new();
        // Occurrences: apple 1, banana 1, cherry 4, date 2 -> total 8, half at cherry.
        shard.update_document(&doc("a"), "apple cherry cherry date");
        shard.update_document(&doc("b"), "banana cherry cherry date");

        let other = shard.split();
        check!(shard.first_word() == Some("apple"));
        check!(shard.last_word() == Some("banana"));
        check!(other.first_word() == Some("cherry"));
        check!(other.last_word() == Some("date"));
        check!(shard.posting_count() == 2);
        check!(other.posting_count() == 6);
        check!(shard.matching_documents("cherry").is_empty());
        check!(other.matching_documents("cherry") == docs(&["a", "b"]));
    }

    #[test]
    fn test_split_conserves_postings() {
        let mut shard = Shard::new();
        shard.update_document(&doc("a"), "the quick brown fox jumps over the lazy dog");
        shard.update_document(&doc("b"), "pack my box with five dozen liquor jugs");
        shard.update_document(&doc("c"), "the five boxing wizards jump quickly");

        let mut before: Vec<_> = ["a", "b", "c"]
            .iter()
            .flat_map(|id| shard.matching_instances("", &doc(id)))
            .collect();
        before.sort();
        let total = shard.posting_count();

        let other = shard.split();
        check!(shard.posting_count() + other.posting_count() == total);

        let mut after: Vec<_> = ["a", "b", "c"]
            .iter()
            .flat_map(|id| {
                let mut found = shard.matching_instances("", &doc(id));
                found.extend(other.matching_instances("", &doc(id)));
                found
            })
            .collect();
        after.sort();
        check!(before == after);

        let lower = shard.word_entries();
        let upper = other.word_entries();
        check!(lower.iter().all(|(word, _)| upper.iter().all(|(other, _)| word < other)));
    }

    #[test]
    fn test_split_empty_shard() {
        let mut shard = Shard::with_bounds(Some("a".into()), Some("m".into()));
        let other = shard.split();
        check!(shard.first_word().is_none());
        check!(shard.last_word().is_none());
        check!(other.is_empty());
        check!(other.last_word().is_none());
    }

    #[test]
    fn test_long_unbroken_token() {
        let blob = "A".repeat(120_000);
        let mut shard = Shard::new();
        shard.update_document(&doc("a"), &format!("data {blob}"));
        shard.update_document(&doc("b"), &format!("{blob}B tail"));

        check!(shard.matching_documents("AAAA") == docs(&["a", "b"]));
        check!(shard.matching_instances("AAAA", &doc("a")) == vec![(blob.clone(), WordPosition::new(1, 5))]);

        let other = shard.split();
        check!(shard.posting_count() + other.posting_count() == 4);

        shard.absorb(other);
        check!(shard.remove_document(&doc("b")));
        check!(shard.word_count() == 2);
        check!(shard.matching_documents("AAAA") == docs(&["a"]));
    }

    #[test]
    fn test_absorb_restores_split() {
        let mut shard = sample_shard();
        let total = shard.posting_count();
        let other = shard.split();
        shard.absorb(other);
        check!(shard.posting_count() == total);
        check!(shard.matching_documents("he") == docs(&["a", "b", "c"]));
    }
}

//! Codepoint prefix tree mapping words to their postings.

use ahash::AHashMap;
use std::collections::BTreeMap;
use std::fmt;

use crate::types::{DocumentId, WordPosition};

/// Positions of one word, grouped by document, in insertion order per document.
pub type Postings = AHashMap<DocumentId, Vec<WordPosition>>;

/// Prefix tree keyed by the codepoints of a word.
///
/// Children are kept in codepoint order, so a pre-order walk yields words in
/// ascending `str` order. Nodes that hold neither postings nor children are pruned
/// eagerly, so every reachable terminal node has at least one posting.
///
/// Every walk is iterative and nodes are torn down iteratively, so depth is bounded
/// by memory rather than by the thread stack.
#[derive(Default)]
pub(crate) struct WordTrie {
    root: Node,
    words: usize,
    occurrences: usize,
}

#[derive(Default)]
struct Node {
    children: BTreeMap<char, Node>,
    postings: Option<Postings>,
}

#[cfg(test)]
impl Node {
    fn is_vacant(&self) -> bool {
        self.postings.is_none() && self.children.is_empty()
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut pending: Vec<Node> = std::mem::take(&mut self.children).into_values().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(std::mem::take(&mut node.children).into_values());
        }
    }
}

impl fmt::Debug for WordTrie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordTrie")
            .field("words", &self.words)
            .field("occurrences", &self.occurrences)
            .finish_non_exhaustive()
    }
}

impl WordTrie {
    /// Number of distinct resident words.
    pub(crate) const fn word_count(&self) -> usize {
        self.words
    }

    /// Total number of stored positions across all words and documents.
    pub(crate) const fn occurrence_count(&self) -> usize {
        self.occurrences
    }

    /// Appends one occurrence of `word` in `document`.
    pub(crate) fn push(&mut self, word: &str, document: &DocumentId, position: WordPosition) {
        let mut node = &mut self.root;
        for c in word.chars() {
            node = node.children.entry(c).or_default();
        }

        let postings = node.postings.get_or_insert_with(|| {
            self.words += 1;
            Postings::default()
        });
        match postings.get_mut(document) {
            Some(positions) => positions.push(position),
            None => {
                postings.insert(document.clone(), vec![position]);
            }
        }
        self.occurrences += 1;
    }

    /// Merges a full posting map into `word`, appending after any existing positions.
    pub(crate) fn merge(&mut self, word: &str, postings: Postings) {
        let mut node = &mut self.root;
        for c in word.chars() {
            node = node.children.entry(c).or_default();
        }

        self.occurrences += occurrences(&postings);
        if let Some(existing) = &mut node.postings {
            for (document, positions) in postings {
                existing.entry(document).or_default().extend(positions);
            }
        } else {
            self.words += 1;
            node.postings = Some(postings);
        }
    }

    /// Detaches `word` and returns its postings.
    pub(crate) fn remove(&mut self, word: &str) -> Option<Postings> {
        let chars: Vec<char> = word.chars().collect();

        // Depth of the deepest node on the path that must survive the removal.
        let mut keep = 0;
        let mut node = &self.root;
        for (depth, c) in chars.iter().enumerate() {
            if node.postings.is_some() || node.children.len() > 1 {
                keep = depth;
            }
            node = node.children.get(c)?;
        }
        node.postings.as_ref()?;

        let removed = if node.children.is_empty() && !chars.is_empty() {
            let parent = descend_mut(&mut self.root, &chars[..keep])?;
            let mut branch = parent.children.remove(&chars[keep])?;
            descend_mut(&mut branch, &chars[keep + 1..]).and_then(|target| target.postings.take())
        } else {
            descend_mut(&mut self.root, &chars).and_then(|target| target.postings.take())
        }?;

        self.words -= 1;
        self.occurrences -= occurrences(&removed);
        Some(removed)
    }

    /// Removes every position of `document`. Returns the number of positions removed.
    pub(crate) fn remove_document(&mut self, document: &DocumentId) -> usize {
        let words: Vec<String> = self
            .entries()
            .into_iter()
            .filter(|(_, postings)| postings.contains_key(document))
            .map(|(word, _)| word)
            .collect();

        let mut removed = 0;
        for word in words {
            let chars: Vec<char> = word.chars().collect();
            let Some(postings) = descend_mut(&mut self.root, &chars).and_then(|node| node.postings.as_mut())
            else {
                continue;
            };

            removed += postings.remove(document).map_or(0, |positions| positions.len());
            if postings.is_empty() {
                self.remove(&word);
            }
        }

        self.occurrences -= removed;
        removed
    }

    /// All resident words starting with `prefix`, in ascending order.
    pub(crate) fn find_prefix(&self, prefix: &str) -> Vec<(String, &Postings)> {
        let mut node = &self.root;
        for c in prefix.chars() {
            match node.children.get(&c) {
                Some(child) => node = child,
                None => return Vec::new(),
            }
        }

        let mut found = Vec::new();
        let mut word = prefix.to_string();
        if let Some(postings) = &node.postings {
            found.push((word.clone(), postings));
        }

        // One child iterator per character pushed onto `word`.
        let mut stack = vec![node.children.iter()];
        while let Some(children) = stack.last_mut() {
            if let Some((&c, child)) = children.next() {
                word.push(c);
                if let Some(postings) = &child.postings {
                    found.push((word.clone(), postings));
                }
                stack.push(child.children.iter());
            } else {
                stack.pop();
                if !stack.is_empty() {
                    word.pop();
                }
            }
        }
        found
    }

    /// Every resident word with its postings, in ascending order.
    pub(crate) fn entries(&self) -> Vec<(String, &Postings)> {
        self.find_prefix("")
    }

    /// Consumes the trie, yielding owned entries in ascending order.
    pub(crate) fn into_entries(mut self) -> Vec<(String, Postings)> {
        let mut found = Vec::with_capacity(self.words);
        let mut word = String::new();
        if let Some(postings) = self.root.postings.take() {
            found.push((word.clone(), postings));
        }

        let mut stack = vec![std::mem::take(&mut self.root.children).into_iter()];
        while let Some(children) = stack.last_mut() {
            if let Some((c, mut child)) = children.next() {
                word.push(c);
                if let Some(postings) = child.postings.take() {
                    found.push((word.clone(), postings));
                }
                stack.push(std::mem::take(&mut child.children).into_iter());
            } else {
                stack.pop();
                if !stack.is_empty() {
                    word.pop();
                }
            }
        }
        found
    }
}

pub(crate) fn occurrences(postings: &Postings) -> usize {
    postings.values().map(Vec::len).sum()
}

fn descend_mut<'a>(mut node: &'a mut Node, path: &[char]) -> Option<&'a mut Node> {
    for c in path {
        node = node.children.get_mut(c)?;
    }
    Some(node)
}

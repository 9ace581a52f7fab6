// File: src/core/dictionary.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, BufRead};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TrieNode {
    children: HashMap<u8, usize>,
    terminal: bool,
}

impl TrieNode {
    fn new() -> Self {
        Self { children: HashMap::new(), terminal: false }
    }
}

/// The set of words a decoded token is checked against.
///
/// Backed by a byte trie held in a flat node vector, so a snapshot serializes
/// without pointer chasing. Entries are stored uppercase; lookups are literal,
/// so `"NO,"` is not a member even when `"NO"` is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dictionary {
    nodes: Vec<TrieNode>,
    word_count: usize,
}

impl Dictionary {
    pub fn new() -> Self {
        Self { nodes: vec![TrieNode::new()], word_count: 0 }
    }

    /// Builds a dictionary from raw entries.
    ///
    /// Entries are trimmed and uppercased; blank entries and single letters
    /// other than `A` and `I` are dropped. A one-letter entry like `"X"` would
    /// otherwise validate every lone resolved letter and blunt the pruning.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dict = Self::new();
        for word in words {
            dict.insert(word.as_ref());
        }
        dict
    }

    /// Reads a newline-separated word list. Entries containing anything other
    /// than ASCII letters are skipped.
    pub fn from_reader(reader: impl BufRead) -> io::Result<Self> {
        let mut dict = Self::new();
        for line in reader.lines() {
            let line = line?;
            let word = line.trim();
            if word.bytes().all(|b| b.is_ascii_alphabetic()) {
                dict.insert(word);
            }
        }
        Ok(dict)
    }

    /// Inserts a word, returning whether it was accepted and new.
    /// O(k) where k is the word length.
    pub fn insert(&mut self, word: &str) -> bool {
        let word = word.trim().to_uppercase();
        if word.is_empty() || (word.len() == 1 && word != "A" && word != "I") {
            return false;
        }

        let mut node_idx = 0;
        for &byte in word.as_bytes() {
            let next_idx = if let Some(&id) = self.nodes[node_idx].children.get(&byte) {
                id
            } else {
                let new_node_id = self.nodes.len();
                self.nodes.push(TrieNode::new());
                self.nodes[node_idx].children.insert(byte, new_node_id);
                new_node_id
            };
            node_idx = next_idx;
        }

        let node = &mut self.nodes[node_idx];
        if node.terminal {
            false
        } else {
            node.terminal = true;
            self.word_count += 1;
            true
        }
    }

    /// Literal membership test. O(k).
    pub fn contains(&self, word: &str) -> bool {
        let mut node_idx = 0;
        for &byte in word.as_bytes() {
            match self.nodes[node_idx].children.get(&byte) {
                Some(&next_idx) => node_idx = next_idx,
                None => return false,
            }
        }
        self.nodes[node_idx].terminal
    }

    pub fn len(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Dictionary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_words(iter)
    }
}

//! Prefix trie over the term dictionary, with weighted autocomplete.
//!
//! The trie remembers every term ever inserted (until an explicit
//! `remove`), so completions can outlive the documents that introduced
//! them. Children are kept in a `BTreeMap` so traversal order never
//! depends on insertion order.

use std::collections::BTreeMap;

/// One completion returned by [`Trie::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// The completed term.
    pub term: String,
    /// Accumulated insert weight; 0 when inserts were untracked.
    pub weight: u64,
}

#[derive(Debug, Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    terminal: bool,
    weight: u64,
}

/// Prefix trie keyed by single characters.
#[derive(Debug, Default)]
pub struct Trie {
    root: TrieNode,
}

impl Trie {
    /// Create a new empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `term`, creating the path and marking the terminal node.
    ///
    /// With `track_frequency`, the terminal's weight grows by 1 per call,
    /// so weights accumulate corpus term frequency when the caller inserts
    /// one occurrence at a time.
    pub fn insert(&mut self, term: &str, track_frequency: bool) {
        let mut node = &mut self.root;
        for c in term.chars() {
            node = node.children.entry(c).or_default();
        }
        node.terminal = true;
        if track_frequency {
            node.weight += 1;
        }
    }

    /// Unmark `term` and zero its weight. Structural nodes are left in
    /// place (lazy deletion).
    pub fn remove(&mut self, term: &str) {
        let mut node = &mut self.root;
        for c in term.chars() {
            match node.children.get_mut(&c) {
                Some(child) => node = child,
                None => return,
            }
        }
        node.terminal = false;
        node.weight = 0;
    }

    /// True iff the exact term has a live terminal.
    pub fn has(&self, term: &str) -> bool {
        self.find(term).is_some_and(|node| node.terminal)
    }

    /// Enumerate at most `limit` terms starting with `prefix`, ordered by
    /// (weight descending, term ascending).
    pub fn complete(&self, prefix: &str, limit: usize) -> Vec<Completion> {
        let Some(node) = self.find(prefix) else {
            return Vec::new();
        };
        let mut matches = Vec::new();
        let mut buf = prefix.to_string();
        collect(node, &mut buf, &mut matches);
        matches.sort_by(|a, b| {
            b.weight
                .cmp(&a.weight)
                .then_with(|| a.term.cmp(&b.term))
        });
        matches.truncate(limit);
        matches
    }

    fn find(&self, term: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for c in term.chars() {
            node = node.children.get(&c)?;
        }
        Some(node)
    }
}

/// Depth-first walk appending every live terminal under `node`.
fn collect(node: &TrieNode, buf: &mut String, out: &mut Vec<Completion>) {
    if node.terminal {
        out.push(Completion {
            term: buf.clone(),
            weight: node.weight,
        });
    }
    for (&c, child) in &node.children {
        buf.push(c);
        collect(child, buf, out);
        buf.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion_terms(trie: &Trie, prefix: &str, limit: usize) -> Vec<String> {
        trie.complete(prefix, limit)
            .into_iter()
            .map(|c| c.term)
            .collect()
    }

    #[test]
    fn test_insert_and_has() {
        let mut trie = Trie::new();
        trie.insert("rust", false);
        assert!(trie.has("rust"));
        assert!(!trie.has("rus"));
        assert!(!trie.has("rustacean"));
    }

    #[test]
    fn test_complete_prefix_match() {
        let mut trie = Trie::new();
        trie.insert("type", false);
        trie.insert("typescript", false);
        trie.insert("python", false);

        let terms = completion_terms(&trie, "typ", 10);
        assert_eq!(terms, vec!["type", "typescript"]);
        assert!(completion_terms(&trie, "zz", 10).is_empty());
    }

    #[test]
    fn test_complete_orders_by_weight_then_term() {
        let mut trie = Trie::new();
        for _ in 0..3 {
            trie.insert("tea", true);
        }
        trie.insert("ten", true);
        trie.insert("team", true);
        trie.insert("team", true);

        let completions = trie.complete("te", 10);
        let ranked: Vec<(&str, u64)> = completions
            .iter()
            .map(|c| (c.term.as_str(), c.weight))
            .collect();
        assert_eq!(ranked, vec![("tea", 3), ("team", 2), ("ten", 1)]);
    }

    #[test]
    fn test_complete_ties_break_by_term() {
        let mut trie = Trie::new();
        // Insert in an order that would betray insertion-order traversal.
        trie.insert("beta", true);
        trie.insert("bear", true);
        trie.insert("bead", true);

        let terms = completion_terms(&trie, "be", 10);
        assert_eq!(terms, vec!["bead", "bear", "beta"]);
    }

    #[test]
    fn test_complete_respects_limit() {
        let mut trie = Trie::new();
        for term in ["car", "cart", "card", "care", "carp"] {
            trie.insert(term, false);
        }
        let terms = completion_terms(&trie, "car", 2);
        assert_eq!(terms.len(), 2);
        assert_eq!(terms, vec!["car", "card"]);
    }

    #[test]
    fn test_untracked_insert_has_zero_weight() {
        let mut trie = Trie::new();
        trie.insert("plain", false);
        let completions = trie.complete("pla", 10);
        assert_eq!(completions[0].weight, 0);
    }

    #[test]
    fn test_remove_clears_terminal_and_weight() {
        let mut trie = Trie::new();
        trie.insert("stale", true);
        trie.insert("stale", true);
        trie.insert("stab", true);

        trie.remove("stale");
        assert!(!trie.has("stale"));
        assert!(trie.has("stab"));
        let terms = completion_terms(&trie, "sta", 10);
        assert_eq!(terms, vec!["stab"]);

        // Re-insert starts the weight from scratch.
        trie.insert("stale", true);
        let completions = trie.complete("stale", 10);
        assert_eq!(completions[0].weight, 1);
    }

    #[test]
    fn test_remove_unknown_term_is_noop() {
        let mut trie = Trie::new();
        trie.insert("keep", true);
        trie.remove("missing");
        assert!(trie.has("keep"));
    }

    #[test]
    fn test_prefix_is_its_own_completion() {
        let mut trie = Trie::new();
        trie.insert("cat", true);
        trie.insert("catalog", true);
        let terms = completion_terms(&trie, "cat", 10);
        assert_eq!(terms, vec!["cat", "catalog"]);
    }
}

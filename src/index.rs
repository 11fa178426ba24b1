//! Inverted index: term -> postings with document frequency, term
//! frequency, and occurrence positions.
//!
//! Postings for a term are materialized in ascending docId order so that
//! callers merging or intersecting lists can rely on a single canonical
//! comparator.

use crate::types::{DocId, IndexStats};
use std::collections::{BTreeMap, HashMap};

/// A posting entry: one term's occurrences within one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    /// Document ID.
    pub doc_id: DocId,
    /// Term frequency in this document, always >= 1.
    pub tf: u32,
    /// Occurrence positions, strictly increasing, with length `tf`.
    pub positions: Option<Vec<u32>>,
}

/// A postings list for a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingsList {
    /// The term these postings belong to.
    pub term: String,
    /// Document frequency: number of postings in the list.
    pub df: u32,
    /// Postings sorted ascending by docId.
    pub postings: Vec<Posting>,
}

/// Per-(term, doc) entry stored inside the index.
#[derive(Debug, Clone)]
struct TermEntry {
    tf: u32,
    positions: Option<Vec<u32>>,
}

/// In-memory inverted index.
///
/// Single-writer: mutation is not internally synchronized, callers
/// serialize access.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    /// Term -> (docId -> entry). BTreeMap keeps docIds in ascending order.
    terms: HashMap<String, BTreeMap<DocId, TermEntry>>,
    /// DocId -> terms the document contributed, for removal.
    doc_terms: HashMap<DocId, Vec<String>>,
}

impl InvertedIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document's term frequencies, replacing any prior entries
    /// for the same docId.
    ///
    /// Entries with `tf == 0` are skipped. A document with no terms still
    /// counts toward `doc_count`.
    pub fn add_document(
        &mut self,
        doc_id: &str,
        term_frequencies: &HashMap<String, u32>,
        positions_by_term: Option<&HashMap<String, Vec<u32>>>,
    ) {
        if self.doc_terms.contains_key(doc_id) {
            self.remove_document(doc_id);
        }

        let mut terms: Vec<String> = Vec::with_capacity(term_frequencies.len());
        for (term, &tf) in term_frequencies {
            if tf == 0 {
                continue;
            }
            let positions = positions_by_term
                .and_then(|by_term| by_term.get(term))
                .cloned();
            self.terms.entry(term.clone()).or_default().insert(
                doc_id.to_string(),
                TermEntry { tf, positions },
            );
            terms.push(term.clone());
        }
        self.doc_terms.insert(doc_id.to_string(), terms);
    }

    /// Remove every posting for `doc_id`. No-op when the document is
    /// unknown. Emptied terms stay in the structure but stop answering
    /// `has_term`.
    pub fn remove_document(&mut self, doc_id: &str) {
        let Some(terms) = self.doc_terms.remove(doc_id) else {
            return;
        };
        for term in terms {
            if let Some(entries) = self.terms.get_mut(&term) {
                entries.remove(doc_id);
            }
        }
    }

    /// Fetch the postings list for `term`, sorted ascending by docId.
    ///
    /// Returns `None` for unknown terms and for terms whose posting set
    /// has been emptied by removals; the returned list never has `df == 0`.
    pub fn get_postings(&self, term: &str) -> Option<PostingsList> {
        let entries = self.terms.get(term)?;
        if entries.is_empty() {
            return None;
        }
        let postings: Vec<Posting> = entries
            .iter()
            .map(|(doc_id, entry)| Posting {
                doc_id: doc_id.clone(),
                tf: entry.tf,
                positions: entry.positions.clone(),
            })
            .collect();
        Some(PostingsList {
            term: term.to_string(),
            df: postings.len() as u32,
            postings,
        })
    }

    /// True iff at least one document currently contains `term`.
    pub fn has_term(&self, term: &str) -> bool {
        self.terms.get(term).is_some_and(|entries| !entries.is_empty())
    }

    /// True iff `doc_id` is currently registered.
    pub fn has_document(&self, doc_id: &str) -> bool {
        self.doc_terms.contains_key(doc_id)
    }

    /// Index-level statistics.
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            doc_count: self.doc_terms.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn freqs(pairs: &[(&str, u32)]) -> HashMap<String, u32> {
        pairs.iter().map(|(t, n)| (t.to_string(), *n)).collect()
    }

    #[test]
    fn test_add_and_get_postings_sorted_by_doc_id() {
        let mut index = InvertedIndex::new();
        index.add_document("doc-b", &freqs(&[("rust", 2)]), None);
        index.add_document("doc-a", &freqs(&[("rust", 1)]), None);
        index.add_document("doc-c", &freqs(&[("rust", 3)]), None);

        let list = index.get_postings("rust").unwrap();
        assert_eq!(list.term, "rust");
        assert_eq!(list.df, 3);
        let ids: Vec<&str> = list.postings.iter().map(|p| p.doc_id.as_str()).collect();
        assert_eq!(ids, vec!["doc-a", "doc-b", "doc-c"]);
        assert_eq!(list.postings[1].tf, 2);
    }

    #[test]
    fn test_unknown_term_is_absent() {
        let index = InvertedIndex::new();
        assert!(index.get_postings("missing").is_none());
        assert!(!index.has_term("missing"));
    }

    #[test]
    fn test_readd_replaces_postings() {
        let mut index = InvertedIndex::new();
        index.add_document("d1", &freqs(&[("old", 4), ("both", 1)]), None);
        index.add_document("d1", &freqs(&[("new", 2), ("both", 7)]), None);

        assert!(index.get_postings("old").is_none());
        assert_eq!(index.get_postings("new").unwrap().postings[0].tf, 2);
        assert_eq!(index.get_postings("both").unwrap().postings[0].tf, 7);
        assert_eq!(index.stats().doc_count, 1);
    }

    #[test]
    fn test_remove_document_empties_terms() {
        let mut index = InvertedIndex::new();
        index.add_document("d1", &freqs(&[("solo", 1)]), None);
        index.add_document("d2", &freqs(&[("shared", 1)]), None);
        index.add_document("d1", &freqs(&[("solo", 1), ("shared", 2)]), None);

        index.remove_document("d1");
        assert!(!index.has_term("solo"));
        assert!(index.get_postings("solo").is_none());
        assert!(index.has_term("shared"));
        assert_eq!(index.get_postings("shared").unwrap().df, 1);
        assert_eq!(index.stats().doc_count, 1);
    }

    #[test]
    fn test_remove_unknown_document_is_noop() {
        let mut index = InvertedIndex::new();
        index.add_document("d1", &freqs(&[("term", 1)]), None);
        index.remove_document("ghost");
        assert_eq!(index.stats().doc_count, 1);
    }

    #[test]
    fn test_zero_tf_entries_are_skipped() {
        let mut index = InvertedIndex::new();
        index.add_document("d1", &freqs(&[("kept", 1), ("dropped", 0)]), None);
        assert!(index.has_term("kept"));
        assert!(!index.has_term("dropped"));
    }

    #[test]
    fn test_positions_stored_per_doc() {
        let mut index = InvertedIndex::new();
        let mut positions = HashMap::new();
        positions.insert("echo".to_string(), vec![0, 3, 9]);
        index.add_document("d1", &freqs(&[("echo", 3)]), Some(&positions));

        let list = index.get_postings("echo").unwrap();
        let posting = &list.postings[0];
        assert_eq!(posting.tf, 3);
        let stored = posting.positions.as_ref().unwrap();
        assert_eq!(stored, &vec![0, 3, 9]);
        assert!(stored.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_doc_count_independent_of_term_count() {
        let mut index = InvertedIndex::new();
        index.add_document("d1", &freqs(&[("a1", 1), ("b2", 1), ("c3", 1)]), None);
        index.add_document("d2", &freqs(&[("a1", 1)]), None);
        assert_eq!(index.stats().doc_count, 2);
    }

    #[test]
    fn test_document_with_no_terms_still_counts() {
        let mut index = InvertedIndex::new();
        index.add_document("empty", &HashMap::new(), None);
        assert_eq!(index.stats().doc_count, 1);
        assert!(index.has_document("empty"));
    }
}

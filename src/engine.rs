//! Search engine: ties the tokenizer, inverted index, trie, and ranker
//! into one indexing/query pipeline with cursor pagination.
//!
//! The engine is single-writer and ships no internal synchronization;
//! callers serialize mutation against reads.

use crate::index::InvertedIndex;
use crate::ranker::{compare_hits, rank, RankContext, RankOptions};
use crate::tokenizer::{tokenize, TokenizeOptions};
use crate::topk::top_k;
use crate::trie::Trie;
use crate::types::{DocId, Document, IndexStats, SearchHit};
use std::collections::HashMap;

/// Search options.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Page size (default 10).
    pub limit: usize,
    /// Resume cursor: the docId of the last hit of the previous page.
    pub cursor: Option<String>,
    /// Complete the final query fragment through the trie (default true).
    pub enable_prefix: bool,
    /// Maximum completions appended to the query (default 5).
    pub prefix_limit: usize,
    /// Passed through to the ranker's candidate prune.
    pub candidate_limit: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            cursor: None,
            enable_prefix: true,
            prefix_limit: 5,
            candidate_limit: None,
        }
    }
}

/// One page of ranked hits.
#[derive(Debug, Clone)]
pub struct SearchResults {
    /// The page, ordered by (score descending, docId ascending).
    pub hits: Vec<SearchHit>,
    /// Cursor for the next page, absent on the last page.
    pub next_cursor: Option<String>,
}

/// In-memory search engine.
#[derive(Debug, Default)]
pub struct SearchEngine {
    index: InvertedIndex,
    trie: Trie,
    /// DocId -> the document as last upserted.
    documents: HashMap<DocId, Document>,
    /// DocId -> token count, for length normalization.
    doc_lengths: HashMap<DocId, u32>,
}

impl SearchEngine {
    /// Create a new empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a batch of documents, in input order.
    ///
    /// An id already present (in the engine or earlier in the batch) is
    /// replaced; the last occurrence wins. Stop words are indexed; only
    /// query-side tokenization strips them. Every token occurrence also
    /// lands in the trie with frequency tracking, so completion weights
    /// accumulate corpus term frequency.
    pub fn upsert_documents(&mut self, docs: Vec<Document>) {
        for doc in docs {
            let mut term_frequencies: HashMap<String, u32> = HashMap::new();
            let mut positions_by_term: HashMap<String, Vec<u32>> = HashMap::new();
            let mut length: u32 = 0;

            let options = TokenizeOptions {
                normalize_case: true,
                remove_stop_words: false,
            };
            for token in tokenize(&doc.text, options) {
                length += 1;
                self.trie.insert(&token.term, true);
                positions_by_term
                    .entry(token.term.clone())
                    .or_default()
                    .push(token.position as u32);
                *term_frequencies.entry(token.term).or_insert(0) += 1;
            }

            self.index
                .add_document(&doc.id, &term_frequencies, Some(&positions_by_term));
            self.doc_lengths.insert(doc.id.clone(), length);
            self.documents.insert(doc.id.clone(), doc);
        }
    }

    /// Drop a document from the registry, lengths, and index. The trie is
    /// left untouched, so its completions may outlive the document.
    pub fn remove_document(&mut self, id: &str) {
        self.documents.remove(id);
        self.doc_lengths.remove(id);
        self.index.remove_document(id);
    }

    /// True iff `id` is currently indexed.
    pub fn has_document(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    /// Fetch a document as last upserted.
    pub fn document(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    /// Number of documents currently indexed.
    pub fn doc_count(&self) -> usize {
        self.index.stats().doc_count
    }

    /// Index statistics.
    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }

    /// Run a ranked query and return one page of hits.
    pub fn search(&self, raw_query: &str, options: &SearchOptions) -> SearchResults {
        let query_terms = self.build_query_terms(raw_query, options);

        let ctx = RankContext {
            index: &self.index,
            stats: self.index.stats(),
            doc_lengths: Some(&self.doc_lengths),
        };
        let rank_options = RankOptions {
            candidate_limit: options.candidate_limit,
            ..Default::default()
        };
        let all_hits = rank(&query_terms, &ctx, &rank_options);

        // Cursor: position of the named hit, resuming just after it.
        // Unknown or missing cursors reset to the start.
        let start = options
            .cursor
            .as_deref()
            .and_then(|cursor| all_hits.iter().position(|hit| hit.doc_id == cursor))
            .map(|index| index + 1)
            .unwrap_or(0);

        let end = (start + options.limit).min(all_hits.len());
        let page = all_hits[start..end].to_vec();

        let next_cursor = if start + options.limit < all_hits.len() && !page.is_empty() {
            page.last().map(|hit| hit.doc_id.clone())
        } else {
            None
        };

        // The page always leaves here in (score desc, docId asc) order,
        // whatever order the ranker produced.
        let hits = top_k(page, options.limit, compare_hits);

        SearchResults { hits, next_cursor }
    }

    /// Tokenize the query (stop words stripped), then append trie
    /// completions of the final fragment when prefix mode is on.
    fn build_query_terms(&self, raw_query: &str, options: &SearchOptions) -> Vec<String> {
        let tokenize_options = TokenizeOptions {
            normalize_case: true,
            remove_stop_words: true,
        };
        let mut query_terms: Vec<String> = tokenize(raw_query, tokenize_options)
            .map(|token| token.term)
            .collect();

        if options.enable_prefix && !raw_query.is_empty() {
            if let Some(fragment) = raw_query.split_whitespace().last() {
                if fragment.chars().count() >= 2 {
                    let fragment = fragment.to_lowercase();
                    for completion in self.trie.complete(&fragment, options.prefix_limit) {
                        query_terms.push(completion.term);
                    }
                }
            }
        }

        query_terms
    }
}

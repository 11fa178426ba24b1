//! TF-IDF ranker: scores candidate documents by union of postings.
//!
//! Scoring walks each query term's postings list (shortest first),
//! accumulates `tf * idf` per document, optionally prunes the candidate
//! set, then applies cosine-like length normalization.

use crate::index::InvertedIndex;
use crate::types::{DocId, IndexStats, SearchHit};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Borrowed collaborators for one ranking call.
pub struct RankContext<'a> {
    /// The index to pull postings from.
    pub index: &'a InvertedIndex,
    /// Index statistics at call time.
    pub stats: IndexStats,
    /// Per-document token counts for length normalization.
    pub doc_lengths: Option<&'a HashMap<DocId, u32>>,
}

/// Ranker options.
#[derive(Debug, Clone, Copy)]
pub struct RankOptions {
    /// Additive smoothing applied to both sides of the idf ratio
    /// (default 1).
    pub idf_smoothing: f32,
    /// When set, keep only this many candidates (by un-normalized score)
    /// before normalization.
    pub candidate_limit: Option<usize>,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            idf_smoothing: 1.0,
            candidate_limit: None,
        }
    }
}

/// Inverse document frequency: `ln((N + s) / (df + s)) + 1`.
pub fn idf(df: u32, doc_count: usize, smoothing: f32) -> f32 {
    ((doc_count as f32 + smoothing) / (df as f32 + smoothing)).ln() + 1.0
}

/// Canonical hit ordering: score descending, then docId ascending.
pub fn compare_hits(a: &SearchHit, b: &SearchHit) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.doc_id.cmp(&b.doc_id))
}

/// Score documents matching any of `query_terms`.
///
/// Duplicate query terms contribute once per occurrence. Terms absent
/// from the index contribute nothing. The result is sorted with
/// [`compare_hits`].
pub fn rank(query_terms: &[String], ctx: &RankContext<'_>, options: &RankOptions) -> Vec<SearchHit> {
    let doc_count = ctx.stats.doc_count;
    if query_terms.is_empty() || doc_count == 0 {
        return Vec::new();
    }

    // Fetch postings per query occurrence, keeping only live terms.
    let mut term_lists = Vec::with_capacity(query_terms.len());
    for term in query_terms {
        if let Some(list) = ctx.index.get_postings(term) {
            let weight = idf(list.df, doc_count, options.idf_smoothing);
            term_lists.push((weight, list));
        }
    }
    // Shortest lists first; stable, so equal-df lists keep query order.
    term_lists.sort_by_key(|(_, list)| list.df);

    // Union scoring.
    let mut scores: HashMap<DocId, f32> = HashMap::new();
    for (weight, list) in &term_lists {
        for posting in &list.postings {
            *scores.entry(posting.doc_id.clone()).or_insert(0.0) += posting.tf as f32 * weight;
        }
    }

    let mut candidates: Vec<(DocId, f32)> = scores.into_iter().collect();

    // Optional prune on the un-normalized score.
    if let Some(limit) = options.candidate_limit {
        if candidates.len() > limit {
            candidates.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.0.cmp(&b.0))
            });
            candidates.truncate(limit);
        }
    }

    // Length normalization.
    if let Some(lengths) = ctx.doc_lengths {
        for (doc_id, score) in candidates.iter_mut() {
            if let Some(&len) = lengths.get(doc_id.as_str()) {
                if len > 0 {
                    *score /= (len as f32).sqrt();
                }
            }
        }
    }

    let mut hits: Vec<SearchHit> = candidates
        .into_iter()
        .map(|(doc_id, score)| SearchHit { doc_id, score })
        .collect();
    hits.sort_by(compare_hits);
    hits
}

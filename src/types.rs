//! Core types for the textlens search engine.

use serde::{Deserialize, Serialize};

/// Document identifier type.
///
/// Identifiers are opaque to the engine and compared as byte strings;
/// lexicographic order is the tie-breaking order everywhere a docId is
/// used as a secondary sort key.
pub type DocId = String;

/// A document to be indexed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier.
    pub id: DocId,
    /// Raw text content.
    pub text: String,
    /// Optional opaque metadata, stored and returned as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// A scored hit returned from ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// The document ID.
    pub doc_id: DocId,
    /// Relevance score (higher is better).
    pub score: f32,
}

/// Index-level statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    /// Number of distinct documents currently in the index.
    pub doc_count: usize,
}

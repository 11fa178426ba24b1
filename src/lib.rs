//! textlens - an in-memory full-text search engine.
//!
//! Documents go in as (id, text, optional metadata); the engine builds an
//! inverted index and a prefix dictionary, then answers ranked queries in
//! two modes:
//! - **Full-text**: TF-IDF union scoring with cosine-like length
//!   normalization.
//! - **Prefix/typeahead**: the final query fragment is expanded through a
//!   weighted trie before ranking.
//!
//! Results are stably ordered (score descending, docId ascending) and
//! paginated through opaque cursors. Everything lives in memory; there is
//! no persistence and no internal locking, so the bundled HTTP server
//! serializes writers for you.

pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod ranker;
pub mod server;
pub mod tokenizer;
pub mod topk;
pub mod trie;
pub mod types;

// Re-export commonly used types
pub use config::ServerConfig;
pub use engine::{SearchEngine, SearchOptions, SearchResults};
pub use error::{ApiError, ErrorCode};
pub use index::{InvertedIndex, Posting, PostingsList};
pub use ranker::{compare_hits, idf, rank, RankContext, RankOptions};
pub use server::{build_app, AppState};
pub use tokenizer::{is_stop_word, tokenize, Token, TokenizeOptions};
pub use topk::top_k;
pub use trie::{Completion, Trie};
pub use types::{DocId, Document, IndexStats, SearchHit};

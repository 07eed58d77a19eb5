//! A small text-retrieval engine: positional inverted index plus a ranked
//! boolean/phrase query evaluator.
//!
//! # Architecture
//!
//! ```text
//! build:  JSON ──▶ build::Document ──▶ tokenize ──▶ InvertedIndex ─┐
//!                                        │                         ├─▶ TSV
//!                                        └──▶ DocumentIndex ◀──────┘
//!
//! query:  TSV ──▶ indexes ──▶ query::parse ──▶ phrase (pool)
//!                                   │              │
//!                                   └──▶ rank ◀────┘ ──▶ topk ──▶ results
//! ```
//!
//! The build is two passes: Pass 1 fills the inverted index, Pass 2 walks
//! the documents again to compute cosine lengths, which need the final
//! document frequencies. Query-side tokens run through the exact pipeline
//! the builder used; anything else would miss the index silently.
//!
//! Scoring is augmented TF × probabilistic IDF on the document side,
//! boolean TF × IDF on the query side, cosine-normalized by build-time
//! document length (see [`rank`]).

pub mod build;
pub mod docindex;
pub mod error;
pub mod inverted;
pub mod phrase;
pub mod query;
pub mod rank;
pub mod search;
pub mod sorted;
pub mod tokenize;
pub mod topk;
pub mod types;

pub use build::{load_documents, run_build, Document};
pub use docindex::DocumentIndex;
pub use error::{Error, Result};
pub use inverted::InvertedIndex;
pub use query::{parse_query, ParsedQuery};
pub use search::{evaluate, load_indexes, run_query, QueryOutcome};
pub use topk::TopK;
pub use types::{DocRecord, Posting};

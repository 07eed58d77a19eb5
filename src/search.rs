//! Query orchestration: load the persisted indexes, evaluate a parsed
//! query, rank the pool, and hand back the top k.
//!
//! Evaluation is pure with respect to the indexes: all per-query state
//! (candidate pool, score map, heap) lives and dies inside one call.

use std::path::Path;

use crate::docindex::DocumentIndex;
use crate::error::{Error, Result};
use crate::inverted::InvertedIndex;
use crate::phrase;
use crate::query::{self, ParsedQuery};
use crate::rank;
use crate::topk::TopK;

/// What a query evaluates to, before formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    /// Documents that were considered (the candidate pool).
    pub pool_size: usize,
    /// Documents whose similarity score was non-zero.
    pub nonzero_count: usize,
    /// At most k (doc id, score) pairs, descending by score.
    pub ranked: Vec<(u32, f64)>,
}

/// Load both TSV indexes from `index_dir`, verifying they exist first.
pub fn load_indexes(index_dir: &Path) -> Result<(InvertedIndex, DocumentIndex)> {
    let inverted_path = index_dir.join("inverted_index.tsv");
    let document_path = index_dir.join("document_index.tsv");

    for path in [&inverted_path, &document_path] {
        if !path.is_file() {
            return Err(Error::IndexShape(format!(
                "Index {} does not exist",
                path.display()
            )));
        }
    }

    Ok((
        InvertedIndex::load(&inverted_path)?,
        DocumentIndex::load(&document_path)?,
    ))
}

/// Parse, evaluate, and rank a raw query string against an index directory.
pub fn run_query(
    index_dir: &str,
    k: usize,
    raw_query: &str,
    require_all_phrases: bool,
) -> Result<QueryOutcome> {
    let dir = Path::new(index_dir);
    if !dir.is_dir() {
        return Err(Error::ArgShape(format!(
            "{} is not a valid directory path",
            index_dir
        )));
    }
    if k == 0 {
        return Err(Error::ArgShape(
            "You must request a positive number of results".to_string(),
        ));
    }

    // Validate the query before touching the index.
    let parsed = query::parse_query(raw_query)?;

    let (inverted, documents) = load_indexes(dir)?;
    evaluate(&inverted, &documents, &parsed, k, require_all_phrases)
}

/// Evaluate a normalized query against in-memory indexes.
pub fn evaluate(
    inverted: &InvertedIndex,
    documents: &DocumentIndex,
    parsed: &ParsedQuery,
    k: usize,
    require_all_phrases: bool,
) -> Result<QueryOutcome> {
    if parsed.keywords.is_empty() && parsed.phrases.is_empty() {
        return Err(Error::Semantic(
            "Query must contain at least one valid keyword".to_string(),
        ));
    }

    let pool: Vec<u32> = if parsed.has_phrases() {
        phrase::docs_matching_phrases(inverted, &parsed.phrases, require_all_phrases)
    } else {
        documents.doc_ids().collect()
    };

    let scored = rank::score_pool(
        inverted,
        documents,
        &parsed.keywords,
        &parsed.phrases,
        &pool,
    )?;

    let mut heap = TopK::new(k);
    for (&doc_id, &score) in &scored {
        heap.offer(score, doc_id);
    }

    Ok(QueryOutcome {
        pool_size: pool.len(),
        nonzero_count: scored.len(),
        ranked: heap.into_descending(),
    })
}

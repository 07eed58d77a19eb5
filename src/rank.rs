//! TF–IDF weighting and candidate-pool scoring.
//!
//! The weight formulas live here and nowhere else: the build's Pass 2 uses
//! the same functions to compute cosine lengths that the query side uses to
//! score, so the two cannot drift apart.
//!
//! Model: query side is boolean tf × idf (`log10(N/df)`); document side is
//! augmented tf (`0.5 + 0.5·tf/max_tf`) × probabilistic idf
//! (`max(0, log10((N−df)/df))`); final scores are cosine-normalized by the
//! document length computed at build time.

use std::collections::{BTreeMap, BTreeSet};

use crate::docindex::DocumentIndex;
use crate::error::{Error, Result};
use crate::inverted::InvertedIndex;

/// Query-side idf: `log10(N / df)`. Caller guarantees `df > 0`.
pub fn idf(n: usize, df: u32) -> f64 {
    (n as f64 / f64::from(df)).log10()
}

/// Document-side probabilistic idf, clipped at zero.
///
/// Short-circuits when `df >= N` so the log argument can never be zero or
/// negative; a term in more than half the corpus weighs nothing.
pub fn prob_idf(n: usize, df: u32) -> f64 {
    if df == 0 || df as usize >= n {
        return 0.0;
    }
    ((n as f64 - f64::from(df)) / f64::from(df)).log10().max(0.0)
}

/// Augmented term frequency, bounded in [0.5, 1.0].
pub fn augmented_tf(tf: u32, max_tf: u32) -> f64 {
    0.5 + (0.5 * f64::from(tf)) / f64::from(max_tf)
}

/// Score every document in `pool` against the pooled query vocabulary.
///
/// Keywords and phrase members contribute identically here; phrase
/// structure only shaped the pool. Documents whose raw score stays zero are
/// dropped before normalization, so the cosine division never sees a
/// zero-length document.
pub fn score_pool(
    inverted: &InvertedIndex,
    documents: &DocumentIndex,
    keywords: &[String],
    phrases: &[Vec<String>],
    pool: &[u32],
) -> Result<BTreeMap<u32, f64>> {
    let mut vocabulary: BTreeSet<&str> = BTreeSet::new();
    for keyword in keywords {
        vocabulary.insert(keyword);
    }
    for phrase in phrases {
        for term in phrase {
            vocabulary.insert(term);
        }
    }

    let mut raw: BTreeMap<u32, f64> = pool.iter().map(|&doc_id| (doc_id, 0.0)).collect();
    let n = documents.len();

    for term in vocabulary {
        let df = inverted.get_df(term);
        if df == 0 {
            continue;
        }

        let query_weight = idf(n, df);
        let doc_idf = prob_idf(n, df);

        for posting in inverted.get_postings(term) {
            let Some(score) = raw.get_mut(&posting.doc_id) else {
                continue;
            };

            let max_tf = documents.get_max_tf(posting.doc_id).ok_or_else(|| {
                Error::IndexShape(format!(
                    "Document {} appears in postings but not in the document index",
                    posting.doc_id
                ))
            })?;

            let doc_weight = augmented_tf(posting.tf, max_tf) * doc_idf;
            *score += query_weight * doc_weight;
        }
    }

    let mut scored = BTreeMap::new();
    for (doc_id, score) in raw {
        if score != 0.0 {
            let length = documents.get_length(doc_id).ok_or_else(|| {
                Error::IndexShape(format!("Document {} missing from the document index", doc_id))
            })?;
            scored.insert(doc_id, score / length);
        }
    }

    Ok(scored)
}

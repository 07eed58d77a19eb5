//! Property-based tests for the index and query invariants.

mod common;

use std::collections::BTreeSet;

use proptest::prelude::*;
use tempfile::TempDir;

use ferret::{
    build::{self, Document},
    evaluate, parse_query, tokenize, DocumentIndex, InvertedIndex, TopK,
};

// ============================================================================
// STRATEGIES
// ============================================================================

/// Random word-like strings.
fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{2,6}").unwrap()
}

/// Random document text (a handful of words).
fn document_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(word_strategy(), 1..12).prop_map(|words| words.join(" "))
}

/// A corpus of documents.
fn corpus_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(document_strategy(), 1..8)
}

fn build_corpus(texts: &[String]) -> (InvertedIndex, DocumentIndex) {
    let mut docs: Vec<Document> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| Document::new(i as u32, text.clone()))
        .collect();
    build::build_indexes(&mut docs).unwrap()
}

/// The term set a document ends up with, via the same public pipeline the
/// builder uses.
fn doc_terms(text: &str) -> BTreeSet<String> {
    tokenize::normalize(&tokenize::tokenize(text))
        .into_iter()
        .collect()
}

// ============================================================================
// INDEX INVARIANTS
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// df equals the postings length and doc ids are strictly increasing.
    #[test]
    fn prop_df_matches_postings_and_order(corpus in corpus_strategy()) {
        let (inverted, _) = build_corpus(&corpus);

        for term in inverted.terms() {
            let postings = inverted.get_postings(term);
            prop_assert_eq!(inverted.get_df(term) as usize, postings.len());
            prop_assert!(!postings.is_empty());
            for pair in postings.windows(2) {
                prop_assert!(pair[0].doc_id < pair[1].doc_id);
            }
        }
    }

    /// Every posting carries exactly tf positions, strictly increasing.
    #[test]
    fn prop_positions_wellformed(corpus in corpus_strategy()) {
        let (inverted, _) = build_corpus(&corpus);

        for term in inverted.terms() {
            for posting in inverted.get_postings(term) {
                prop_assert_eq!(posting.tf as usize, posting.positions.len());
                for pair in posting.positions.windows(2) {
                    prop_assert!(pair[0] < pair[1]);
                }
            }
        }
    }

    /// max_tf is the maximum tf any term of the document reaches.
    #[test]
    fn prop_max_tf_matches_postings(corpus in corpus_strategy()) {
        let (inverted, documents) = build_corpus(&corpus);

        for doc_id in documents.doc_ids() {
            let mut observed = 0;
            for term in inverted.terms() {
                for posting in inverted.get_postings(term) {
                    if posting.doc_id == doc_id {
                        observed = observed.max(posting.tf);
                    }
                }
            }
            prop_assert_eq!(documents.get_max_tf(doc_id), Some(observed));
        }
    }

    /// Save then load reproduces both indexes exactly. Lengths survive
    /// because the writer emits the shortest round-tripping decimal.
    #[test]
    fn prop_tsv_round_trip(corpus in corpus_strategy()) {
        let (inverted, documents) = build_corpus(&corpus);

        let dir = TempDir::new().unwrap();
        let inv_path = dir.path().join("inverted_index.tsv");
        let doc_path = dir.path().join("document_index.tsv");

        inverted.save(&inv_path).unwrap();
        documents.save(&doc_path).unwrap();

        prop_assert_eq!(InvertedIndex::load(&inv_path).unwrap(), inverted);
        prop_assert_eq!(DocumentIndex::load(&doc_path).unwrap(), documents);
    }

    /// A keyword-only query considers every document, and the documents
    /// that score are exactly those containing a query term whose df stays
    /// under half the corpus (above that, probabilistic idf clips to zero
    /// and the term cannot contribute weight).
    #[test]
    fn prop_keyword_pool_and_nonzero_set(corpus in corpus_strategy(), word in word_strategy()) {
        let (inverted, documents) = build_corpus(&corpus);
        let n = documents.len();

        let parsed = parse_query(&word).unwrap();
        prop_assume!(!parsed.keywords.is_empty());

        let outcome = evaluate(&inverted, &documents, &parsed, n.max(1), false).unwrap();
        prop_assert_eq!(outcome.pool_size, n);

        let scoring_terms: BTreeSet<&String> = parsed
            .keywords
            .iter()
            .filter(|t| {
                let df = inverted.get_df(t);
                df > 0 && (df as usize) * 2 < n
            })
            .collect();

        let expected: BTreeSet<u32> = documents
            .doc_ids()
            .filter(|&doc_id| {
                scoring_terms.iter().any(|term| {
                    inverted
                        .get_postings(term)
                        .iter()
                        .any(|p| p.doc_id == doc_id)
                })
            })
            .collect();

        let got: BTreeSet<u32> = outcome.ranked.iter().map(|(id, _)| *id).collect();
        prop_assert_eq!(outcome.nonzero_count, expected.len());
        prop_assert_eq!(got, expected);
    }

    /// Documents whose body normalizes to nothing get a zero length and
    /// never appear in results.
    #[test]
    fn prop_zero_length_documents_never_score(corpus in corpus_strategy(), word in word_strategy()) {
        let mut texts = corpus.clone();
        texts.push("... !!! ???".to_string());
        let empty_id = (texts.len() - 1) as u32;

        let (inverted, documents) = build_corpus(&texts);
        prop_assert_eq!(documents.get_length(empty_id), Some(0.0));
        prop_assert_eq!(documents.get_max_tf(empty_id), Some(0));

        let parsed = parse_query(&word).unwrap();
        prop_assume!(!parsed.keywords.is_empty());
        let outcome = evaluate(&inverted, &documents, &parsed, texts.len(), false).unwrap();
        prop_assert!(outcome.ranked.iter().all(|(id, _)| *id != empty_id));
    }
}

// ============================================================================
// TOP-K PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The selector emits min(k, candidates) pairs in descending order,
    /// and nothing it dropped outranks anything it kept.
    #[test]
    fn prop_topk_selects_the_highest(
        scores in prop::collection::vec(0u32..10_000, 0..40),
        k in 1usize..10,
    ) {
        let scores: Vec<f64> = scores.iter().map(|s| f64::from(*s) / 100.0).collect();

        let mut heap = TopK::new(k);
        for (doc_id, score) in scores.iter().enumerate() {
            heap.offer(*score, doc_id as u32);
        }
        let ranked = heap.into_descending();

        prop_assert_eq!(ranked.len(), k.min(scores.len()));
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].1 >= pair[1].1);
        }

        let kept: BTreeSet<u32> = ranked.iter().map(|(id, _)| *id).collect();
        let floor = ranked.last().map(|(_, s)| *s).unwrap_or(f64::NEG_INFINITY);
        for (doc_id, score) in scores.iter().enumerate() {
            if !kept.contains(&(doc_id as u32)) {
                prop_assert!(*score <= floor);
            }
        }
    }
}

// ============================================================================
// NORMALIZATION FIXPOINT
// ============================================================================

/// Re-normalizing the persisted terms of a document is the identity, for
/// vocabulary whose stems are themselves stable under stemming.
#[test]
fn normalization_is_idempotent_on_stable_vocabulary() {
    let text = "the quick brown fox jumped over the lazy dog while 42 owls watched";
    let terms = tokenize::normalize(&tokenize::tokenize(text));
    let again = tokenize::normalize(&terms);
    assert_eq!(terms, again);
}

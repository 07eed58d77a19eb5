//! End-to-end scenarios: build a corpus into a temp directory, reload it
//! from disk, and query through the same entry points the CLI uses.

mod common;

use common::{
    build_corpus, corpus_file, index_dir_str, index_files_exist, read_index_file, PADDED_CORPUS,
};
use ferret::{run_build, run_query};
use tempfile::TempDir;

#[test]
fn keyword_query_considers_every_document() {
    let dir = build_corpus(PADDED_CORPUS);
    let outcome = run_query(index_dir_str(&dir), 2, "quick", false).unwrap();

    assert_eq!(outcome.pool_size, 5);
    assert_eq!(outcome.nonzero_count, 2);
    let ids: Vec<u32> = outcome.ranked.iter().map(|(id, _)| *id).collect();
    assert!(ids.contains(&1) && ids.contains(&3));
    assert!(outcome.ranked.iter().all(|(_, score)| *score > 0.0));
}

#[test]
fn structurally_identical_documents_score_identically() {
    // Docs 1 and 2 differ only in their unique second word, so their
    // max_tf and cosine lengths agree and "quick" scores them equally.
    let dir = build_corpus(
        r#"[
            {"document_id": 1, "line": "quick brown"},
            {"document_id": 2, "line": "quick crimson"},
            {"document_id": 3, "line": "slow violet march"},
            {"document_id": 4, "line": "amber evening light"},
            {"document_id": 5, "line": "copper morning bells"}
        ]"#,
    );
    let outcome = run_query(index_dir_str(&dir), 5, "quick", false).unwrap();

    assert_eq!(outcome.nonzero_count, 2);
    assert_eq!(outcome.ranked[0].1, outcome.ranked[1].1);
}

#[test]
fn phrase_query_restricts_the_pool() {
    let dir = build_corpus(PADDED_CORPUS);
    let outcome = run_query(index_dir_str(&dir), 10, ":quick dog:", false).unwrap();

    assert_eq!(outcome.pool_size, 1);
    assert_eq!(outcome.nonzero_count, 1);
    assert_eq!(outcome.ranked.len(), 1);
    assert_eq!(outcome.ranked[0].0, 3);
}

#[test]
fn mixed_phrase_and_keyword_scores_only_the_pool() {
    let dir = build_corpus(PADDED_CORPUS);
    let outcome = run_query(index_dir_str(&dir), 5, ":quick dog: lazy", false).unwrap();

    // the phrase admits only doc 3; "lazy" can score nothing outside it
    assert_eq!(outcome.pool_size, 1);
    assert_eq!(outcome.nonzero_count, 1);
    assert_eq!(outcome.ranked[0].0, 3);
}

#[test]
fn absent_phrase_yields_empty_report() {
    let dir = build_corpus(PADDED_CORPUS);
    let outcome = run_query(index_dir_str(&dir), 10, ":brown dog:", false).unwrap();

    assert_eq!(outcome.pool_size, 0);
    assert_eq!(outcome.nonzero_count, 0);
    assert!(outcome.ranked.is_empty());
}

#[test]
fn duplicate_document_id_aborts_before_writing() {
    let dir = TempDir::new().unwrap();
    let input = corpus_file(
        &dir,
        r#"[
            {"document_id": 1, "line": "first body"},
            {"document_id": 1, "line": "second body"}
        ]"#,
    );

    let result = run_build(input.to_str().unwrap(), dir.path().to_str().unwrap());
    assert!(result.is_err());
    assert!(!index_files_exist(dir.path()));
}

#[test]
fn malformed_query_fails_without_touching_the_index() {
    // The directory exists but holds unparseable index files; a query
    // validation error must surface before any load is attempted.
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("inverted_index.tsv"), "not an index").unwrap();
    std::fs::write(dir.path().join("document_index.tsv"), "not an index").unwrap();

    let err = run_query(index_dir_str(&dir), 5, ":open phrase", false).unwrap_err();
    assert!(err.to_string().contains("colons"), "got: {}", err);
}

#[test]
fn missing_index_files_are_reported() {
    let dir = TempDir::new().unwrap();
    let err = run_query(index_dir_str(&dir), 5, "anything", false).unwrap_err();
    assert!(err.to_string().contains("does not exist"), "got: {}", err);
}

#[test]
fn zero_k_is_rejected() {
    let dir = build_corpus(PADDED_CORPUS);
    assert!(run_query(index_dir_str(&dir), 0, "quick", false).is_err());
}

#[test]
fn union_pool_admits_any_phrase_match() {
    let dir = build_corpus(PADDED_CORPUS);

    let any = run_query(index_dir_str(&dir), 10, ":quick dog: :lazy dog:", false).unwrap();
    assert_eq!(any.pool_size, 2);

    let all = run_query(index_dir_str(&dir), 10, ":quick dog: :lazy dog:", true).unwrap();
    assert_eq!(all.pool_size, 0);
}

#[test]
fn persisted_tsv_matches_the_documented_grammar() {
    let dir = build_corpus(r#"[{"document_id": 0, "line": "who is you"}]"#);

    let inverted = read_index_file(&dir, "inverted_index.tsv");
    assert_eq!(
        inverted,
        "is\t1\t[[0, 1, [1]]]\nwho\t1\t[[0, 1, [0]]]\nyou\t1\t[[0, 1, [2]]]\n"
    );

    // single document: every df equals N, so every weight and the length
    // are zero
    let documents = read_index_file(&dir, "document_index.tsv");
    assert_eq!(documents, "0\t1\t0\n");
}

#[test]
fn queries_reuse_the_build_normalization() {
    let dir = build_corpus(
        r#"[
            {"document_id": 1, "line": "he can't swim"},
            {"document_id": 2, "line": "she swims daily"},
            {"document_id": 3, "line": "dry desert sand"},
            {"document_id": 4, "line": "tall forest trees"},
            {"document_id": 5, "line": "frozen tundra wind"}
        ]"#,
    );

    // "Swimming" stems to the same term as "swim" and "swims"
    let outcome = run_query(index_dir_str(&dir), 10, "Swimming", false).unwrap();
    assert_eq!(outcome.nonzero_count, 2);

    // "can't" expands to [can, not] at build time, so the phrase
    // ":can not swim: matches the contraction in doc 1
    let outcome = run_query(index_dir_str(&dir), 10, ":can not swim:", false).unwrap();
    assert_eq!(outcome.pool_size, 1);
    assert_eq!(outcome.ranked[0].0, 1);
}

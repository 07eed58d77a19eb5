//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// The quick/lazy corpus from the scenario suite, padded with two
/// off-topic documents so that "quick" and "dog" stay in less than half
/// the corpus and keep a positive probabilistic idf.
pub const PADDED_CORPUS: &str = r#"[
    {"document_id": 1, "line": "the quick brown fox"},
    {"document_id": 2, "line": "the lazy dog"},
    {"document_id": 3, "line": "the quick dog"},
    {"document_id": 4, "line": "meandering rivers flood plains"},
    {"document_id": 5, "line": "granite mountains erode slowly"}
]"#;

/// Write `json` to `corpus.json` inside a fresh temp dir.
pub fn corpus_file(dir: &TempDir, json: &str) -> PathBuf {
    let path = dir.path().join("corpus.json");
    fs::write(&path, json).unwrap();
    path
}

/// Build `json` into a temp dir holding both the corpus and the indexes.
/// Returns the temp dir; index files sit at its root.
pub fn build_corpus(json: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    let input = corpus_file(&dir, json);
    ferret::run_build(input.to_str().unwrap(), dir.path().to_str().unwrap()).unwrap();
    dir
}

pub fn index_dir_str(dir: &TempDir) -> &str {
    dir.path().to_str().unwrap()
}

pub fn read_index_file(dir: &TempDir, name: &str) -> String {
    fs::read_to_string(dir.path().join(name)).unwrap()
}

pub fn index_files_exist(dir: &Path) -> bool {
    dir.join("inverted_index.tsv").is_file() && dir.join("document_index.tsv").is_file()
}

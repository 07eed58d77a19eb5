// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Build pipeline: JSON corpus in, two TSV indexes out.
//!
//! The build is two passes by necessity: cosine lengths depend on final df
//! values, so Pass 1 populates the inverted index and only then does Pass 2
//! walk the documents again to compute lengths. With the `parallel` feature
//! Pass 1 is sharded across rayon workers and merged by doc id, which
//! produces byte-identical TSV output to the sequential build.

pub mod document;

use std::fs;
use std::path::Path;

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use serde::Deserialize;

use crate::docindex::DocumentIndex;
use crate::error::{Error, Result};
use crate::inverted::InvertedIndex;
use crate::rank;

pub use document::Document;

/// Documents per shard in the parallel Pass 1.
#[cfg(feature = "parallel")]
const SHARD_SIZE: usize = 64;

/// One object of the input array. Every field other than `document_id` is a
/// zone; zone order is preserved because it fixes term positions.
#[derive(Deserialize)]
struct RawDoc {
    document_id: serde_json::Value,
    #[serde(flatten)]
    zones: serde_json::Map<String, serde_json::Value>,
}

#[cfg(feature = "parallel")]
fn progress_bar(len: u64, prefix: &'static str) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:<12} [{bar:40.cyan/dim}] {pos}/{len}")
            .unwrap()
            .progress_chars("━━╸"),
    );
    bar.set_prefix(prefix);
    bar
}

/// Build both indexes from `input` and persist them into `index_dir`.
pub fn run_build(input: &str, index_dir: &str) -> Result<()> {
    let input_path = Path::new(input);
    let out_path = Path::new(index_dir);

    if !input_path.is_file() {
        return Err(Error::ArgShape(format!("{} is not a valid file path", input)));
    }
    if !out_path.is_dir() {
        return Err(Error::ArgShape(format!(
            "{} is not a valid directory path",
            index_dir
        )));
    }

    let mut documents = load_documents(input_path)?;
    let (inverted, docindex) = build_indexes(&mut documents)?;

    inverted.save(&out_path.join("inverted_index.tsv"))?;
    docindex.save(&out_path.join("document_index.tsv"))?;

    Ok(())
}

/// Load the corpus: an array of objects, each with an integer-coercible
/// `document_id` and at least one text zone. Duplicate ids and non-text
/// zones are fatal.
pub fn load_documents(path: &Path) -> Result<Vec<Document>> {
    let bytes = fs::read(path)
        .map_err(|e| Error::InputShape(format!("Failed to read {}: {}", path.display(), e)))?;
    let text = String::from_utf8_lossy(&bytes);

    let raw_docs: Vec<RawDoc> = serde_json::from_str(&text)
        .map_err(|e| Error::InputShape(format!("Input is not a valid document array: {}", e)))?;

    let mut documents = Vec::with_capacity(raw_docs.len());
    let mut seen = std::collections::BTreeSet::new();

    for raw in raw_docs {
        let doc_id = coerce_doc_id(&raw.document_id)?;

        if !seen.insert(doc_id) {
            return Err(Error::InputShape(format!("Found duplicate doc ID {}", doc_id)));
        }

        if raw.zones.is_empty() {
            return Err(Error::InputShape(format!("Document {} is missing zones", doc_id)));
        }

        let mut body = String::new();
        for (zone, value) in &raw.zones {
            let text = value.as_str().ok_or_else(|| {
                Error::InputShape(format!("Document {} has a non-text zone {}", doc_id, zone))
            })?;
            body.push(' ');
            body.push_str(text);
        }

        documents.push(Document::new(doc_id, body));
    }

    Ok(documents)
}

fn coerce_doc_id(value: &serde_json::Value) -> Result<u32> {
    let coerced = match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    coerced.ok_or_else(|| {
        Error::InputShape("Document does not contain a usable document_id field".to_string())
    })
}

/// Two-pass construction over already-loaded documents.
pub fn build_indexes(documents: &mut [Document]) -> Result<(InvertedIndex, DocumentIndex)> {
    accumulate_all(documents);
    let inverted = build_inverted(documents);
    let docindex = build_docindex(documents, &inverted)?;
    Ok((inverted, docindex))
}

#[cfg(feature = "parallel")]
fn accumulate_all(documents: &mut [Document]) {
    let bar = progress_bar(documents.len() as u64, "Tokenizing");
    documents.par_iter_mut().for_each(|doc| {
        doc.accumulate_terms();
        bar.inc(1);
    });
    bar.finish_and_clear();
}

#[cfg(not(feature = "parallel"))]
fn accumulate_all(documents: &mut [Document]) {
    for doc in documents.iter_mut() {
        doc.accumulate_terms();
    }
}

/// Pass 1: populate the inverted index.
///
/// Parallel variant shards the corpus, builds a partial index per shard,
/// and folds the shards together. Shards hold disjoint doc ids, so the
/// merge is a postings union per term and the result does not depend on
/// fold order.
#[cfg(feature = "parallel")]
fn build_inverted(documents: &[Document]) -> InvertedIndex {
    let bar = progress_bar(documents.len() as u64, "Indexing");

    let partials: Vec<InvertedIndex> = documents
        .par_chunks(SHARD_SIZE)
        .map(|shard| {
            let mut partial = InvertedIndex::new();
            for doc in shard {
                register_document_terms(&mut partial, doc);
                bar.inc(1);
            }
            partial
        })
        .collect();

    bar.finish_and_clear();

    let mut inverted = InvertedIndex::new();
    for partial in partials {
        inverted.merge(partial);
    }
    inverted
}

#[cfg(not(feature = "parallel"))]
fn build_inverted(documents: &[Document]) -> InvertedIndex {
    let mut inverted = InvertedIndex::new();
    for doc in documents {
        register_document_terms(&mut inverted, doc);
    }
    inverted
}

fn register_document_terms(inverted: &mut InvertedIndex, doc: &Document) {
    for (term, positions) in doc.terms() {
        inverted.register_term(term, doc.doc_id(), positions.len() as u32, positions.to_vec());
    }
}

/// Pass 2: document lengths. Requires final df values, hence after Pass 1.
fn build_docindex(documents: &[Document], inverted: &InvertedIndex) -> Result<DocumentIndex> {
    let n = documents.len();

    #[cfg(feature = "parallel")]
    let records: Vec<(u32, u32, f64)> = documents
        .par_iter()
        .map(|doc| doc_record(doc, inverted, n))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let records: Vec<(u32, u32, f64)> = documents
        .iter()
        .map(|doc| doc_record(doc, inverted, n))
        .collect();

    let mut docindex = DocumentIndex::new();
    for (doc_id, max_tf, length) in records {
        docindex.register_document(doc_id, max_tf, length)?;
    }
    Ok(docindex)
}

fn doc_record(doc: &Document, inverted: &InvertedIndex, n: usize) -> (u32, u32, f64) {
    let max_tf = doc.max_tf();
    let mut norm_squared = 0.0;

    for (term, positions) in doc.terms() {
        let df = inverted.get_df(term);
        let tf = positions.len() as u32;
        let weight = rank::augmented_tf(tf, max_tf) * rank::prob_idf(n, df);
        norm_squared += weight * weight;
    }

    (doc.doc_id(), max_tf, norm_squared.sqrt())
}

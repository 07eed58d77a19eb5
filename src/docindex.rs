//! The document index: doc id → (max_tf, cosine length).
//!
//! Everything the ranker needs about a document that is not tied to a
//! specific term lives here. Records are written once during the build and
//! never mutated; a duplicate registration is an input error, not a merge.
//!
//! On disk this is one line per document, doc ids ascending:
//!
//! ```text
//! <doc_id>\t<max_tf>\t<length>
//! ```
//!
//! `length` uses the default float formatting, which emits the shortest
//! decimal that round-trips.

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::DocRecord;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct DocumentIndex {
    entries: BTreeMap<u32, DocRecord>,
}

impl DocumentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document's ranking factors. Registering the same id twice is
    /// an input-shape error.
    pub fn register_document(&mut self, doc_id: u32, max_tf: u32, length: f64) -> Result<()> {
        if self.entries.contains_key(&doc_id) {
            return Err(Error::InputShape(format!(
                "Document {} was added to index twice",
                doc_id
            )));
        }
        self.entries.insert(doc_id, DocRecord { max_tf, length });
        Ok(())
    }

    /// Number of documents in the collection (the N of the idf formulas).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All document ids, ascending.
    pub fn doc_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }

    pub fn get_max_tf(&self, doc_id: u32) -> Option<u32> {
        self.entries.get(&doc_id).map(|record| record.max_tf)
    }

    pub fn get_length(&self, doc_id: u32) -> Option<f64> {
        self.entries.get(&doc_id).map(|record| record.length)
    }

    /// Write the index as TSV, one document per line, doc ids ascending.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = fs::File::create(path)
            .map_err(|e| Error::IndexShape(format!("Failed to create {}: {}", path.display(), e)))?;
        let mut out = BufWriter::new(file);

        for (doc_id, record) in &self.entries {
            writeln!(out, "{}\t{}\t{}", doc_id, record.max_tf, record.length)
                .map_err(|e| Error::IndexShape(format!("Failed to write {}: {}", path.display(), e)))?;
        }

        out.flush()
            .map_err(|e| Error::IndexShape(format!("Failed to write {}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Load an index previously written by [`DocumentIndex::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .map_err(|e| Error::IndexShape(format!("Failed to read {}: {}", path.display(), e)))?;
        let text = String::from_utf8_lossy(&bytes);

        let mut index = DocumentIndex::new();
        for (line_no, line) in text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }

            let mut fields = line.splitn(3, '\t');
            let parsed = match (fields.next(), fields.next(), fields.next()) {
                (Some(id), Some(max_tf), Some(length)) => {
                    match (id.parse::<u32>(), max_tf.parse::<u32>(), length.parse::<f64>()) {
                        (Ok(id), Ok(max_tf), Ok(length)) => Some((id, max_tf, length)),
                        _ => None,
                    }
                }
                _ => None,
            };

            let (doc_id, max_tf, length) = parsed.ok_or_else(|| {
                Error::IndexShape(format!(
                    "{}:{}: unparseable document record",
                    path.display(),
                    line_no + 1
                ))
            })?;

            index.entries.insert(doc_id, DocRecord { max_tf, length });
        }

        Ok(index)
    }
}

//! The positional inverted index.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **POSTINGS_SORTED**: Each postings list is strictly increasing by doc id
//! 2. **DF_CORRECT**: `df` equals the length of the postings list
//! 3. **NON_EMPTY**: Every term has at least one posting
//! 4. **POSITIONS_WELLFORMED**: `positions.len() == tf`, strictly increasing
//!
//! The term dictionary is an ordered map, so saving walks terms in
//! lexicographic order with no separate sort and the persisted file is
//! byte-reproducible across runs.
//!
//! # On-disk format
//!
//! One line per term, `\t`-separated:
//!
//! ```text
//! <term>\t<df>\t[[<doc_id>, <tf>, [<pos>, ...]], ...]
//! ```
//!
//! The loader parses this shape exactly and is permissive only about
//! encoding: non-decodable bytes are replaced before parsing.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::sorted;
use crate::types::Posting;

#[derive(Debug, Clone, PartialEq, Eq)]
struct TermEntry {
    df: u32,
    postings: Vec<Posting>,
}

/// term → (df, postings), the heart of the engine.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InvertedIndex {
    entries: BTreeMap<String, TermEntry>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `term` occurs `tf` times in `doc_id` at `positions`.
    ///
    /// The builder visits each document once, so a (term, doc) pair can
    /// never be registered twice; that precondition is asserted rather
    /// than handled.
    pub fn register_term(&mut self, term: &str, doc_id: u32, tf: u32, positions: Vec<u32>) {
        let posting = Posting::new(doc_id, tf, positions);

        match self.entries.get_mut(term) {
            Some(entry) => {
                debug_assert!(
                    entry.postings.iter().all(|p| p.doc_id != doc_id),
                    "doc {} registered twice for term {}",
                    doc_id,
                    term
                );
                sorted::insert_posting(posting, &mut entry.postings);
                entry.df += 1;
            }
            None => {
                self.entries.insert(
                    term.to_string(),
                    TermEntry {
                        df: 1,
                        postings: vec![posting],
                    },
                );
            }
        }
    }

    /// Postings for `term` in ascending doc-id order; empty if unknown.
    pub fn get_postings(&self, term: &str) -> &[Posting] {
        self.entries
            .get(term)
            .map(|entry| entry.postings.as_slice())
            .unwrap_or(&[])
    }

    /// Document frequency for `term`; 0 if unknown.
    pub fn get_df(&self, term: &str) -> u32 {
        self.entries.get(term).map(|entry| entry.df).unwrap_or(0)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate terms in lexicographic order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Fold another shard into this one. Shards are built from disjoint
    /// document sets, so postings heads never collide and the merge is a
    /// plain ordered union per term.
    pub fn merge(&mut self, other: InvertedIndex) {
        for (term, incoming) in other.entries {
            match self.entries.get_mut(&term) {
                Some(entry) => {
                    entry.postings = sorted::union_postings(&entry.postings, &incoming.postings);
                    entry.df = entry.postings.len() as u32;
                }
                None => {
                    self.entries.insert(term, incoming);
                }
            }
        }
    }

    /// Write the index as TSV, one term per line, terms ascending.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = fs::File::create(path)
            .map_err(|e| Error::IndexShape(format!("Failed to create {}: {}", path.display(), e)))?;
        let mut out = BufWriter::new(file);

        for (term, entry) in &self.entries {
            writeln!(
                out,
                "{}\t{}\t{}",
                term,
                entry.df,
                postings_literal(&entry.postings)
            )
            .map_err(|e| Error::IndexShape(format!("Failed to write {}: {}", path.display(), e)))?;
        }

        out.flush()
            .map_err(|e| Error::IndexShape(format!("Failed to write {}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Load an index previously written by [`InvertedIndex::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .map_err(|e| Error::IndexShape(format!("Failed to read {}: {}", path.display(), e)))?;
        let text = String::from_utf8_lossy(&bytes);

        let mut index = InvertedIndex::new();
        for (line_no, line) in text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }

            let mut fields = line.splitn(3, '\t');
            let (term, df, literal) = match (fields.next(), fields.next(), fields.next()) {
                (Some(t), Some(d), Some(p)) => (t, d, p),
                _ => {
                    return Err(malformed(path, line_no, "expected 3 tab-separated fields"));
                }
            };

            let df: u32 = df
                .parse()
                .map_err(|_| malformed(path, line_no, "df is not an integer"))?;
            let postings = parse_postings_literal(literal)
                .ok_or_else(|| malformed(path, line_no, "unparseable postings list"))?;

            index.entries.insert(term.to_string(), TermEntry { df, postings });
        }

        Ok(index)
    }
}

fn malformed(path: &Path, line_no: usize, what: &str) -> Error {
    Error::IndexShape(format!(
        "{}:{}: {}",
        path.display(),
        line_no + 1,
        what
    ))
}

/// Render a postings list as its textual literal:
/// `[[doc_id, tf, [pos, pos, ...]], ...]`.
fn postings_literal(postings: &[Posting]) -> String {
    let mut out = String::from("[");
    for (i, posting) in postings.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write!(out, "[{}, {}, [", posting.doc_id, posting.tf).unwrap();
        for (j, pos) in posting.positions.iter().enumerate() {
            if j > 0 {
                out.push_str(", ");
            }
            write!(out, "{}", pos).unwrap();
        }
        out.push_str("]]");
    }
    out.push(']');
    out
}

/// Parse the literal written by [`postings_literal`]: strip the outer
/// brackets, split sub-postings on `"], ["`, split each sub-posting on
/// `", "` at most twice, then strip and split the position list.
fn parse_postings_literal(literal: &str) -> Option<Vec<Posting>> {
    let body = literal.strip_prefix('[')?.strip_suffix(']')?;

    let mut postings = Vec::new();
    for piece in body.split("], [") {
        let piece = piece.strip_prefix('[').unwrap_or(piece);
        let piece = piece.strip_suffix(']').unwrap_or(piece);

        let mut fields = piece.splitn(3, ", ");
        let doc_id: u32 = fields.next()?.parse().ok()?;
        let tf: u32 = fields.next()?.parse().ok()?;
        let positions_literal = fields.next()?;

        // The closing bracket may have been eaten by the "], [" split.
        let positions_body = positions_literal.strip_prefix('[')?;
        let positions_body = positions_body.strip_suffix(']').unwrap_or(positions_body);

        let mut positions = Vec::new();
        for pos in positions_body.split(", ") {
            positions.push(pos.parse().ok()?);
        }

        if positions.len() != tf as usize {
            return None;
        }

        postings.push(Posting {
            doc_id,
            tf,
            positions,
        });
    }

    Some(postings)
}

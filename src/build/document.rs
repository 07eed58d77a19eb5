// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The per-document accumulator used during ingestion.
//!
//! A `Document` lives only inside the build: it collects term → positions
//! while the normalizer streams terms past, is consumed by the two index
//! passes, and is then dropped.

use std::collections::BTreeMap;

use crate::sorted;
use crate::tokenize;

/// A document mid-ingestion: its id, raw body, and accumulated terms.
#[derive(Debug, Clone)]
pub struct Document {
    doc_id: u32,
    body: String,
    terms: BTreeMap<String, Vec<u32>>,
}

impl Document {
    pub fn new(doc_id: u32, body: String) -> Self {
        Document {
            doc_id,
            body,
            terms: BTreeMap::new(),
        }
    }

    pub fn doc_id(&self) -> u32 {
        self.doc_id
    }

    /// Record that `term` occurs at `position`. Positions arrive in emission
    /// order and stay strictly increasing with no duplicates.
    pub fn add_term(&mut self, term: &str, position: u32) {
        match self.terms.get_mut(term) {
            Some(positions) => {
                sorted::insert_unique(position, positions);
            }
            None => {
                self.terms.insert(term.to_string(), vec![position]);
            }
        }
    }

    /// Tokenize and normalize the body, accumulating every emitted term with
    /// its position in the normalized stream.
    pub fn accumulate_terms(&mut self) {
        let terms = tokenize::normalize(&tokenize::tokenize(&self.body));
        for (position, term) in terms.iter().enumerate() {
            self.add_term(term, position as u32);
        }
    }

    /// term → positions, terms in lexicographic order.
    pub fn terms(&self) -> impl Iterator<Item = (&str, &[u32])> {
        self.terms
            .iter()
            .map(|(term, positions)| (term.as_str(), positions.as_slice()))
    }

    /// The largest term frequency in this document; 0 only when the body
    /// normalized to nothing.
    pub fn max_tf(&self) -> u32 {
        self.terms
            .values()
            .map(|positions| positions.len() as u32)
            .max()
            .unwrap_or(0)
    }
}

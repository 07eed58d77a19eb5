// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the ferret command-line interface.
//!
//! Two subcommands: `build` turns a JSON corpus into the pair of TSV
//! indexes, and `query` runs a ranked keyword/phrase query against a
//! previously built index directory.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ferret",
    about = "Positional inverted index with ranked boolean and phrase queries",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the inverted index and document index from a JSON corpus
    Build {
        /// JSON file: an array of objects with a document_id and text zones
        input: String,

        /// Existing directory to write inverted_index.tsv and document_index.tsv into
        index_dir: String,
    },

    /// Run a ranked query and print the top k documents
    Query {
        /// Directory containing the two TSV index files
        index_dir: String,

        /// Number of results to return (positive)
        k: usize,

        /// Query string: free keywords and colon-delimited phrases,
        /// e.g. 'james bond' or ':shaken not stirred:'
        query: String,

        /// Admit only documents that contain every phrase, instead of any
        #[arg(long)]
        all_phrases: bool,
    },
}

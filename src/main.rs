// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Ferret CLI: build and query positional TSV indexes.
//!
//! ```bash
//! # Build the two index files from a JSON corpus
//! ferret build data/corpus.json indexes/
//!
//! # Top-5 ranked query mixing keywords and a phrase
//! ferret query indexes/ 5 ":casino royale: james bond 007"
//! ```

use clap::Parser;

use ferret::build::run_build;
use ferret::search::{run_query, QueryOutcome};

mod cli;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, index_dir } => {
            if let Err(e) = run_build(&input, &index_dir) {
                eprintln!("An error prevented the creation of your index:\n{}", e);
                eprintln!("\nPlease ensure your input JSON file is correctly formatted");
                eprintln!("\nExample command:\n\tferret build data/input.json indexes/");
                std::process::exit(1);
            }
        }
        Commands::Query {
            index_dir,
            k,
            query,
            all_phrases,
        } => match run_query(&index_dir, k, &query, all_phrases) {
            Ok(outcome) => print_results(&outcome),
            Err(e) => {
                eprintln!("An error prevented the index from being queried:\n{}", e);
                eprintln!("\nPlease ensure your query is correctly formatted");
                eprintln!(
                    "\nExample usage:\n\tferret query indexes/ 5 \"Daniel Craig\"\n\tferret query indexes/ 10 \":shaken not stirred:\"\n\tferret query indexes/ 1 \":casino royale: james bond 007\""
                );
                std::process::exit(1);
            }
        },
    }
}

/// Print a query outcome in the fixed report format, scores descending.
fn print_results(outcome: &QueryOutcome) {
    println!("Documents considered: {}", outcome.pool_size);
    println!(
        "Documents with non-zero similarity score: {}",
        outcome.nonzero_count
    );
    println!("Doc ID\tScore");
    for (doc_id, score) in &outcome.ranked {
        println!("{}\t{}", doc_id, score);
    }
}

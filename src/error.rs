//! Error types for the build and query commands.
//!
//! Every failure is one of four kinds, and all of them propagate to the top
//! of the command where a single handler prints the message plus a usage
//! hint and exits non-zero. Nothing is retried, and a half-written index is
//! left where it fell.

use std::fmt;

/// Everything that can go wrong between the command line and an answer.
#[derive(Debug)]
pub enum Error {
    /// The input corpus is malformed: bad JSON, a document without an id,
    /// a duplicate id, or a document with no body zones.
    InputShape(String),
    /// The command arguments are malformed: a bad path, a non-positive k,
    /// or a query string that fails validation.
    ArgShape(String),
    /// A persisted index is missing or one of its lines does not parse.
    IndexShape(String),
    /// The query parsed but contains nothing to evaluate.
    Semantic(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InputShape(msg)
            | Error::ArgShape(msg)
            | Error::IndexShape(msg)
            | Error::Semantic(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

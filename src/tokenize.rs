//! Tokenization and normalization.
//!
//! Both sides of the engine go through this file: document bodies at build
//! time and every query token at query time. If the two pipelines ever
//! diverge, lookups silently miss, so there is exactly one implementation.
//!
//! The pipeline is: extract word-character runs (commas between digits are
//! deleted first, so "1,000" stays one token), casefold, expand a fixed
//! table of English contractions, then stem. One input token can come out
//! as zero, one, or several terms; positions are assigned over the output
//! sequence.

use rust_stemmers::{Algorithm, Stemmer};

/// Word characters: alphanumerics, underscore, and the apostrophe variants
/// accepted by the query grammar (U+2019, U+201A).
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\'' || c == '\u{2019}' || c == '\u{201A}'
}

/// Extract raw tokens from a string as maximal runs of word characters.
pub fn tokenize(text: &str) -> Vec<String> {
    let text = strip_digit_commas(text);

    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if is_word_char(c) {
            current.push(c);
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Delete commas that sit between two digits, so "10,000" tokenizes as one
/// run instead of two.
fn strip_digit_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        if c == ','
            && i > 0
            && i + 1 < chars.len()
            && chars[i - 1].is_ascii_digit()
            && chars[i + 1].is_ascii_digit()
        {
            continue;
        }
        out.push(c);
    }

    out
}

/// Normalize raw tokens into index terms: casefold, expand contractions,
/// stem. Tokens that normalize away entirely are dropped, which is why the
/// output can be shorter (or, with contractions, longer) than the input.
pub fn normalize(tokens: &[String]) -> Vec<String> {
    let stemmer = Stemmer::create(Algorithm::English);
    let mut terms = Vec::with_capacity(tokens.len());

    for token in tokens {
        let folded = token.to_lowercase();

        for part in expand_contraction(&folded) {
            let term = stemmer.stem(&part).into_owned();
            if !term.is_empty() {
                terms.push(term);
            }
        }
    }

    terms
}

/// Contraction rewrites applied in order, anywhere in the token. `can't`
/// and `won't` come first because the generic `n't` rule would mangle them.
const CONTRACTIONS: &[(&str, &str)] = &[
    ("can't", "can not"),
    ("won't", "will not"),
    ("'s", " is"),
    ("'ll", " will"),
    ("'re", " are"),
    ("n't", " not"),
    ("'d", " would"),
    ("'ve", " have"),
    ("'t", " not"),
    ("'m", " am"),
];

/// Expand contractions in a casefolded token.
///
/// Apostrophe variants are unified first. A token whose apostrophes sit
/// only at the edges (quoting, possessive plural) has them stripped rather
/// than expanded. Whatever the rewrite table cannot resolve loses its
/// apostrophe tail, so "fo'c'sle"-style inputs degrade to a stem instead
/// of leaking punctuation into the index.
fn expand_contraction(token: &str) -> Vec<String> {
    let mut token = token.replace(['\u{2019}', '\u{201A}'], "'");

    if !token.contains('\'') {
        return vec![token];
    }

    if apostrophes_only_at_edges(&token) {
        return vec![token.replace('\'', "")];
    }

    for (pattern, replacement) in CONTRACTIONS {
        token = token.replace(pattern, replacement);
    }

    let token = drop_apostrophe_tails(&token);

    token.split(' ').filter(|t| !t.is_empty()).map(String::from).collect()
}

/// True for tokens shaped like `'word`, `word'`, or `'word'`: at most one
/// apostrophe at each edge and none inside.
fn apostrophes_only_at_edges(token: &str) -> bool {
    let inner = token.strip_prefix('\'').unwrap_or(token);
    let inner = inner.strip_suffix('\'').unwrap_or(inner);
    !inner.is_empty() && inner.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Remove every apostrophe together with the word characters that follow it.
fn drop_apostrophe_tails(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut skipping = false;

    for c in token.chars() {
        if c == '\'' {
            skipping = true;
        } else if skipping && (c.is_alphanumeric() || c == '_') {
            continue;
        } else {
            skipping = false;
            out.push(c);
        }
    }

    out
}

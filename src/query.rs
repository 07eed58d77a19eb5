//! Query parsing: split a raw query string into keywords and phrases.
//!
//! Tokens are whitespace-separated and colons delimit phrases: `:WORD`
//! opens one, `WORD:` closes one, `:WORD:` is a single-word phrase, and a
//! bare `WORD` is a keyword (or a phrase member while a phrase is open).
//! Anything else is a validation error, and validation happens before the
//! index is ever touched.
//!
//! After parsing, every token runs through the same normalization pipeline
//! the builder used. Normalization can split a token (contractions) or
//! erase it entirely, so phrase lengths may change; grouping is preserved.

use crate::error::{Error, Result};
use crate::tokenize;

/// A validated, normalized query: flat keywords plus ordered phrases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub keywords: Vec<String>,
    pub phrases: Vec<Vec<String>>,
}

impl ParsedQuery {
    pub fn has_phrases(&self) -> bool {
        !self.phrases.is_empty()
    }
}

/// Validate and split a raw query, then normalize every token.
pub fn parse_query(raw: &str) -> Result<ParsedQuery> {
    let split = split_query(raw)?;
    Ok(normalize_query(split))
}

/// The four token shapes of the query grammar.
enum TokenShape<'a> {
    Word(&'a str),
    PhraseOpen(&'a str),
    PhraseClose(&'a str),
    SingleWordPhrase(&'a str),
}

fn classify(token: &str) -> Option<TokenShape<'_>> {
    let open = token.starts_with(':');
    let close = token.ends_with(':') && token.len() > 1;

    let body = match (open, close) {
        (true, true) => &token[1..token.len() - 1],
        (true, false) => &token[1..],
        (false, true) => &token[..token.len() - 1],
        (false, false) => token,
    };

    if body.is_empty() || !body.chars().all(tokenize::is_word_char) {
        return None;
    }

    Some(match (open, close) {
        (true, true) => TokenShape::SingleWordPhrase(body),
        (true, false) => TokenShape::PhraseOpen(body),
        (false, true) => TokenShape::PhraseClose(body),
        (false, false) => TokenShape::Word(body),
    })
}

/// Split into raw keywords and phrases, enforcing the colon discipline.
fn split_query(raw: &str) -> Result<ParsedQuery> {
    let mut keywords = Vec::new();
    let mut phrases: Vec<Vec<String>> = Vec::new();
    let mut open_phrase: Option<Vec<String>> = None;

    for token in raw.split_whitespace() {
        let shape = classify(token).ok_or_else(|| {
            Error::ArgShape(format!(
                "Token {} is not recognized. Please do not use special characters",
                token
            ))
        })?;

        match shape {
            TokenShape::Word(word) => match open_phrase.as_mut() {
                Some(phrase) => phrase.push(word.to_string()),
                None => keywords.push(word.to_string()),
            },
            TokenShape::PhraseOpen(word) => {
                if open_phrase.is_some() {
                    return Err(Error::ArgShape(
                        "Check colons in query. You cannot have a phrase begin within another phrase"
                            .to_string(),
                    ));
                }
                open_phrase = Some(vec![word.to_string()]);
            }
            TokenShape::PhraseClose(word) => match open_phrase.take() {
                Some(mut phrase) => {
                    phrase.push(word.to_string());
                    phrases.push(phrase);
                }
                None => {
                    return Err(Error::ArgShape(
                        "Check colons in query. You cannot have a phrase end if one has not begun"
                            .to_string(),
                    ));
                }
            },
            TokenShape::SingleWordPhrase(word) => {
                if open_phrase.is_some() {
                    return Err(Error::ArgShape(
                        "Check colons in query. You cannot have a phrase begin within another phrase"
                            .to_string(),
                    ));
                }
                phrases.push(vec![word.to_string()]);
            }
        }
    }

    if open_phrase.is_some() {
        return Err(Error::ArgShape("Phrase must be enclosed by colons".to_string()));
    }

    Ok(ParsedQuery { keywords, phrases })
}

/// Normalize keywords and phrase members with the build-time pipeline,
/// preserving phrase grouping. Phrases that normalize to nothing are
/// dropped; whether anything survived at all is the evaluator's check.
fn normalize_query(query: ParsedQuery) -> ParsedQuery {
    let keywords = tokenize::normalize(&query.keywords);

    let phrases = query
        .phrases
        .into_iter()
        .map(|phrase| tokenize::normalize(&phrase))
        .filter(|phrase| !phrase.is_empty())
        .collect();

    ParsedQuery { keywords, phrases }
}

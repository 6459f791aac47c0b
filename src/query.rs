//! Query validation and keyword refinement.

use std::fmt;
use thiserror::Error;

/// Minimum query length in characters after trimming.
pub const MIN_QUERY_CHARS: usize = 2;

/// Why a query was rejected before any request was made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("query must be at least {min} characters, got {got}")]
    TooShort { min: usize, got: usize },
}

/// A validated, trimmed search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Trims the raw text and checks the length bound.
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let trimmed = raw.trim();
        let got = trimmed.chars().count();

        if got < MIN_QUERY_CHARS {
            return Err(QueryError::TooShort { min: MIN_QUERY_CHARS, got });
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns the query text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a query with intent words mapped to search keywords.
    pub fn refined(&self) -> Self {
        Self(refine(&self.0))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Intent rules: any trigger phrase adds the keyword, in rule order.
const INTENTS: &[(&[&str], &str)] = &[
    (&["наушники", "earbuds", "earphones"], "наушники"),
    (&["беспроводные", "wireless", "bluetooth"], "беспроводные"),
    (&["для бега", "спортивные", "водонепроницаемые", "водозащитные"], "водонепроницаемые"),
    (&["недорогие", "дешёвые", "бюджетные"], "до 3000"),
    (&["с лучшими отзывами", "популярные", "топ"], "популярные"),
];

/// Keyword used when nothing meaningful is left of the message.
const FALLBACK_KEYWORD: &str = "товары";

/// Turns a conversational message into a compact search string.
///
/// "Ищу недорогие наушники для бега" becomes
/// "наушники водонепроницаемые до 3000". Messages without known intents
/// keep only their words longer than three characters.
pub fn refine(message: &str) -> String {
    let lowered = message.to_lowercase();

    let keywords: Vec<&str> = INTENTS
        .iter()
        .filter(|(triggers, _)| triggers.iter().any(|t| lowered.contains(t)))
        .map(|(_, keyword)| *keyword)
        .collect();

    if !keywords.is_empty() {
        return keywords.join(" ");
    }

    let words: Vec<&str> = lowered.split_whitespace().filter(|w| w.chars().count() > 3).collect();

    if words.is_empty() {
        FALLBACK_KEYWORD.to_string()
    } else {
        words.join(" ")
    }
}

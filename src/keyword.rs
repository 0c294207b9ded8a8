//! Naive keyword scorer.
//!
//! The query is lower-cased, split on whitespace and filtered through a
//! stop-word set. Each surviving token adds one point to a document when it
//! occurs anywhere in the lower-cased document text. Presence counts, not
//! frequency.

use serde::Serialize;
use std::collections::HashSet;

use crate::corpus::DocumentStore;

/// Default stop words excluded from keyword queries.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "an", "the", "in", "on", "of", "and", "is", "to", "with", "for", "it", "that", "this",
    "by", "at",
];

/// Case-insensitive set of words ignored during query tokenization.
///
/// Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopWordSet {
    words: HashSet<String>,
}

impl StopWordSet {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Check membership. `word` is compared case-insensitively.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopWordSet {
    fn default() -> Self {
        Self::new(DEFAULT_STOP_WORDS)
    }
}

/// Result of splitting a query into searchable tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTokens {
    /// Empty or whitespace-only query
    Empty,
    /// Every token was a stop word
    OnlyStopWords,
    /// Lower-cased tokens in query order, duplicates kept
    Tokens(Vec<String>),
}

/// Lower-case, split on whitespace, drop stop words.
pub fn tokenize(query: &str, stop_words: &StopWordSet) -> QueryTokens {
    let lowered = query.trim().to_lowercase();
    if lowered.is_empty() {
        return QueryTokens::Empty;
    }

    let tokens: Vec<String> = lowered
        .split_whitespace()
        .filter(|w| !stop_words.contains(w))
        .map(str::to_string)
        .collect();

    if tokens.is_empty() {
        QueryTokens::OnlyStopWords
    } else {
        QueryTokens::Tokens(tokens)
    }
}

/// Keyword relevance of one document for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredCandidate {
    pub index: usize,
    pub text: String,
    pub score: u32,
}

/// Output of a keyword scoring pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordScores {
    /// No query was given, nothing scored
    EmptyQuery,
    /// The query held only stop words, nothing scored
    OnlyStopWords,
    /// One candidate per document, in store order
    Scored(Vec<ScoredCandidate>),
}

/// Scores documents by query-token presence.
#[derive(Debug, Clone, Default)]
pub struct KeywordScorer {
    stop_words: StopWordSet,
}

impl KeywordScorer {
    pub fn new(stop_words: StopWordSet) -> Self {
        Self { stop_words }
    }

    /// Score every document in `store` against `query`.
    pub fn score(&self, query: &str, store: &DocumentStore) -> KeywordScores {
        let tokens = match tokenize(query, &self.stop_words) {
            QueryTokens::Empty => return KeywordScores::EmptyQuery,
            QueryTokens::OnlyStopWords => return KeywordScores::OnlyStopWords,
            QueryTokens::Tokens(tokens) => tokens,
        };

        let candidates = store
            .iter()
            .map(|doc| ScoredCandidate {
                index: doc.index,
                text: doc.text.clone(),
                score: score_text(&doc.text, &tokens),
            })
            .collect();

        KeywordScores::Scored(candidates)
    }
}

/// Count how many tokens occur as substrings of `text`, ignoring case.
pub fn score_text(text: &str, tokens: &[String]) -> u32 {
    let lowered = text.to_lowercase();
    tokens
        .iter()
        .filter(|token| lowered.contains(token.as_str()))
        .count() as u32
}

//! Ranking and threshold policy shared by both backends.
//!
//! Candidates are sorted by descending score, ties broken by ascending
//! document index. The walk stops at the result cap or at the first
//! candidate that fails the backend's acceptance rule, whichever comes first.
//! Results are never padded.

use serde::Serialize;
use std::cmp::Ordering;

use crate::keyword::ScoredCandidate;
use crate::semantic::SemanticHit;

/// Score attached to a ranked result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Score {
    /// Number of query tokens present in the document
    Matches(u32),
    /// `1 - distance` reported by the semantic backend
    Similarity(f32),
}

impl Score {
    /// The raw number, for threshold checks and plain-text reports.
    pub fn value(&self) -> f32 {
        match self {
            Self::Matches(n) => *n as f32,
            Self::Similarity(s) => *s,
        }
    }
}

/// One accepted entry, 1-based rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub rank: usize,
    pub index: usize,
    pub text: String,
    pub score: Score,
}

/// Why a search produced nothing to show.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NoResultsReason {
    EmptyQuery,
    OnlyStopWords,
    EmptyCorpus,
    /// Nothing matched at all
    NoMatches,
    /// Candidates existed but the best one fell under the cutoff
    BelowThreshold { best: f32, threshold: f32 },
}

/// Outcome of ranking one backend's candidates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    Results { results: Vec<RankedResult> },
    NoResults { reason: NoResultsReason },
}

impl SearchOutcome {
    pub fn no_results(reason: NoResultsReason) -> Self {
        Self::NoResults { reason }
    }

    fn from_results(results: Vec<RankedResult>, otherwise: NoResultsReason) -> Self {
        if results.is_empty() {
            Self::NoResults { reason: otherwise }
        } else {
            Self::Results { results }
        }
    }

    /// Accepted results, empty when there were none.
    pub fn results(&self) -> &[RankedResult] {
        match self {
            Self::Results { results } => results,
            Self::NoResults { .. } => &[],
        }
    }

    pub fn reason(&self) -> Option<NoResultsReason> {
        match self {
            Self::Results { .. } => None,
            Self::NoResults { reason } => Some(*reason),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results().is_empty()
    }
}

/// Rank keyword candidates, keeping at most `limit` with a non-zero score.
pub fn rank_keyword(mut candidates: Vec<ScoredCandidate>, limit: usize) -> SearchOutcome {
    if candidates.is_empty() {
        return SearchOutcome::no_results(NoResultsReason::EmptyCorpus);
    }

    candidates.sort_by(|a, b| b.score.cmp(&a.score).then(a.index.cmp(&b.index)));

    let results = candidates
        .into_iter()
        .take(limit)
        .take_while(|c| c.score > 0)
        .enumerate()
        .map(|(i, c)| RankedResult {
            rank: i + 1,
            index: c.index,
            text: c.text,
            score: Score::Matches(c.score),
        })
        .collect();

    SearchOutcome::from_results(results, NoResultsReason::NoMatches)
}

/// Rank semantic hits, keeping at most `limit` with similarity `>= threshold`.
pub fn rank_semantic(hits: Vec<SemanticHit>, limit: usize, threshold: f32) -> SearchOutcome {
    let mut scored: Vec<(f32, SemanticHit)> =
        hits.into_iter().map(|h| (h.similarity(), h)).collect();

    scored.sort_by(|(sa, a), (sb, b)| compare_similarity(*sa, *sb).then(a.index.cmp(&b.index)));

    let Some(best) = scored.first().map(|(s, _)| *s) else {
        return SearchOutcome::no_results(NoResultsReason::NoMatches);
    };

    let results = scored
        .into_iter()
        .take(limit)
        .take_while(|(similarity, _)| *similarity >= threshold)
        .enumerate()
        .map(|(i, (similarity, hit))| RankedResult {
            rank: i + 1,
            index: hit.index,
            text: hit.text,
            score: Score::Similarity(similarity),
        })
        .collect();

    SearchOutcome::from_results(results, NoResultsReason::BelowThreshold { best, threshold })
}

/// Descending order for similarities.
fn compare_similarity(a: f32, b: f32) -> Ordering {
    b.total_cmp(&a)
}

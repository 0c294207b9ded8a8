//! Markdown rendering of search outcomes.
//!
//! Rendering is a thin layer over [`SearchOutcome`]. Nothing here decides
//! which results are shown.

use crate::ranking::{NoResultsReason, RankedResult, Score, SearchOutcome};

/// Which backend an outcome came from. Only affects wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Semantic,
    Keyword,
}

/// Render semantic results as markdown.
pub fn render_semantic(outcome: &SearchOutcome) -> String {
    render(outcome, Side::Semantic)
}

/// Render keyword results as markdown.
pub fn render_keyword(outcome: &SearchOutcome) -> String {
    render(outcome, Side::Keyword)
}

pub fn render(outcome: &SearchOutcome, side: Side) -> String {
    match outcome {
        SearchOutcome::Results { results } => results
            .iter()
            .map(render_result)
            .collect::<Vec<_>>()
            .join("\n\n"),
        SearchOutcome::NoResults { reason } => no_results_message(*reason, side),
    }
}

/// One result block: heading with rank and score, then the quoted text.
pub fn render_result(result: &RankedResult) -> String {
    format!(
        "### Result {} ({})\n>{}",
        result.rank,
        format_score(&result.score),
        result.text
    )
}

/// `Similarity: 0.8123` or `Matches: 2`.
pub fn format_score(score: &Score) -> String {
    match score {
        Score::Similarity(s) => format!("Similarity: {s:.4}"),
        Score::Matches(n) => format!("Matches: {n}"),
    }
}

/// User-facing explanation for an empty outcome.
///
/// The keyword column stays blank for an empty query so the prompt is only
/// shown once in side-by-side views.
pub fn no_results_message(reason: NoResultsReason, side: Side) -> String {
    match (reason, side) {
        (NoResultsReason::EmptyQuery, Side::Semantic) => "Please enter a query.".to_string(),
        (NoResultsReason::EmptyQuery, Side::Keyword) => String::new(),
        (NoResultsReason::OnlyStopWords, _) => "Query contains only stop words.".to_string(),
        (NoResultsReason::EmptyCorpus, _) => "No documents loaded.".to_string(),
        (NoResultsReason::NoMatches, Side::Keyword) => "No keyword matches found.".to_string(),
        (NoResultsReason::NoMatches, Side::Semantic) => "No semantic matches found.".to_string(),
        (NoResultsReason::BelowThreshold { best, threshold }, _) => format!(
            "No results found with similarity >= {:.0}%. (best match: {best:.4})",
            threshold * 100.0
        ),
    }
}

/// Message shown in place of results when the semantic backend failed.
pub fn render_backend_failure(message: &str) -> String {
    format!("Semantic search unavailable: {message}")
}

/// First `max_chars` characters of `text`, cut on a char boundary.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(rank: usize, text: &str, score: Score) -> RankedResult {
        RankedResult {
            rank,
            index: rank - 1,
            text: text.to_string(),
            score,
        }
    }

    #[test]
    fn test_semantic_result_block() {
        let outcome = SearchOutcome::Results {
            results: vec![
                result(1, "Bread is baked.", Score::Similarity(0.81234)),
                result(2, "Pasta dough.", Score::Similarity(0.5)),
            ],
        };
        assert_eq!(
            render_semantic(&outcome),
            "### Result 1 (Similarity: 0.8123)\n>Bread is baked.\n\n### Result 2 (Similarity: 0.5000)\n>Pasta dough."
        );
    }

    #[test]
    fn test_keyword_result_block() {
        let outcome = SearchOutcome::Results {
            results: vec![result(1, "Bread is baked.", Score::Matches(1))],
        };
        assert_eq!(
            render_keyword(&outcome),
            "### Result 1 (Matches: 1)\n>Bread is baked."
        );
    }

    #[test]
    fn test_messages_name_the_cause() {
        let stop = SearchOutcome::no_results(NoResultsReason::OnlyStopWords);
        assert_eq!(render_keyword(&stop), "Query contains only stop words.");

        let none = SearchOutcome::no_results(NoResultsReason::NoMatches);
        assert_eq!(render_keyword(&none), "No keyword matches found.");
        assert_eq!(render_semantic(&none), "No semantic matches found.");

        let empty = SearchOutcome::no_results(NoResultsReason::EmptyQuery);
        assert_eq!(render_semantic(&empty), "Please enter a query.");
        assert_eq!(render_keyword(&empty), "");
    }

    #[test]
    fn test_below_threshold_message() {
        let outcome = SearchOutcome::no_results(NoResultsReason::BelowThreshold {
            best: 0.25,
            threshold: 0.3,
        });
        assert_eq!(
            render_semantic(&outcome),
            "No results found with similarity >= 30%. (best match: 0.2500)"
        );
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(preview("hello", 10), "hello");
        assert_eq!(preview("hello", 3), "hel");
        assert_eq!(preview("héllo wörld", 5), "héllo");
        assert_eq!(preview("", 5), "");
    }
}

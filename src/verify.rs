//! Console verification harness.
//!
//! Runs a fixed list of example queries and prints, for each one, the best
//! semantic hit annotated against the verification threshold and the best
//! keyword hit. This is a smoke test, not an API.

use serde::Serialize;
use std::io::Write;

use crate::compare::SearchContext;
use crate::display::{format_score, preview};
use crate::ranking::{NoResultsReason, RankedResult, SearchOutcome};

/// Example queries used when none are given.
pub const DEFAULT_QUERIES: &[&str] = &["neural networks", "making bread", "soccer", "playing a sport"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerifyOptions {
    /// Similarity under which the top hit is flagged
    pub threshold: f32,
    /// Characters of document text to print
    pub preview_chars: usize,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            threshold: crate::semantic::thresholds::VERIFY,
            preview_chars: 100,
        }
    }
}

/// Best semantic hit for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SemanticCheck {
    Top {
        result: RankedResult,
        similarity: f32,
        passes: bool,
    },
    Empty { reason: NoResultsReason },
    Failed { message: String },
}

/// Verification result for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryCheck {
    pub query: String,
    pub semantic: SemanticCheck,
    pub keyword: SearchOutcome,
}

/// Totals over a verification run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VerifySummary {
    pub queries: usize,
    pub above_threshold: usize,
    pub below_threshold: usize,
    pub semantic_failures: usize,
    pub keyword_hits: usize,
}

/// Check one query against both backends.
pub fn check_query(ctx: &SearchContext, query: &str, options: &VerifyOptions) -> QueryCheck {
    // Fetch the top hit unfiltered, then annotate against the threshold
    let semantic = match ctx.search_semantic(query, 1, f32::NEG_INFINITY) {
        Ok(SearchOutcome::Results { mut results }) => {
            let result = results.remove(0);
            let similarity = result.score.value();
            SemanticCheck::Top {
                result,
                similarity,
                passes: similarity >= options.threshold,
            }
        }
        Ok(SearchOutcome::NoResults { reason }) => SemanticCheck::Empty { reason },
        Err(e) => SemanticCheck::Failed {
            message: e.to_string(),
        },
    };

    QueryCheck {
        query: query.trim().to_string(),
        semantic,
        keyword: ctx.search_keyword(query, 1),
    }
}

/// Run every query and print the report to `out`.
pub fn run<W: Write>(
    ctx: &SearchContext,
    queries: &[String],
    options: &VerifyOptions,
    out: &mut W,
) -> std::io::Result<VerifySummary> {
    let mut summary = VerifySummary::default();

    writeln!(out, "--- COMPARISON ---")?;
    for query in queries {
        let check = check_query(ctx, query, options);
        write_check(&check, options, out)?;

        summary.queries += 1;
        match &check.semantic {
            SemanticCheck::Top { passes: true, .. } => summary.above_threshold += 1,
            SemanticCheck::Top { passes: false, .. } | SemanticCheck::Empty { .. } => {
                summary.below_threshold += 1
            }
            SemanticCheck::Failed { .. } => summary.semantic_failures += 1,
        }
        if !check.keyword.is_empty() {
            summary.keyword_hits += 1;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "{} queries: {} above threshold, {} below, {} failed, {} with keyword matches",
        summary.queries,
        summary.above_threshold,
        summary.below_threshold,
        summary.semantic_failures,
        summary.keyword_hits
    )?;

    crate::log_event!("verify", "done", "{} queries", summary.queries);
    Ok(summary)
}

/// Print one query's report block.
pub fn write_check<W: Write>(
    check: &QueryCheck,
    options: &VerifyOptions,
    out: &mut W,
) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Query: {}", check.query)?;
    writeln!(out)?;
    writeln!(out, "Query: '{}'", check.query)?;

    match &check.semantic {
        SemanticCheck::Top {
            result,
            similarity,
            passes,
        } => {
            let flag = if *passes { "" } else { " [BELOW THRESHOLD]" };
            writeln!(
                out,
                "Top Result (Sim: {similarity:.4}){flag}: {}...",
                preview(&result.text, options.preview_chars)
            )?;
        }
        SemanticCheck::Empty { reason } => {
            writeln!(out, "Semantic: {}", empty_message(*reason))?;
        }
        SemanticCheck::Failed { message } => {
            writeln!(out, "Semantic search failed: {message}")?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Keyword Search for: '{}'", check.query)?;
    match &check.keyword {
        SearchOutcome::Results { results } => {
            let top = &results[0];
            writeln!(
                out,
                "Top Result ({}): {}...",
                format_score(&top.score),
                preview(&top.text, options.preview_chars)
            )?;
        }
        SearchOutcome::NoResults { reason } => writeln!(out, "{}", empty_message(*reason))?,
    }
    Ok(())
}

fn empty_message(reason: NoResultsReason) -> &'static str {
    match reason {
        NoResultsReason::EmptyQuery => "Please enter a query.",
        NoResultsReason::OnlyStopWords => "Query contains only stop words.",
        NoResultsReason::EmptyCorpus => "No documents loaded.",
        NoResultsReason::NoMatches | NoResultsReason::BelowThreshold { .. } => "No matches found.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::DocumentStore;
    use crate::error::{BackendError, BackendResult};
    use crate::keyword::StopWordSet;
    use crate::semantic::{SemanticBackend, SemanticHit};
    use std::sync::Arc;

    /// Returns the document whose text contains the first query word, at a fixed distance.
    struct WordBackend {
        store: DocumentStore,
        distance: f32,
    }

    impl SemanticBackend for WordBackend {
        fn search(&self, query: &str, limit: usize) -> BackendResult<Vec<SemanticHit>> {
            if query.contains("explode") {
                return Err(BackendError::Embedding("boom".to_string()));
            }
            let word = query.split_whitespace().next().unwrap_or_default();
            Ok(self
                .store
                .iter()
                .filter(|d| d.text.to_lowercase().contains(word))
                .take(limit)
                .map(|d| SemanticHit {
                    index: d.index,
                    text: d.text.clone(),
                    distance: self.distance,
                })
                .collect())
        }

        fn name(&self) -> &str {
            "word"
        }
    }

    fn context(distance: f32) -> SearchContext {
        let store = DocumentStore::new([
            "Neural networks are a type of machine learning model.",
            "Bread is baked in an oven.",
        ]);
        let backend = WordBackend {
            store: store.clone(),
            distance,
        };
        SearchContext::new(store, StopWordSet::default(), Arc::new(backend))
    }

    fn report(ctx: &SearchContext, queries: &[&str], options: &VerifyOptions) -> (String, VerifySummary) {
        let queries: Vec<String> = queries.iter().map(|q| q.to_string()).collect();
        let mut out = Vec::new();
        let summary = run(ctx, &queries, options, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn test_top_result_above_threshold() {
        let (text, summary) = report(&context(0.25), &["neural networks"], &VerifyOptions::default());
        assert!(text.contains("Query: 'neural networks'"));
        assert!(text.contains(
            "Top Result (Sim: 0.7500): Neural networks are a type of machine learning model...."
        ));
        assert!(text.contains("Top Result (Matches: 2): Neural networks"));
        assert_eq!(summary.above_threshold, 1);
        assert_eq!(summary.keyword_hits, 1);
    }

    #[test]
    fn test_query_block_layout() {
        let (text, _) = report(&context(0.25), &["bread"], &VerifyOptions::default());
        assert!(text.contains(
            "\nQuery: bread\n\nQuery: 'bread'\nTop Result (Sim: 0.7500): Bread is baked in an oven....\n\nKeyword Search for: 'bread'\n"
        ));
    }

    #[test]
    fn test_below_threshold_is_annotated() {
        let (text, summary) = report(&context(0.75), &["bread"], &VerifyOptions::default());
        assert!(text.contains("Top Result (Sim: 0.2500) [BELOW THRESHOLD]: Bread is baked"));
        assert_eq!(summary.below_threshold, 1);
    }

    #[test]
    fn test_preview_truncates() {
        let options = VerifyOptions {
            preview_chars: 5,
            ..VerifyOptions::default()
        };
        let (text, _) = report(&context(0.0), &["bread"], &options);
        assert!(text.contains("Top Result (Sim: 1.0000): Bread..."));
        assert!(text.contains("Top Result (Matches: 1): Bread..."));
    }

    #[test]
    fn test_stop_words_and_no_matches() {
        let (text, summary) = report(&context(0.0), &["the is a", "zebra"], &VerifyOptions::default());
        assert!(text.contains("Query contains only stop words."));
        assert!(text.contains("No matches found."));
        assert_eq!(summary.queries, 2);
        assert_eq!(summary.keyword_hits, 0);
    }

    #[test]
    fn test_failure_does_not_stop_the_run() {
        let (text, summary) =
            report(&context(0.0), &["explode bread", "bread"], &VerifyOptions::default());
        assert!(text.contains("Semantic search failed"));
        assert_eq!(summary.semantic_failures, 1);
        assert_eq!(summary.above_threshold, 1);
        // Keyword side still ran for the failing query
        assert_eq!(summary.keyword_hits, 2);
    }
}

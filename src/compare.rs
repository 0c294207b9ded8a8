//! Comparison orchestrator.
//!
//! A [`SearchContext`] is built once at startup from the corpus, the stop-word
//! set and a semantic backend, then shared read-only by every query. Each
//! comparison runs the two backends independently: a semantic failure is
//! reported as a value and never touches the keyword side.

use serde::Serialize;
use std::sync::Arc;

use crate::corpus::DocumentStore;
use crate::display;
use crate::error::BackendResult;
use crate::keyword::{KeywordScorer, KeywordScores, StopWordSet};
use crate::ranking::{NoResultsReason, SearchOutcome, rank_keyword, rank_semantic};
use crate::semantic::{SemanticBackend, thresholds};

/// Per-call knobs for a comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompareOptions {
    pub limit: usize,
    pub threshold: f32,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            limit: 3,
            threshold: thresholds::INTERACTIVE,
        }
    }
}

/// Semantic side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SemanticOutcome {
    Ok { outcome: SearchOutcome },
    Failed { message: String },
}

impl SemanticOutcome {
    pub fn outcome(&self) -> Option<&SearchOutcome> {
        match self {
            Self::Ok { outcome } => Some(outcome),
            Self::Failed { .. } => None,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::Ok { outcome } => display::render_semantic(outcome),
            Self::Failed { message } => display::render_backend_failure(message),
        }
    }
}

impl From<BackendResult<SearchOutcome>> for SemanticOutcome {
    fn from(result: BackendResult<SearchOutcome>) -> Self {
        match result {
            Ok(outcome) => Self::Ok { outcome },
            Err(e) => Self::Failed {
                message: e.to_string(),
            },
        }
    }
}

/// Both backends' answers to one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub query: String,
    pub semantic: SemanticOutcome,
    pub keyword: SearchOutcome,
}

impl Comparison {
    /// `(semantic, keyword)` markdown, ready for display.
    pub fn render(&self) -> (String, String) {
        (
            self.semantic.render(),
            display::render_keyword(&self.keyword),
        )
    }
}

/// Immutable search state shared by every query.
#[derive(Clone)]
pub struct SearchContext {
    store: Arc<DocumentStore>,
    scorer: KeywordScorer,
    backend: Arc<dyn SemanticBackend>,
}

impl SearchContext {
    pub fn new(
        store: DocumentStore,
        stop_words: StopWordSet,
        backend: Arc<dyn SemanticBackend>,
    ) -> Self {
        Self {
            store: Arc::new(store),
            scorer: KeywordScorer::new(stop_words),
            backend,
        }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Keyword search. Never fails.
    pub fn search_keyword(&self, query: &str, limit: usize) -> SearchOutcome {
        match self.scorer.score(query, &self.store) {
            KeywordScores::EmptyQuery => SearchOutcome::no_results(NoResultsReason::EmptyQuery),
            KeywordScores::OnlyStopWords => {
                SearchOutcome::no_results(NoResultsReason::OnlyStopWords)
            }
            KeywordScores::Scored(candidates) => rank_keyword(candidates, limit),
        }
    }

    /// Semantic search with a caller-supplied similarity cutoff.
    ///
    /// Empty queries and empty corpora return without calling the backend.
    pub fn search_semantic(
        &self,
        query: &str,
        limit: usize,
        threshold: f32,
    ) -> BackendResult<SearchOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchOutcome::no_results(NoResultsReason::EmptyQuery));
        }
        if self.store.is_empty() {
            return Ok(SearchOutcome::no_results(NoResultsReason::EmptyCorpus));
        }

        let limit = limit.min(self.store.len());
        let hits = self.backend.search(query, limit)?;
        Ok(rank_semantic(hits, limit, threshold))
    }

    /// Run both backends on one query.
    pub fn compare(&self, query: &str, options: &CompareOptions) -> Comparison {
        let query = query.trim();

        let semantic: SemanticOutcome = self
            .search_semantic(query, options.limit, options.threshold)
            .inspect_err(|e| {
                tracing::warn!(target: "compare", "semantic backend failed for '{query}': {e}")
            })
            .into();
        let keyword = self.search_keyword(query, options.limit);

        crate::debug_event!(
            "compare",
            "done",
            "'{query}': semantic={}, keyword={}",
            semantic.outcome().map_or(0, |o| o.results().len()),
            keyword.results().len()
        );

        Comparison {
            query: query.to_string(),
            semantic,
            keyword,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;
    use crate::semantic::{EmbeddingBackend, MockEmbeddingGenerator, SemanticHit};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend returning fixed distances per document index.
    struct FixedBackend {
        distances: Vec<f32>,
        store: DocumentStore,
        calls: AtomicUsize,
        fail: bool,
    }

    impl FixedBackend {
        fn new(store: &DocumentStore, distances: Vec<f32>) -> Self {
            Self {
                distances,
                store: store.clone(),
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }
    }

    impl SemanticBackend for FixedBackend {
        fn search(&self, _query: &str, limit: usize) -> BackendResult<Vec<SemanticHit>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(BackendError::Embedding("service down".to_string()));
            }
            let mut hits: Vec<SemanticHit> = self
                .store
                .iter()
                .map(|d| SemanticHit {
                    index: d.index,
                    text: d.text.clone(),
                    distance: self.distances[d.index],
                })
                .collect();
            hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
            hits.truncate(limit);
            Ok(hits)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn corpus() -> DocumentStore {
        DocumentStore::new([
            "Soccer is a popular sport.",
            "Bread is baked in an oven.",
            "Neural networks are a type of model.",
        ])
    }

    fn context(backend: Arc<FixedBackend>) -> SearchContext {
        SearchContext::new(corpus(), StopWordSet::default(), backend)
    }

    #[test]
    fn test_compare_runs_both_backends() {
        let backend = Arc::new(FixedBackend::new(&corpus(), vec![0.9, 0.25, 0.75]));
        let ctx = context(backend.clone());

        let cmp = ctx.compare("  bread  ", &CompareOptions::default());
        assert_eq!(cmp.query, "bread");

        let semantic = cmp.semantic.outcome().unwrap();
        assert_eq!(semantic.results().len(), 1);
        assert_eq!(semantic.results()[0].index, 1);

        assert_eq!(cmp.keyword.results().len(), 1);
        assert_eq!(cmp.keyword.results()[0].index, 1);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_query_skips_backend() {
        let backend = Arc::new(FixedBackend::new(&corpus(), vec![0.0, 0.0, 0.0]));
        let ctx = context(backend.clone());

        let cmp = ctx.compare("   ", &CompareOptions::default());
        assert_eq!(
            cmp.semantic.outcome().unwrap().reason(),
            Some(NoResultsReason::EmptyQuery)
        );
        assert_eq!(cmp.keyword.reason(), Some(NoResultsReason::EmptyQuery));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_stop_words_only_still_runs_semantic() {
        let backend = Arc::new(FixedBackend::new(&corpus(), vec![0.5, 0.5, 0.5]));
        let ctx = context(backend.clone());

        let cmp = ctx.compare("the is a", &CompareOptions::default());
        assert_eq!(cmp.keyword.reason(), Some(NoResultsReason::OnlyStopWords));
        assert_eq!(cmp.semantic.outcome().unwrap().results().len(), 3);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backend_failure_does_not_block_keyword() {
        let mut backend = FixedBackend::new(&corpus(), vec![0.0, 0.0, 0.0]);
        backend.fail = true;
        let ctx = context(Arc::new(backend));

        let cmp = ctx.compare("bread", &CompareOptions::default());
        match &cmp.semantic {
            SemanticOutcome::Failed { message } => assert!(message.contains("service down")),
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(cmp.keyword.results().len(), 1);

        let (semantic, keyword) = cmp.render();
        assert!(semantic.starts_with("Semantic search unavailable"));
        assert_eq!(keyword, "### Result 1 (Matches: 1)\n>Bread is baked in an oven.");
    }

    #[test]
    fn test_limit_is_capped_by_corpus_size() {
        let backend = Arc::new(FixedBackend::new(&corpus(), vec![0.1, 0.2, 0.3]));
        let ctx = context(backend);
        let outcome = ctx.search_semantic("anything", 10, 0.0).unwrap();
        assert_eq!(outcome.results().len(), 3);
    }

    #[test]
    fn test_empty_corpus() {
        let backend = Arc::new(FixedBackend::new(&DocumentStore::default(), Vec::new()));
        let ctx = SearchContext::new(DocumentStore::default(), StopWordSet::default(), backend.clone());

        let cmp = ctx.compare("bread", &CompareOptions::default());
        assert_eq!(
            cmp.semantic.outcome().unwrap().reason(),
            Some(NoResultsReason::EmptyCorpus)
        );
        assert_eq!(cmp.keyword.reason(), Some(NoResultsReason::EmptyCorpus));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_with_embedding_backend() {
        let store = DocumentStore::new(["aaaa", "bbbb"]);
        let backend =
            EmbeddingBackend::index(MockEmbeddingGenerator::new(4), &store, "blog_posts").unwrap();
        let ctx = SearchContext::new(store, StopWordSet::default(), Arc::new(backend));

        let cmp = ctx.compare("aaaa", &CompareOptions::default());
        let semantic = cmp.semantic.outcome().unwrap();
        assert_eq!(semantic.results()[0].index, 0);
        assert_eq!(semantic.results().len(), 1);
        assert_eq!(cmp.keyword.results()[0].index, 0);
        assert_eq!(ctx.backend_name(), "embedding");
    }

    #[test]
    fn test_comparison_serializes() {
        let backend = Arc::new(FixedBackend::new(&corpus(), vec![0.9, 0.25, 0.75]));
        let cmp = context(backend).compare("bread", &CompareOptions::default());
        let json = serde_json::to_value(&cmp).unwrap();
        assert_eq!(json["query"], "bread");
        assert_eq!(json["semantic"]["state"], "ok");
        assert_eq!(json["semantic"]["outcome"]["status"], "results");
        assert_eq!(json["keyword"]["results"][0]["rank"], 1);
    }
}

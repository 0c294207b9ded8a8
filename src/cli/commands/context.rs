//! Startup: settings to an immutable [`SearchContext`].

use std::sync::Arc;
use thiserror::Error;

use crate::compare::SearchContext;
use crate::config::Settings;
use crate::corpus::DocumentStore;
use crate::error::{BackendError, CorpusError};
use crate::io::{ExitCode, ResultCode};
use crate::keyword::StopWordSet;
use crate::semantic::{DisabledBackend, EmbeddingBackend, FastEmbedGenerator, SemanticBackend};

/// Failures that stop a command before any query runs.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl StartupError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Corpus(_) => ExitCode::CorpusError,
            Self::Backend(_) => ExitCode::BackendError,
        }
    }

    pub fn result_code(&self) -> ResultCode {
        match self {
            Self::Corpus(_) => ResultCode::CorpusError,
            Self::Backend(_) => ResultCode::BackendError,
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Corpus(e) => e
                .recovery_suggestions()
                .into_iter()
                .map(String::from)
                .collect(),
            Self::Backend(_) => vec![
                "Check semantic.model in settings".to_string(),
                "Models download on first use; check network access and semantic.cache_dir"
                    .to_string(),
            ],
        }
    }
}

/// Which semantic backend a command needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticMode<'a> {
    /// Load the model and index the corpus into this collection
    Collection(&'a str),
    /// Skip the model entirely
    Disabled,
}

/// Load the corpus, the stop words and the semantic backend.
pub fn load_context(settings: &Settings, mode: SemanticMode<'_>) -> Result<SearchContext, StartupError> {
    let corpus_path = settings.corpus_path();
    let store = DocumentStore::load(&corpus_path)?;
    crate::log_event!(
        "startup",
        "corpus",
        "{} documents from {}",
        store.len(),
        corpus_path.display()
    );

    let stop_words = StopWordSet::new(&settings.keyword.stop_words);
    if stop_words.is_empty() {
        tracing::warn!(target: "startup", "keyword.stop_words is empty, every query word is scored");
    } else {
        crate::debug_event!("startup", "stop_words", "{} words", stop_words.len());
    }

    let backend: Arc<dyn SemanticBackend> = match mode {
        SemanticMode::Disabled => Arc::new(DisabledBackend),
        SemanticMode::Collection(collection) => {
            let generator = FastEmbedGenerator::from_settings(
                &settings.semantic.model,
                settings.semantic.cache_dir.clone(),
                settings.semantic.show_download_progress,
            )?;
            crate::log_event!("startup", "model", "{}", generator.model_name());
            Arc::new(EmbeddingBackend::index(generator, &store, collection)?)
        }
    };

    Ok(SearchContext::new(store, stop_words, backend))
}

/// Print a startup failure to stderr.
pub fn report(err: &StartupError) {
    eprintln!("Error: {err}");
    for suggestion in err.suggestions() {
        eprintln!("  hint: {suggestion}");
    }
}

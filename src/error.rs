//! Structured error types for the search comparison system.
//!
//! Every failure here is recoverable. Corpus problems surface at load time,
//! backend problems surface as values the presentation layer can render.
//!
//! # Main error types
//!
//! - [`CorpusError`]: loading the document store
//! - [`BackendError`]: embedding model and semantic backend failures
//! - [`CollectionError`]: vector collection management
//! - [`ConfigError`]: settings loading and persistence

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the document store.
#[derive(Error, Debug)]
pub enum CorpusError {
    /// The documents file could not be read
    #[error("Failed to read documents from '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The documents file is not valid JSON
    #[error("Failed to parse documents in '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The top-level JSON value is not an array
    #[error("Expected a JSON array of documents in '{path}', found {found}")]
    NotAnArray { path: PathBuf, found: String },

    /// An entry in the corpus is not a text string
    #[error("Invalid document at index {index}: expected a string, found {found}")]
    InvalidDocument { index: usize, found: String },
}

impl CorpusError {
    /// Stable status code for JSON output.
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "CORPUS_READ_ERROR",
            Self::Parse { .. } => "CORPUS_PARSE_ERROR",
            Self::NotAnArray { .. } => "CORPUS_NOT_AN_ARRAY",
            Self::InvalidDocument { .. } => "INVALID_DOCUMENT",
        }
    }

    /// Recovery suggestions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::Read { .. } => vec![
                "Check that corpus.path in settings points at an existing file",
                "Run 'semcompare init' to write a sample documents.json",
            ],
            Self::Parse { .. } | Self::NotAnArray { .. } => {
                vec!["The documents file must be a JSON array of strings"]
            }
            Self::InvalidDocument { .. } => {
                vec!["Every entry in the documents array must be a JSON string"]
            }
        }
    }
}

/// Vector collection management errors.
#[derive(Error, Debug, PartialEq)]
pub enum CollectionError {
    /// The named collection does not exist
    #[error("Collection '{name}' does not exist")]
    NotFound { name: String },

    /// Collection names must be non-empty and free of whitespace
    #[error("Invalid collection name '{name}'")]
    InvalidName { name: String },

    /// An embedding did not match the collection's dimension
    #[error("Dimension mismatch in collection '{name}': expected {expected}, got {actual}")]
    DimensionMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// Failures of the semantic backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The embedding model could not be loaded
    #[error("Failed to initialize embedding model: {0}")]
    ModelInit(String),

    /// The model failed to embed some input
    #[error("Failed to generate embedding: {0}")]
    Embedding(String),

    /// The configured model name is not known
    #[error("Unknown embedding model '{0}'")]
    UnknownModel(String),

    /// Semantic search was turned off for this run
    #[error("Semantic backend is disabled")]
    Disabled,

    /// Collection operation failed
    #[error(transparent)]
    Collection(#[from] CollectionError),
}

impl BackendError {
    /// Stable status code for JSON output.
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::ModelInit(_) => "MODEL_INIT_ERROR",
            Self::Embedding(_) => "EMBEDDING_ERROR",
            Self::UnknownModel(_) => "UNKNOWN_MODEL",
            Self::Disabled => "BACKEND_DISABLED",
            Self::Collection(CollectionError::NotFound { .. }) => "COLLECTION_NOT_FOUND",
            Self::Collection(_) => "COLLECTION_ERROR",
        }
    }
}

/// Settings loading and persistence errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Configuration file already exists at '{path}'. Use --force to overwrite")]
    AlreadyExists { path: PathBuf },

    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type CorpusResult<T> = Result<T, CorpusError>;
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_stable() {
        let err = CorpusError::InvalidDocument {
            index: 2,
            found: "number".to_string(),
        };
        assert_eq!(err.status_code(), "INVALID_DOCUMENT");
        assert!(!err.recovery_suggestions().is_empty());

        let err = BackendError::from(CollectionError::NotFound {
            name: "blog_posts".to_string(),
        });
        assert_eq!(err.status_code(), "COLLECTION_NOT_FOUND");
    }

    #[test]
    fn test_invalid_document_message_names_index() {
        let err = CorpusError::InvalidDocument {
            index: 7,
            found: "object".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("index 7"));
        assert!(msg.contains("object"));
    }
}

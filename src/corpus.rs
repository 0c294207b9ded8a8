//! Document store: the ordered, immutable corpus both backends search.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CorpusError, CorpusResult};

/// Source tag attached to every document loaded from the blog corpus.
pub const DEFAULT_SOURCE: &str = "blog";

/// A single document and its position in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Position in the store, doubles as the document identifier.
    pub index: usize,

    /// Full document text.
    pub text: String,

    /// Metadata tag describing where the document came from.
    pub source: String,
}

impl Document {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            source: DEFAULT_SOURCE.to_string(),
        }
    }
}

/// Ordered sequence of documents, fixed for the lifetime of a search session.
///
/// There is no mutation API. Build a new store to change the corpus.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Vec<Document>,
}

impl DocumentStore {
    /// Build a store from document texts, indexed in iteration order.
    pub fn new<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let documents = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| Document::new(index, text))
            .collect();
        Self { documents }
    }

    /// Load a store from a JSON file holding an array of strings.
    ///
    /// Non-string entries fail here with [`CorpusError::InvalidDocument`]
    /// rather than later inside scoring.
    pub fn load(path: impl AsRef<Path>) -> CorpusResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CorpusError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let store = Self::from_json_str(&content).map_err(|e| match e {
            CorpusError::Parse { source, .. } => CorpusError::Parse {
                path: path.to_path_buf(),
                source,
            },
            CorpusError::NotAnArray { found, .. } => CorpusError::NotAnArray {
                path: path.to_path_buf(),
                found,
            },
            other => other,
        })?;

        tracing::debug!(
            target: "corpus",
            "loaded {} documents from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    /// Parse a JSON array of strings.
    pub fn from_json_str(content: &str) -> CorpusResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|source| CorpusError::Parse {
                path: Default::default(),
                source,
            })?;

        let entries = match value {
            serde_json::Value::Array(entries) => entries,
            other => {
                return Err(CorpusError::NotAnArray {
                    path: Default::default(),
                    found: json_kind(&other).to_string(),
                });
            }
        };

        let mut texts = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match entry {
                serde_json::Value::String(text) => texts.push(text),
                other => {
                    return Err(CorpusError::InvalidDocument {
                        index,
                        found: json_kind(&other).to_string(),
                    });
                }
            }
        }

        Ok(Self::new(texts))
    }

    pub fn get(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    /// Document texts in store order.
    pub fn texts(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.text.as_str()).collect()
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Sample corpus written by `semcompare init`.
pub fn sample_documents() -> Vec<&'static str> {
    vec![
        "Soccer is the most popular sport in the world, played by millions of people across every continent.",
        "Baking bread at home requires flour, water, yeast and salt. The dough rises before it is baked in a hot oven.",
        "Neural networks are a type of machine learning model inspired by the structure of the human brain.",
        "Basketball players must dribble the ball while moving and score by shooting through a hoop.",
        "Sourdough starters are fermented with wild yeast and give the loaf its tangy flavor.",
        "Deep learning has transformed computer vision, speech recognition and natural language processing.",
        "Marathon runners train for months to build endurance before race day.",
        "Fresh pasta is made by kneading eggs into flour until the dough is smooth and elastic.",
    ]
}

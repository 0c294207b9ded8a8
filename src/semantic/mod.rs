//! Semantic search backend.
//!
//! Embedding generation is delegated to fastembed. Nearest-neighbour lookup is
//! a cosine scan over an in-memory collection, which is plenty for a corpus of
//! a few dozen documents.

mod backend;
mod collection;
mod embedding;

pub use backend::EmbeddingBackend;
pub use collection::{CollectionRegistry, ResetOutcome, VectorCollection, cosine_similarity};
#[cfg(test)]
pub use embedding::MockEmbeddingGenerator;
pub use embedding::{
    EmbeddingGenerator, FastEmbedGenerator, default_cache_dir, model_to_string,
    parse_embedding_model,
};

use serde::Serialize;

use crate::error::{BackendError, BackendResult};

/// One document returned by a semantic backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemanticHit {
    pub index: usize,
    pub text: String,
    /// Dissimilarity in `[0, 1]`, lower is closer
    pub distance: f32,
}

impl SemanticHit {
    pub fn similarity(&self) -> f32 {
        1.0 - self.distance
    }
}

/// A service that ranks documents by meaning.
///
/// Implementations return hits ordered by ascending distance. Thresholding is
/// left to the caller.
pub trait SemanticBackend: Send + Sync {
    fn search(&self, query: &str, limit: usize) -> BackendResult<Vec<SemanticHit>>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// Stand-in used when only keyword search was requested.
pub struct DisabledBackend;

impl SemanticBackend for DisabledBackend {
    fn search(&self, _query: &str, _limit: usize) -> BackendResult<Vec<SemanticHit>> {
        Err(BackendError::Disabled)
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

/// Similarity cutoffs used by the two front ends
pub mod thresholds {
    /// Interactive comparison (CLI search and browser UI)
    pub const INTERACTIVE: f32 = 0.3;

    /// Console verification harness
    pub const VERIFY: f32 = 0.5;
}

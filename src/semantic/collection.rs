//! In-memory vector collections in cosine space.

use std::collections::HashMap;

use crate::error::CollectionError;

use super::SemanticHit;

struct Entry {
    index: usize,
    text: String,
    embedding: Vec<f32>,
}

/// A named set of embedded documents searched by cosine distance.
pub struct VectorCollection {
    name: String,
    dimension: usize,
    entries: Vec<Entry>,
}

impl VectorCollection {
    fn new(name: String, dimension: usize) -> Self {
        Self {
            name,
            dimension,
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add one embedded document.
    pub fn add(
        &mut self,
        index: usize,
        text: impl Into<String>,
        embedding: Vec<f32>,
    ) -> Result<(), CollectionError> {
        self.check_dimension(embedding.len())?;
        self.entries.push(Entry {
            index,
            text: text.into(),
            embedding,
        });
        Ok(())
    }

    /// Closest `limit` documents to `embedding`, by ascending cosine distance.
    ///
    /// Distance is `1 - cos`, clamped to `[0, 1]`. Equal distances keep
    /// ascending document index order.
    pub fn query(&self, embedding: &[f32], limit: usize) -> Result<Vec<SemanticHit>, CollectionError> {
        self.check_dimension(embedding.len())?;

        let mut hits: Vec<SemanticHit> = self
            .entries
            .iter()
            .map(|entry| SemanticHit {
                index: entry.index,
                text: entry.text.clone(),
                distance: (1.0 - cosine_similarity(embedding, &entry.embedding)).clamp(0.0, 1.0),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.index.cmp(&b.index))
        });
        hits.truncate(limit);
        Ok(hits)
    }

    fn check_dimension(&self, actual: usize) -> Result<(), CollectionError> {
        if actual != self.dimension {
            return Err(CollectionError::DimensionMismatch {
                name: self.name.clone(),
                expected: self.dimension,
                actual,
            });
        }
        Ok(())
    }
}

/// What [`CollectionRegistry::reset_or_create`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// No collection by that name existed
    Created,
    /// An existing collection was dropped and replaced with an empty one
    Replaced,
}

/// Named collections, keyed by name.
#[derive(Default)]
pub struct CollectionRegistry {
    collections: HashMap<String, VectorCollection>,
}

impl CollectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure an empty collection named `name` exists.
    ///
    /// Idempotent. A missing collection is not an error. An invalid name is.
    pub fn reset_or_create(
        &mut self,
        name: &str,
        dimension: usize,
    ) -> Result<ResetOutcome, CollectionError> {
        validate_name(name)?;
        let outcome = match self.delete(name) {
            Ok(()) => ResetOutcome::Replaced,
            Err(CollectionError::NotFound { .. }) => ResetOutcome::Created,
            Err(e) => return Err(e),
        };
        self.collections.insert(
            name.to_string(),
            VectorCollection::new(name.to_string(), dimension),
        );
        tracing::debug!(target: "semantic", "collection {name}: {outcome:?}");
        Ok(outcome)
    }

    /// Remove a collection. Reports [`CollectionError::NotFound`] if absent.
    pub fn delete(&mut self, name: &str) -> Result<(), CollectionError> {
        self.collections
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| CollectionError::NotFound {
                name: name.to_string(),
            })
    }

    pub fn get(&self, name: &str) -> Result<&VectorCollection, CollectionError> {
        self.collections
            .get(name)
            .ok_or_else(|| CollectionError::NotFound {
                name: name.to_string(),
            })
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut VectorCollection, CollectionError> {
        self.collections
            .get_mut(name)
            .ok_or_else(|| CollectionError::NotFound {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }
}

fn validate_name(name: &str) -> Result<(), CollectionError> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(CollectionError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Calculate cosine similarity between two vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

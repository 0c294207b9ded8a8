//! Semantic backend built from an embedding generator and a vector collection.

use crate::corpus::DocumentStore;
use crate::error::BackendResult;

use super::{CollectionRegistry, EmbeddingGenerator, SemanticBackend, SemanticHit};

/// Embeds the whole corpus once, then answers queries by cosine distance.
pub struct EmbeddingBackend<G: EmbeddingGenerator> {
    generator: G,
    registry: CollectionRegistry,
    collection: String,
}

impl<G: EmbeddingGenerator> EmbeddingBackend<G> {
    /// Reset the named collection and index every document in `store`.
    pub fn index(generator: G, store: &DocumentStore, collection: &str) -> BackendResult<Self> {
        let mut registry = CollectionRegistry::new();
        let outcome = registry.reset_or_create(collection, generator.dimension())?;

        let texts = store.texts();
        let embeddings = generator.embed_batch(&texts)?;

        let target = registry.get_mut(collection)?;
        for (doc, embedding) in store.iter().zip(embeddings) {
            target.add(doc.index, doc.text.as_str(), embedding)?;
        }

        crate::log_event!(
            "semantic",
            "indexed",
            "{} documents into {collection} ({outcome:?})",
            store.len()
        );

        Ok(Self {
            generator,
            registry,
            collection: collection.to_string(),
        })
    }

    pub fn collection_name(&self) -> &str {
        &self.collection
    }

    pub fn document_count(&self) -> usize {
        self.registry
            .get(&self.collection)
            .map(|c| c.len())
            .unwrap_or(0)
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }
}

impl<G: EmbeddingGenerator> SemanticBackend for EmbeddingBackend<G> {
    fn search(&self, query: &str, limit: usize) -> BackendResult<Vec<SemanticHit>> {
        let embedding = self.generator.embed_one(query)?;
        let hits = self.registry.get(&self.collection)?.query(&embedding, limit)?;
        crate::debug_event!("semantic", "query", "{} hits for '{query}'", hits.len());
        Ok(hits)
    }

    fn name(&self) -> &str {
        "embedding"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::MockEmbeddingGenerator;

    fn store() -> DocumentStore {
        DocumentStore::new(["aaaa", "bbbb", "aabb"])
    }

    #[test]
    fn test_index_embeds_corpus_in_one_batch() {
        let backend = EmbeddingBackend::index(MockEmbeddingGenerator::new(4), &store(), "blog_posts")
            .unwrap();
        assert_eq!(backend.document_count(), 3);
        assert_eq!(backend.collection_name(), "blog_posts");
        assert_eq!(backend.generator().call_count(), 1);
    }

    #[test]
    fn test_search_returns_closest_first() {
        let backend =
            EmbeddingBackend::index(MockEmbeddingGenerator::new(4), &store(), "c").unwrap();
        let hits = backend.search("aaa", 3).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].index, 0);
        assert!(hits[0].similarity() > 0.99);
        assert_eq!(hits[2].index, 1);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_search_limit() {
        let backend =
            EmbeddingBackend::index(MockEmbeddingGenerator::new(4), &store(), "c").unwrap();
        assert_eq!(backend.search("b", 1).unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_collection_name_surfaces() {
        let result = EmbeddingBackend::index(MockEmbeddingGenerator::new(4), &store(), "bad name");
        assert!(result.is_err());
    }
}

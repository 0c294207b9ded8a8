//! Embedding generation backed by fastembed.

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use parking_lot::Mutex;
use std::path::PathBuf;

use crate::error::{BackendError, BackendResult};

/// Produces fixed-width embeddings for text.
pub trait EmbeddingGenerator: Send + Sync {
    /// Embed a batch of texts, one vector per input in input order.
    fn embed_batch(&self, texts: &[&str]) -> BackendResult<Vec<Vec<f32>>>;

    /// Width of every embedding this generator produces.
    fn dimension(&self) -> usize;

    fn embed_one(&self, text: &str) -> BackendResult<Vec<f32>> {
        self.embed_batch(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::Embedding("model returned no embedding".to_string()))
    }
}

/// Sentence embeddings from a local ONNX model.
///
/// fastembed needs `&mut` to embed, so the model sits behind a mutex. Calls
/// are serialized, which matches the one-query-at-a-time model of the app.
pub struct FastEmbedGenerator {
    model: Mutex<TextEmbedding>,
    dimension: usize,
    model_name: String,
}

impl FastEmbedGenerator {
    /// Load `AllMiniLML6V2` into the default cache directory.
    pub fn new() -> BackendResult<Self> {
        Self::with_model(EmbeddingModel::AllMiniLML6V2, default_cache_dir(), true)
    }

    /// Load a model by its configured name.
    pub fn from_settings(
        model_name: &str,
        cache_dir: Option<PathBuf>,
        show_progress: bool,
    ) -> BackendResult<Self> {
        let model = parse_embedding_model(model_name)?;
        Self::with_model(
            model,
            cache_dir.unwrap_or_else(default_cache_dir),
            show_progress,
        )
    }

    pub fn with_model(
        model: EmbeddingModel,
        cache_dir: PathBuf,
        show_progress: bool,
    ) -> BackendResult<Self> {
        let model_name = model_to_string(&model);
        tracing::info!(target: "semantic", "loading embedding model {model_name}");

        let mut text_model = TextEmbedding::try_new(
            InitOptions::new(model)
                .with_cache_dir(cache_dir)
                .with_show_download_progress(show_progress),
        )
        .map_err(|e| BackendError::ModelInit(e.to_string()))?;

        // Embed one word to learn the output width
        let sample = text_model
            .embed(vec!["test"], None)
            .map_err(|e| BackendError::Embedding(e.to_string()))?;
        let dimension = sample
            .into_iter()
            .next()
            .map(|e| e.len())
            .ok_or_else(|| BackendError::ModelInit("model produced no sample embedding".into()))?;

        tracing::info!(target: "semantic", "model ready: {dimension} dimensions");

        Ok(Self {
            model: Mutex::new(text_model),
            dimension,
            model_name,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl EmbeddingGenerator for FastEmbedGenerator {
    fn embed_batch(&self, texts: &[&str]) -> BackendResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let embeddings = self
            .model
            .lock()
            .embed(texts.to_vec(), None)
            .map_err(|e| BackendError::Embedding(e.to_string()))?;

        if embeddings.len() != texts.len() {
            return Err(BackendError::Embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }
        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Default on-disk location for downloaded models.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("semcompare")
        .join("models")
}

/// Parse a configured model name.
///
/// Accepts the enum-style names (`AllMiniLML6V2`) and the hub names
/// (`all-MiniLM-L6-v2`), case-insensitively.
pub fn parse_embedding_model(name: &str) -> BackendResult<EmbeddingModel> {
    let normalized: String = name
        .trim()
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    match normalized.as_str() {
        "allminilml6v2" => Ok(EmbeddingModel::AllMiniLML6V2),
        "allminilml12v2" => Ok(EmbeddingModel::AllMiniLML12V2),
        "bgesmallenv15" => Ok(EmbeddingModel::BGESmallENV15),
        "bgebaseenv15" => Ok(EmbeddingModel::BGEBaseENV15),
        "paraphrasemlminilml12v2" | "paraphrasemultilingualminilml12v2" => {
            Ok(EmbeddingModel::ParaphraseMLMiniLML12V2)
        }
        "multilinguale5small" => Ok(EmbeddingModel::MultilingualE5Small),
        _ => Err(BackendError::UnknownModel(name.to_string())),
    }
}

/// Canonical configuration name for a model.
pub fn model_to_string(model: &EmbeddingModel) -> String {
    match model {
        EmbeddingModel::AllMiniLML6V2 => "AllMiniLML6V2".to_string(),
        EmbeddingModel::AllMiniLML12V2 => "AllMiniLML12V2".to_string(),
        EmbeddingModel::BGESmallENV15 => "BGESmallENV15".to_string(),
        EmbeddingModel::BGEBaseENV15 => "BGEBaseENV15".to_string(),
        EmbeddingModel::ParaphraseMLMiniLML12V2 => "ParaphraseMLMiniLML12V2".to_string(),
        EmbeddingModel::MultilingualE5Small => "MultilingualE5Small".to_string(),
        other => format!("{other:?}"),
    }
}

/// Deterministic bag-of-letters embeddings for unit tests.
#[cfg(test)]
pub struct MockEmbeddingGenerator {
    dimension: usize,
    pub calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockEmbeddingGenerator {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl EmbeddingGenerator for MockEmbeddingGenerator {
    fn embed_batch(&self, texts: &[&str]) -> BackendResult<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|text| {
                let mut v = vec![0.0; self.dimension];
                for c in text.to_lowercase().chars().filter(|c| c.is_ascii_lowercase()) {
                    v[(c as usize - 'a' as usize) % self.dimension] += 1.0;
                }
                v
            })
            .collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

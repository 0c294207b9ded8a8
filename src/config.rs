//! Layered configuration.
//!
//! Sources, later ones win:
//! - Default values
//! - `.semcompare/settings.toml`, found by walking up from the current directory
//! - Environment variables
//!
//! # Environment Variables
//!
//! Variables are prefixed with `SEMCOMPARE_` and use double underscores to
//! separate nested levels:
//! - `SEMCOMPARE_SEARCH__LIMIT=5` sets `search.limit`
//! - `SEMCOMPARE_SERVER__BIND=0.0.0.0:7860` sets `server.bind`
//! - `SEMCOMPARE_CORPUS__PATH=data/posts.json` sets `corpus.path`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::keyword::DEFAULT_STOP_WORDS;
use crate::semantic::thresholds;

/// Directory holding the settings file.
pub const CONFIG_DIR: &str = ".semcompare";
pub const SETTINGS_FILE: &str = "settings.toml";
const ENV_PREFIX: &str = "SEMCOMPARE_";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Directory containing `.semcompare`, detected when not set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    #[serde(default)]
    pub corpus: CorpusConfig,

    #[serde(default)]
    pub semantic: SemanticConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub keyword: KeywordConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorpusConfig {
    /// JSON array of document strings. Relative paths resolve against the workspace root.
    #[serde(default = "default_corpus_path")]
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SemanticConfig {
    /// Embedding model name
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Collection used by the interactive paths
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Collection used by the verification harness
    #[serde(default = "default_verify_collection")]
    pub verify_collection: String,

    /// Show a progress bar while the model downloads
    #[serde(default = "default_true")]
    pub show_download_progress: bool,

    /// Where downloaded models are cached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SearchConfig {
    /// Maximum results per backend
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Similarity cutoff for `search` and the browser UI
    #[serde(default = "default_interactive_threshold")]
    pub interactive_threshold: f32,

    /// Similarity cutoff annotated by `verify`
    #[serde(default = "default_verify_threshold")]
    pub verify_threshold: f32,

    /// Characters of document text shown by `verify`
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct KeywordConfig {
    /// Words dropped from keyword queries
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Address the browser UI listens on
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default level: error, warn, info, debug, trace
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-target overrides
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_corpus_path() -> PathBuf {
    PathBuf::from("documents.json")
}
fn default_embedding_model() -> String {
    "AllMiniLML6V2".to_string()
}
fn default_collection() -> String {
    "blog_posts".to_string()
}
fn default_verify_collection() -> String {
    "test_blog_posts".to_string()
}
fn default_limit() -> usize {
    3
}
fn default_interactive_threshold() -> f32 {
    thresholds::INTERACTIVE
}
fn default_verify_threshold() -> f32 {
    thresholds::VERIFY
}
fn default_preview_chars() -> usize {
    100
}
fn default_stop_words() -> Vec<String> {
    DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect()
}
fn default_bind() -> String {
    "127.0.0.1:7860".to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            workspace_root: None,
            corpus: CorpusConfig::default(),
            semantic: SemanticConfig::default(),
            search: SearchConfig::default(),
            keyword: KeywordConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            path: default_corpus_path(),
        }
    }
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            collection: default_collection(),
            verify_collection: default_verify_collection(),
            show_download_progress: true,
            cache_dir: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            interactive_threshold: default_interactive_threshold(),
            verify_threshold: default_verify_threshold(),
            preview_chars: default_preview_chars(),
        }
    }
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            stop_words: default_stop_words(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(SETTINGS_FILE));

        let mut settings = Self::load_from(config_path)?;
        if settings.workspace_root.is_none() {
            settings.workspace_root = Self::workspace_root();
        }
        Ok(settings)
    }

    /// Load configuration from a specific file, still honoring environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let settings: Self = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            // Double underscore separates nesting, single underscore stays in field names
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.search.limit == 0 {
            return Err(ConfigError::Invalid {
                field: "search.limit",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Find `.semcompare/settings.toml` from the current directory upwards.
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(CONFIG_DIR).join(SETTINGS_FILE))
    }

    /// Directory containing `.semcompare`, if any.
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        current
            .ancestors()
            .find(|ancestor| ancestor.join(CONFIG_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Corpus location with relative paths resolved against the workspace root.
    pub fn corpus_path(&self) -> PathBuf {
        match &self.workspace_root {
            Some(root) if self.corpus.path.is_relative() => root.join(&self.corpus.path),
            _ => self.corpus.path.clone(),
        }
    }

    /// Save current configuration to file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string).map_err(write_err)
    }

    /// Write default settings and a sample corpus under `root`.
    ///
    /// Returns the settings path. An existing sample corpus is never overwritten.
    pub fn init_in(root: impl AsRef<Path>, force: bool) -> Result<PathBuf, ConfigError> {
        let root = root.as_ref();
        let config_path = root.join(CONFIG_DIR).join(SETTINGS_FILE);

        if !force && config_path.exists() {
            return Err(ConfigError::AlreadyExists { path: config_path });
        }

        let settings = Settings::default();
        settings.save(&config_path)?;

        let corpus_path = root.join(&settings.corpus.path);
        if !corpus_path.exists() {
            let sample = serde_json::to_string_pretty(&crate::corpus::sample_documents())
                .unwrap_or_else(|_| "[]".to_string());
            std::fs::write(&corpus_path, sample).map_err(|source| ConfigError::Write {
                path: corpus_path.clone(),
                source,
            })?;
        }

        Ok(config_path)
    }
}

pub mod cli;
pub mod compare;
pub mod config;
pub mod corpus;
pub mod display;
pub mod error;
pub mod io;
pub mod keyword;
pub mod logging;
pub mod ranking;
pub mod semantic;
#[cfg(feature = "http-server")]
pub mod server;
pub mod verify;

pub use compare::{CompareOptions, Comparison, SearchContext, SemanticOutcome};
pub use config::Settings;
pub use corpus::{Document, DocumentStore};
pub use error::{BackendError, CollectionError, ConfigError, CorpusError};
pub use keyword::{KeywordScorer, StopWordSet};
pub use ranking::{NoResultsReason, RankedResult, Score, SearchOutcome};
pub use semantic::{SemanticBackend, SemanticHit};

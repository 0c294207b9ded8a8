//! CLI argument parsing using clap.

use clap::{
    Parser, Subcommand, ValueEnum,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::num::NonZeroUsize;
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Semantic vs keyword search comparison
#[derive(Parser, Debug)]
#[command(
    name = "semcompare",
    version = env!("CARGO_PKG_VERSION"),
    about = "Compare semantic (embedding) search against keyword search",
    long_about = "Run semantic and keyword search side by side over a static document set.",
    next_line_help = true,
    styles = clap_cargo_style(),
    after_help = "Quick Start:\n  $ semcompare init\n  $ semcompare search \"making bread\"\n  $ semcompare verify\n  $ semcompare serve"
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Show detailed loading information
    #[arg(long, global = true)]
    pub info: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Restrict `search` to one backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    Semantic,
    Keyword,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write default settings and a sample corpus
    #[command(about = "Set up .semcompare directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration settings
    #[command(about = "Display active settings")]
    Config,

    /// Compare both backends for one query
    #[command(
        about = "Search with both backends side by side",
        after_help = "Examples:\n  semcompare search \"making bread\"\n  semcompare search soccer --limit 5 --threshold 0.4\n  semcompare search \"neural networks\" --only keyword --json"
    )]
    Search {
        /// Search query
        query: String,

        /// Maximum results per backend (overrides config)
        #[arg(short, long)]
        limit: Option<NonZeroUsize>,

        /// Minimum similarity for semantic results (overrides config)
        #[arg(short, long)]
        threshold: Option<f32>,

        /// Run only one backend
        #[arg(long, value_enum)]
        only: Option<Backend>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Run the example queries and print the top hit from each backend
    #[command(about = "Console verification of both backends")]
    Verify {
        /// Queries to run instead of the built-in examples
        queries: Vec<String>,

        /// Similarity under which the top hit is flagged (overrides config)
        #[arg(short, long)]
        threshold: Option<f32>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Serve the browser UI
    #[command(about = "Start the browser UI")]
    Serve {
        /// Address to bind (overrides config)
        #[arg(short, long)]
        bind: Option<String>,
    },
}

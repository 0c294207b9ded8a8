use clap::Parser;
use std::num::NonZeroUsize;

use semcompare::cli::commands::{init, search, verify};
use semcompare::cli::{Cli, Commands};
use semcompare::config::Settings;
use semcompare::io::ExitCode;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Load configuration
    let loaded = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) if matches!(cli.command, Commands::Init { .. }) => {
            eprintln!("Configuration error: {e}");
            Settings::default()
        }
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::ConfigError.into();
        }
    };

    let mut logging = config.logging.clone();
    if cli.info && logging.default == "warn" {
        logging.default = "info".to_string();
    }
    semcompare::logging::init_with_config(&logging);

    let code = match cli.command {
        Commands::Init { force } => init::run_init(force),
        Commands::Config => init::run_config(&config),
        Commands::Search {
            query,
            limit,
            threshold,
            only,
            json,
        } => {
            let args = search::SearchArgs {
                query,
                limit: limit.map(NonZeroUsize::get),
                threshold,
                only,
                json,
            };
            // Model loading blocks; keep it off the async workers
            tokio::task::block_in_place(|| search::run(args, &config))
        }
        Commands::Verify {
            queries,
            threshold,
            json,
        } => tokio::task::block_in_place(|| verify::run(queries, threshold, json, &config)),
        Commands::Serve { bind } => serve(bind, &config).await,
    };

    code.into()
}

#[cfg(feature = "http-server")]
async fn serve(bind: Option<String>, config: &Settings) -> ExitCode {
    semcompare::cli::commands::serve::run(bind, config).await
}

#[cfg(not(feature = "http-server"))]
async fn serve(_bind: Option<String>, _config: &Settings) -> ExitCode {
    eprintln!("Error: built without the http-server feature");
    ExitCode::GeneralError
}

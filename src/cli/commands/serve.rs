//! Serve command - browser UI over HTTP.

use super::context::{SemanticMode, load_context};
use super::search::startup_failure;
use crate::compare::CompareOptions;
use crate::config::Settings;
use crate::io::ExitCode;

/// Run the serve command.
pub async fn run(bind: Option<String>, settings: &Settings) -> ExitCode {
    let bind = bind.unwrap_or_else(|| settings.server.bind.clone());

    // Model load and indexing are blocking
    let owned = settings.clone();
    let loaded = tokio::task::spawn_blocking(move || {
        load_context(&owned, SemanticMode::Collection(&owned.semantic.collection))
    })
    .await;

    let context = match loaded {
        Ok(Ok(ctx)) => ctx,
        Ok(Err(e)) => return startup_failure(&e, false),
        Err(e) => {
            eprintln!("Error: startup task failed: {e}");
            return ExitCode::GeneralError;
        }
    };

    let defaults = CompareOptions {
        limit: settings.search.limit,
        threshold: settings.search.interactive_threshold,
    };

    match crate::server::serve(context, defaults, &bind).await {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("Error: server failed on {bind}: {e}");
            ExitCode::GeneralError
        }
    }
}

//! Verify command - console smoke test of both backends.

use super::context::{SemanticMode, load_context};
use super::search::startup_failure;
use crate::config::Settings;
use crate::io::{EntityType, Envelope, ExitCode};
use crate::verify::{self, DEFAULT_QUERIES, VerifyOptions};

pub fn run(queries: Vec<String>, threshold: Option<f32>, json: bool, settings: &Settings) -> ExitCode {
    let queries = if queries.is_empty() {
        DEFAULT_QUERIES.iter().map(|q| q.to_string()).collect()
    } else {
        queries
    };
    let options = VerifyOptions {
        threshold: threshold.unwrap_or(settings.search.verify_threshold),
        preview_chars: settings.search.preview_chars,
    };

    let mode = SemanticMode::Collection(&settings.semantic.verify_collection);
    let context = match load_context(settings, mode) {
        Ok(ctx) => ctx,
        Err(e) => return startup_failure(&e, json),
    };

    if json {
        let checks: Vec<_> = queries
            .iter()
            .map(|q| verify::check_query(&context, q, &options))
            .collect();
        let count = checks.len();
        let envelope = Envelope::success(checks)
            .with_entity_type(EntityType::VerifyReport)
            .with_count(count);
        return match envelope.to_json() {
            Ok(out) => {
                println!("{out}");
                ExitCode::Success
            }
            Err(e) => {
                eprintln!("Error serializing output: {e}");
                ExitCode::GeneralError
            }
        };
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match verify::run(&context, &queries, &options, &mut out) {
        Ok(_) => ExitCode::Success,
        Err(e) => {
            eprintln!("Error writing report: {e}");
            ExitCode::GeneralError
        }
    }
}

//! Search command - run both backends side by side.

use console::style;
use std::time::Instant;

use super::context::{SemanticMode, StartupError, load_context, report};
use crate::cli::Backend;
use crate::compare::{CompareOptions, Comparison, SemanticOutcome};
use crate::config::Settings;
use crate::display;
use crate::io::{EntityType, Envelope, ErrorDetails, ExitCode};

/// Arguments of the search command after flag parsing.
#[derive(Debug, Clone)]
pub struct SearchArgs {
    pub query: String,
    pub limit: Option<usize>,
    pub threshold: Option<f32>,
    pub only: Option<Backend>,
    pub json: bool,
}

pub fn run(args: SearchArgs, settings: &Settings) -> ExitCode {
    let options = CompareOptions {
        limit: args.limit.unwrap_or(settings.search.limit),
        threshold: args
            .threshold
            .unwrap_or(settings.search.interactive_threshold),
    };

    let mode = match args.only {
        Some(Backend::Keyword) => SemanticMode::Disabled,
        _ => SemanticMode::Collection(&settings.semantic.collection),
    };

    let context = match load_context(settings, mode) {
        Ok(ctx) => ctx,
        Err(e) => return startup_failure(&e, args.json),
    };

    let started = Instant::now();
    let comparison = context.compare(&args.query, &options);
    let elapsed = started.elapsed();

    // Both sides always run; `--only` just hides one
    let show_semantic = args.only != Some(Backend::Keyword);
    let show_keyword = args.only != Some(Backend::Semantic);

    let exit_code = exit_code_for(&comparison, show_semantic, show_keyword);

    if args.json {
        let duration_ms = elapsed.as_millis() as u64;
        print_json(&comparison, show_semantic, show_keyword, exit_code, duration_ms);
    } else {
        print_text(&comparison, show_semantic, show_keyword);
    }
    exit_code
}

fn exit_code_for(comparison: &Comparison, show_semantic: bool, show_keyword: bool) -> ExitCode {
    let semantic_hits = show_semantic
        && comparison
            .semantic
            .outcome()
            .is_some_and(|o| !o.is_empty());
    let keyword_hits = show_keyword && !comparison.keyword.is_empty();
    if semantic_hits || keyword_hits {
        ExitCode::Success
    } else {
        ExitCode::NotFound
    }
}

fn print_text(comparison: &Comparison, show_semantic: bool, show_keyword: bool) {
    let (semantic, keyword) = comparison.render();
    if show_semantic {
        println!("{}", style("## Semantic Search Results").cyan().bold());
        println!();
        println!("{semantic}");
    }
    if show_semantic && show_keyword {
        println!();
    }
    if show_keyword {
        println!("{}", style("## Keyword Search Results").cyan().bold());
        println!();
        println!("{keyword}");
    }
}

fn print_json(
    comparison: &Comparison,
    show_semantic: bool,
    show_keyword: bool,
    exit_code: ExitCode,
    duration_ms: u64,
) {
    let envelope = comparison_envelope(comparison, show_semantic, show_keyword, exit_code)
        .with_duration_ms(duration_ms);

    match envelope.to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing output: {e}"),
    }
}

/// JSON envelope for a comparison. Its `exit_code` always matches the process exit code.
fn comparison_envelope(
    comparison: &Comparison,
    show_semantic: bool,
    show_keyword: bool,
    exit_code: ExitCode,
) -> Envelope {
    let mut data = serde_json::Map::new();
    data.insert("query".to_string(), comparison.query.clone().into());
    if show_semantic {
        data.insert(
            "semantic".to_string(),
            serde_json::to_value(&comparison.semantic).unwrap_or_default(),
        );
    }
    if show_keyword {
        data.insert(
            "keyword".to_string(),
            serde_json::to_value(&comparison.keyword).unwrap_or_default(),
        );
    }
    let data = serde_json::Value::Object(data);

    let count = if show_semantic {
        comparison.semantic.outcome().map_or(0, |o| o.results().len())
    } else {
        0
    } + if show_keyword {
        comparison.keyword.results().len()
    } else {
        0
    };

    let semantic_failure = match &comparison.semantic {
        SemanticOutcome::Failed { message } if show_semantic => Some(message.as_str()),
        _ => None,
    };

    let mut envelope = match (semantic_failure, exit_code) {
        // Partial only when the keyword side still produced something
        (Some(message), ExitCode::Success) => {
            Envelope::partial(data, format!("Semantic backend failed: {message}"))
        }
        (Some(message), _) => {
            Envelope::not_found(data, format!("Semantic backend failed: {message}"))
        }
        (None, ExitCode::Success) => {
            Envelope::success(data).with_message(format!("{count} results"))
        }
        (None, _) => Envelope::not_found(data, no_results_message(comparison)),
    }
    .with_entity_type(EntityType::Comparison)
    .with_count(count)
    .with_query(comparison.query.clone());

    envelope.exit_code = exit_code.code();
    envelope
}

fn no_results_message(comparison: &Comparison) -> String {
    let reason = comparison
        .semantic
        .outcome()
        .and_then(|o| o.reason())
        .map(|r| (r, display::Side::Semantic))
        .or_else(|| comparison.keyword.reason().map(|r| (r, display::Side::Keyword)));
    match reason {
        Some((reason, side)) => display::no_results_message(reason, side),
        None => "No results".to_string(),
    }
}

/// Report a startup failure in the requested format.
pub fn startup_failure(err: &StartupError, json: bool) -> ExitCode {
    if json {
        let mut envelope: Envelope<()> = Envelope::error(err.result_code(), err.to_string())
            .with_error_details(ErrorDetails {
                suggestions: err.suggestions(),
                context: None,
            });
        envelope.exit_code = err.exit_code().code();
        if let Ok(out) = envelope.to_json() {
            println!("{out}");
        }
    } else {
        report(err);
    }
    err.exit_code()
}

//! Browser UI.
//!
//! Serves a single page with a query box and the two result columns, plus a
//! JSON endpoint the page calls on every search.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::compare::{CompareOptions, Comparison, SearchContext};

struct AppState {
    context: SearchContext,
    defaults: CompareOptions,
}

/// Query string of `GET /api/compare`.
#[derive(Debug, Deserialize)]
pub struct CompareParams {
    #[serde(default)]
    pub q: String,
    /// Zero is rejected with 400
    pub limit: Option<NonZeroUsize>,
    pub threshold: Option<f32>,
}

/// Body of `GET /api/compare`.
#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub comparison: Comparison,
    pub semantic_markdown: String,
    pub keyword_markdown: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    documents: usize,
    backend: String,
}

/// Build the router. Exposed for in-process tests.
pub fn router(context: SearchContext, defaults: CompareOptions) -> Router {
    let state = Arc::new(AppState { context, defaults });
    Router::new()
        .route("/", get(index))
        .route("/api/compare", get(compare))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn serve(
    context: SearchContext,
    defaults: CompareOptions,
    bind: &str,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    crate::log_event!("server", "listening", "http://{}", listener.local_addr()?);
    eprintln!("Semantic Search Demo running at http://{}", listener.local_addr()?);

    axum::serve(listener, router(context, defaults))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            crate::log_event!("server", "shutdown");
        })
        .await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        documents: state.context.store().len(),
        backend: state.context.backend_name().to_string(),
    })
}

async fn compare(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CompareParams>,
) -> impl IntoResponse {
    let options = CompareOptions {
        limit: params.limit.map_or(state.defaults.limit, NonZeroUsize::get),
        threshold: params.threshold.unwrap_or(state.defaults.threshold),
    };

    // Embedding is CPU-bound and blocking
    let worker_state = state.clone();
    let result = tokio::task::spawn_blocking(move || {
        worker_state.context.compare(&params.q, &options)
    })
    .await;

    match result {
        Ok(comparison) => {
            let (semantic_markdown, keyword_markdown) = comparison.render();
            Json(CompareResponse {
                comparison,
                semantic_markdown,
                keyword_markdown,
            })
            .into_response()
        }
        Err(e) => {
            tracing::error!(target: "server", "compare task failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "search task failed").into_response()
        }
    }
}

const INDEX_HTML: &str = r####"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Semantic Search Demo</title>
<style>
  body { font-family: system-ui, sans-serif; }
  .container { max-width: 900px; margin: auto; padding-top: 20px; }
  .row { display: flex; gap: 24px; }
  .column { flex: 1; }
  blockquote { margin: 4px 0 16px; padding-left: 12px; border-left: 3px solid #ccc; }
  input { width: 70%; padding: 6px; }
  button { padding: 6px 16px; }
</style>
</head>
<body>
<div class="container">
  <h1>Semantic Search Demo</h1>
  <p>Compare <strong>Semantic Search</strong> (Vector Embeddings) vs <strong>Keyword Search</strong>.</p>
  <form id="search-form">
    <label for="query">Enter Search Query</label><br>
    <input id="query" placeholder="e.g., making bread, soccer, neural networks">
    <button type="submit">Search</button>
  </form>
  <div class="row">
    <div class="column"><h2>Semantic Search Results</h2><div id="semantic"></div></div>
    <div class="column"><h2>Keyword Search Results</h2><div id="keyword"></div></div>
  </div>
</div>
<script>
function escapeHtml(s) {
  return s.replace(/&/g, "&amp;").replace(/</g, "&lt;").replace(/>/g, "&gt;");
}
function renderMarkdown(md) {
  return md.split("\n").map(function (line) {
    if (line.startsWith("### ")) return "<h3>" + escapeHtml(line.slice(4)) + "</h3>";
    if (line.startsWith(">")) return "<blockquote>" + escapeHtml(line.slice(1)) + "</blockquote>";
    return line ? "<p>" + escapeHtml(line) + "</p>" : "";
  }).join("");
}
document.getElementById("search-form").addEventListener("submit", async function (e) {
  e.preventDefault();
  const q = document.getElementById("query").value;
  const resp = await fetch("/api/compare?q=" + encodeURIComponent(q));
  if (!resp.ok) {
    document.getElementById("semantic").textContent = "Search failed.";
    return;
  }
  const body = await resp.json();
  document.getElementById("semantic").innerHTML = renderMarkdown(body.semantic_markdown);
  document.getElementById("keyword").innerHTML = renderMarkdown(body.keyword_markdown);
});
</script>
</body>
</html>
"####;

//! HTTP endpoint for the search index.
//!
//! `techgloss serve` exposes the same search core the static site uses, for
//! clients that would rather not download and rank the index themselves.
//!
//! ## Routes
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /api/search-index.json` | The full record array, with `ETag` and `Cache-Control` |
//! | `GET /api/search?q=&category=&limit=` | Ranked hits, title and description highlighted |
//! | `GET /api/suggestions?q=&limit=` | Suggestion strings |
//!
//! All routes read one [`IndexSnapshot`] from the shared [`IndexCache`].
//! Rebuilding scans the content directory, so it runs on the blocking pool.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::cache::{CacheError, IndexCache, IndexSnapshot, etag_matches};
use crate::search::{self, SearchOptions, highlight_html, suggest};

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Index error: {0}")]
    Cache(#[from] CacheError),
    #[error("Index task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        error!(error = %self, "search index unavailable");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to generate search index" })),
        )
            .into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<IndexCache>,
    /// Default for `/api/suggestions` when `limit` is absent.
    pub suggestion_limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub category: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

/// One `/api/search` hit. `title` and `description` are HTML.
#[derive(Debug, Serialize, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub slug: String,
    pub url: String,
    pub category: String,
    pub title: String,
    pub description: String,
    pub score: u32,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/search-index.json", get(search_index))
        .route("/api/search", get(search_terms))
        .route("/api/suggestions", get(suggestions))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<(), ServeError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "serving search API");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn load_snapshot(cache: &Arc<IndexCache>) -> Result<Arc<IndexSnapshot>, ServeError> {
    let cache = Arc::clone(cache);
    let snapshot = tokio::task::spawn_blocking(move || cache.snapshot()).await??;
    Ok(snapshot)
}

async fn search_index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ServeError> {
    let snapshot = load_snapshot(&state.cache).await?;
    let cache_control = state.cache.cache_control();

    let not_modified = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| etag_matches(value, &snapshot.etag));
    if not_modified {
        return Ok((
            StatusCode::NOT_MODIFIED,
            [
                (header::ETAG, snapshot.etag.clone()),
                (header::CACHE_CONTROL, cache_control),
            ],
        )
            .into_response());
    }

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::ETAG, snapshot.etag.clone()),
            (header::CACHE_CONTROL, cache_control),
        ],
        snapshot.json.clone(),
    )
        .into_response())
}

async fn search_terms(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchHit>>, ServeError> {
    let snapshot = load_snapshot(&state.cache).await?;
    let options = SearchOptions {
        category: params.category,
        limit: params.limit,
    };
    let hits = search::run(&snapshot.records, &params.q, &options)
        .into_iter()
        .map(|result| {
            let record = result.record;
            SearchHit {
                id: record.id.clone(),
                slug: record.slug.clone(),
                url: format!("/glossary/{}/", record.slug),
                category: record.category.clone(),
                title: highlight_html(&record.title, &params.q),
                description: highlight_html(&record.description, &params.q),
                score: result.score,
            }
        })
        .collect();
    Ok(Json(hits))
}

async fn suggestions(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Result<Json<Vec<String>>, ServeError> {
    let snapshot = load_snapshot(&state.cache).await?;
    let limit = params.limit.unwrap_or(state.suggestion_limit);
    Ok(Json(suggest(&snapshot.records, &params.q, limit)))
}

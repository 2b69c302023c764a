//! API layer - HTTP handlers and routing
//!
//! - `POST /v1/vt` - admin JSON-RPC (category, tag, author, news)
//! - `POST /v1/rpc` - public portal JSON-RPC
//! - `GET /health` - store liveness

pub mod jsonrpc;
pub mod portal;
pub mod rpc;
pub mod types;
pub mod vt;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::PaginationConfig;
use crate::db::repositories::{
    SqlxAuthorRepository, SqlxCategoryRepository, SqlxNewsRepository, SqlxTagRepository,
};
use crate::db::DynDatabasePool;
use crate::services::{AuthorService, CategoryService, NewsService, PortalService, TagService};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub pool: DynDatabasePool,
    pub categories: Arc<CategoryService>,
    pub tags: Arc<TagService>,
    pub authors: Arc<AuthorService>,
    pub news: Arc<NewsService>,
    pub portal: Arc<PortalService>,
    /// Page size for admin `get` calls without one
    pub admin_page_size: u32,
}

impl AppState {
    /// Wire repositories and services over one pool.
    pub fn new(pool: DynDatabasePool, pagination: &PaginationConfig) -> Self {
        let category_repo = SqlxCategoryRepository::boxed(pool.clone());
        let tag_repo = SqlxTagRepository::boxed(pool.clone());
        let author_repo = SqlxAuthorRepository::boxed(pool.clone());
        let news_repo = SqlxNewsRepository::boxed(pool.clone());

        Self {
            categories: Arc::new(CategoryService::new(category_repo.clone())),
            tags: Arc::new(TagService::new(tag_repo.clone())),
            authors: Arc::new(AuthorService::new(author_repo.clone())),
            news: Arc::new(NewsService::new(
                news_repo.clone(),
                category_repo.clone(),
                author_repo,
                tag_repo.clone(),
            )),
            portal: Arc::new(PortalService::new(
                news_repo,
                category_repo,
                tag_repo,
                pagination.portal_page_size,
            )),
            admin_page_size: pagination.admin_page_size,
            pool,
        }
    }
}

/// Build the complete router with middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/vt", post(vt::handler))
        .route("/v1/rpc", post(rpc::handler))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.pool.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({"status": "ok"}))),
        Err(e) => {
            tracing::error!("Health check failed: {:#}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"status": "unavailable"})),
            )
        }
    }
}

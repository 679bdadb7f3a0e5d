//! API route handlers - maps HTTP endpoints to store and git operations.
//!
//! Each submodule defines routes for a feature area:
//! - `repositories`: Upload, info and deletion (/api/v1/repositories[/{id}])
//! - `branches`: Branch listing (GET /api/v1/repositories/{id}/branches)
//! - `graph`: Positioned commit graph (GET /api/v1/repositories/{id}/graph)
//!
//! Plus GET /api/v1/health for liveness checks.

pub mod branches;
pub mod graph;
pub mod repositories;


use std::sync::Arc;

use axum::{Json, Router, extract::DefaultBodyLimit, routing::get};
use serde_json::{Value, json};

use crate::error::Result;
use crate::git::GitRepository;
use crate::store::{RepoId, RepoStore};

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<dyn RepoStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RepoStore>) -> Self {
        Self { store }
    }

    /// Resolve a path id to an opened repository.
    pub fn open_repo(&self, id: &str) -> Result<GitRepository> {
        let id = RepoId::parse(id)?;
        let handle = self.store.get(&id)?;
        GitRepository::open(&handle)
    }
}

pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .merge(repositories::routes(state.clone()))
        .merge(branches::routes(state.clone()))
        .merge(graph::routes(state))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

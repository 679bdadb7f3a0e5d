//! Commit graph endpoint.
//!
//! - GET /api/v1/repositories/{id}/graph
//!   Parsed and laid out history of every ref: positioned commits, resolved
//!   parent/merge edges and any timestamp warnings.
//!   Used by: GitGraph

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::error::Result;
use crate::git::build_commit_graph;
use crate::models::CommitGraphResponse;
use crate::routes::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/repositories/{id}/graph", get(get_commit_graph))
        .with_state(state)
}

async fn get_commit_graph(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CommitGraphResponse>> {
    let repo = state.open_repo(&id)?;
    let graph = build_commit_graph(&repo)?;
    Ok(Json(graph))
}

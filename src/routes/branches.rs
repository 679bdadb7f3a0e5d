//! Branch listing endpoint.
//!
//! - GET /api/v1/repositories/{id}/branches
//!   Lists local and remote-tracking branches with the current branch flagged.
//!   Used by: BranchList panel

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::error::Result;
use crate::models::BranchInfo;
use crate::routes::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/repositories/{id}/branches", get(list_branches))
        .with_state(state)
}

async fn list_branches(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<BranchInfo>>> {
    let repo = state.open_repo(&id)?;
    let branches = repo.list_branches()?;
    Ok(Json(branches))
}

//! Repository upload, info and deletion.
//!
//! - POST /api/v1/repositories (multipart/form-data)
//!   Every `files[]` field is one file of a `.git` directory; its filename is
//!   the path inside `.git`. Responds 201 with the new repository id.
//!   Used by: the folder picker after the user selects a `.git` folder
//!
//! - GET /api/v1/repositories/{id}
//!   Current branch, remotes and latest commit.
//!
//! - DELETE /api/v1/repositories/{id}
//!   Drops the staged copy. Unknown ids still answer 204.

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::error::{AppError, Result};
use crate::models::{RepositoryInfo, UploadResponse};
use crate::routes::AppState;
use crate::store::{RepoId, UploadedFile};

/// Multipart field name carrying `.git` files.
pub const UPLOAD_FIELD: &str = "files[]";

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/repositories", post(upload_repository))
        .route(
            "/api/v1/repositories/{id}",
            get(get_repository_info).delete(delete_repository),
        )
        .with_state(state)
}

async fn upload_repository(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Upload(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(path) = field.file_name().map(|n| n.to_string()) else {
            continue;
        };
        let contents = field
            .bytes()
            .await
            .map_err(|e| AppError::Upload(e.to_string()))?;

        files.push(UploadedFile {
            path,
            contents: contents.to_vec(),
        });
    }

    let file_count = files.len();
    let id = RepoId::new();
    state.store.put(&id, files)?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            repo_id: id.to_string(),
            file_count,
        }),
    ))
}

async fn get_repository_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RepositoryInfo>> {
    let repo = state.open_repo(&id)?;
    let info = repo.info()?;
    Ok(Json(info))
}

async fn delete_repository(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = RepoId::parse(&id)?;
    state.store.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

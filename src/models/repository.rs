//! Repository-level DTOs.
//!
//! - `UploadResponse`: id handed back after a `.git` upload
//! - `RepositoryInfo`: header data (current branch, remotes, latest commit)
//! - `RemoteInfo`: configured remote with its URLs
//! - `BranchInfo`: local or remote-tracking branch for the branch list

use serde::Serialize;

use crate::models::CommitInfo;

#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub repo_id: String,
    pub file_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepositoryInfo {
    pub id: String,
    pub head_branch: Option<String>,
    pub head_detached: bool,
    pub head_commit: Option<CommitInfo>,
    pub remotes: Vec<RemoteInfo>,
    pub is_bare: bool,
    pub is_empty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteInfo {
    pub name: String,
    pub fetch_url: Option<String>,
    pub push_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchInfo {
    pub name: String,
    pub is_current: bool,
    pub is_remote: bool,
    /// Abbreviated tip commit id
    pub commit: Option<String>,
    /// Tip commit subject
    pub label: Option<String>,
}

use git2::Repository;

use crate::error::{AppError, Result};
use crate::models::{CommitInfo, RemoteInfo, RepositoryInfo};
use crate::store::{RepoHandle, RepoId};

/// A staged repository opened for one request.
pub struct GitRepository {
    pub repo: Repository,
    pub id: RepoId,
}

impl GitRepository {
    pub fn open(handle: &RepoHandle) -> Result<Self> {
        let repo = Repository::open(&handle.path)
            .map_err(|_| AppError::RepoNotFound(handle.id.to_string()))?;

        Ok(Self { repo, id: handle.id })
    }

    pub fn info(&self) -> Result<RepositoryInfo> {
        let repo = &self.repo;
        let head = repo.head().ok();

        // An unborn HEAD still names its branch through the symbolic target
        let head_branch = match &head {
            Some(h) if h.is_branch() => h.shorthand().map(|s| s.to_string()),
            Some(_) => None,
            None => repo
                .find_reference("HEAD")
                .ok()
                .and_then(|r| r.symbolic_target().map(|t| t.to_string()))
                .map(|t| t.trim_start_matches("refs/heads/").to_string()),
        };

        let head_commit = head
            .as_ref()
            .and_then(|h| h.peel_to_commit().ok())
            .map(|c| commit_to_info(&c));

        Ok(RepositoryInfo {
            id: self.id.to_string(),
            head_branch,
            head_detached: repo.head_detached().unwrap_or(false),
            head_commit,
            remotes: self.remotes()?,
            is_bare: repo.is_bare(),
            is_empty: repo.is_empty().unwrap_or(true),
        })
    }

    pub fn remotes(&self) -> Result<Vec<RemoteInfo>> {
        let names = self.repo.remotes()?;
        let mut remotes = Vec::new();

        for name in names.iter().flatten() {
            let remote = self.repo.find_remote(name)?;
            let fetch_url = remote.url().map(|u| u.to_string());
            let push_url = remote.pushurl().map(|u| u.to_string()).or_else(|| fetch_url.clone());
            remotes.push(RemoteInfo {
                name: name.to_string(),
                fetch_url,
                push_url,
            });
        }

        Ok(remotes)
    }
}

pub fn commit_to_info(commit: &git2::Commit) -> CommitInfo {
    let timestamp = commit.time().seconds();
    CommitInfo {
        oid: commit.id().to_string(),
        message: commit.message().unwrap_or("").trim().to_string(),
        author: commit.author().name().unwrap_or("Unknown").to_string(),
        timestamp,
        relative_time: format_relative_time(timestamp),
    }
}

pub fn format_relative_time(timestamp: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let diff = now.saturating_sub(timestamp);

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        let mins = diff / 60;
        format!("{} minute{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if diff < 86400 {
        let hours = diff / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if diff < 2592000 {
        let days = diff / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else if diff < 31536000 {
        let months = diff / 2592000;
        format!("{} month{} ago", months, if months == 1 { "" } else { "s" })
    } else {
        let years = diff / 31536000;
        format!("{} year{} ago", years, if years == 1 { "" } else { "s" })
    }
}

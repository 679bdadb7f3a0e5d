//! Filesystem-backed repository store.
//!
//! Layout under the root directory:
//! - `<root>/<id>/.git`            staged repository
//! - `<root>/_staging_<id>/.git`   upload in progress, renamed on success
//!
//! Uploads are validated by opening the staged directory with git2 before
//! they become visible under their id.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, SystemTime};

use git2::Repository;

use crate::error::{AppError, Result};
use crate::store::{RepoHandle, RepoId, RepoStore, UploadedFile};

const STAGING_PREFIX: &str = "_staging_";

/// Files libgit2 follows to another git directory, wherever they appear.
const GITDIR_LINKS: &[&str] = &["commondir", "gitdir"];

/// Object database redirects, relative to `.git`.
const ALTERNATES: &[&str] = &["objects/info/alternates", "objects/info/http-alternates"];

#[derive(Debug)]
pub struct FsRepoStore {
    root: PathBuf,
}

impl FsRepoStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn repo_dir(&self, id: &RepoId) -> PathBuf {
        self.root.join(id.to_string())
    }

    fn staging_dir(&self, id: &RepoId) -> PathBuf {
        self.root.join(format!("{STAGING_PREFIX}{id}"))
    }

    fn stage(git_dir: &Path, files: &[UploadedFile]) -> Result<()> {
        fs::create_dir_all(git_dir)?;

        for file in files {
            let relative = sanitize_upload_path(&file.path)?;
            let target = git_dir.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, &file.contents)?;
        }

        Ok(())
    }
}

impl RepoStore for FsRepoStore {
    fn put(&self, id: &RepoId, files: Vec<UploadedFile>) -> Result<()> {
        if files.is_empty() {
            return Err(AppError::EmptyUpload);
        }

        let staging = self.staging_dir(id);
        let staged = Self::stage(&staging.join(".git"), &files).and_then(|()| {
            Repository::open(&staging)
                .map(drop)
                .map_err(|_| AppError::InvalidRepository)
        });

        if let Err(e) = staged {
            let _ = fs::remove_dir_all(&staging);
            return Err(e);
        }

        if let Err(e) = fs::rename(&staging, self.repo_dir(id)) {
            let _ = fs::remove_dir_all(&staging);
            return Err(e.into());
        }
        tracing::info!("Stored repository {} ({} files)", id, files.len());
        Ok(())
    }

    fn get(&self, id: &RepoId) -> Result<RepoHandle> {
        let path = self.repo_dir(id);
        if !path.join(".git").is_dir() {
            return Err(AppError::RepoNotFound(id.to_string()));
        }
        Ok(RepoHandle { id: *id, path })
    }

    fn delete(&self, id: &RepoId) -> Result<()> {
        match fs::remove_dir_all(self.repo_dir(id)) {
            Ok(()) => {
                tracing::info!("Deleted repository {}", id);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn sweep_expired(&self, ttl: Duration) -> Result<usize> {
        let now = SystemTime::now();
        let mut removed = 0;

        for entry in fs::read_dir(&self.root)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable store entry: {}", e);
                    continue;
                }
            };
            let name = entry.file_name();
            let name = name.to_string_lossy();

            // A concurrent delete or rename can make the entry vanish
            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", name, e);
                    continue;
                }
            };
            if !metadata.is_dir() {
                continue;
            }

            // Clock skew: a modification time in the future is never expired
            let age = metadata
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok());
            if !age.is_some_and(|age| age >= ttl) {
                continue;
            }

            match fs::remove_dir_all(entry.path()) {
                Ok(()) => {
                    tracing::debug!("Swept {}", name);
                    removed += 1;
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => tracing::warn!("Failed to sweep {}: {}", name, e),
            }
        }

        Ok(removed)
    }
}

/// Turn an upload file name into a path that stays inside `.git`.
///
/// Browsers that send the whole relative path (`repo/.git/HEAD`) are
/// accepted too: everything up to and including the `.git` component is
/// dropped.
///
/// Files that would point libgit2 at another git directory are rejected.
fn sanitize_upload_path(name: &str) -> Result<PathBuf> {
    let normalized = name.replace('\\', "/");
    let trimmed = match normalized.rfind(".git/") {
        Some(pos) if pos == 0 || normalized[..pos].ends_with('/') => &normalized[pos + 5..],
        _ => normalized.as_str(),
    };

    let mut path = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            _ => return Err(AppError::InvalidPath(name.to_string())),
        }
    }

    if path.as_os_str().is_empty() || is_redirect_file(&path) {
        return Err(AppError::InvalidPath(name.to_string()));
    }
    Ok(path)
}

fn is_redirect_file(path: &Path) -> bool {
    let is_gitdir_link = path
        .file_name()
        .is_some_and(|name| GITDIR_LINKS.iter().any(|link| name == *link));
    is_gitdir_link || ALTERNATES.iter().any(|alt| path == Path::new(alt))
}

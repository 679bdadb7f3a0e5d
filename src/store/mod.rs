//! Storage for uploaded repositories.
//!
//! A store maps an opaque `RepoId` to a staged git directory. Handlers only
//! see `RepoHandle`s; the on-disk layout stays inside the implementation.
//!
//! - `fs`: `FsRepoStore`, one directory per repository under a root folder

pub mod fs;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use uuid::Uuid;

use crate::error::{AppError, Result};

pub use fs::FsRepoStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RepoId(Uuid);

impl RepoId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a client-supplied id. Anything that is not a UUID cannot name a
    /// stored repository, so it maps to `RepoNotFound`.
    pub fn parse(value: &str) -> Result<Self> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| AppError::RepoNotFound(value.to_string()))
    }
}

impl Default for RepoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One file of an uploaded `.git` directory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Path relative to the `.git` directory, e.g. `objects/ab/cdef...`
    pub path: String,
    pub contents: Vec<u8>,
}

/// Location of a staged repository.
#[derive(Debug, Clone)]
pub struct RepoHandle {
    pub id: RepoId,
    /// Working directory containing `.git`
    pub path: PathBuf,
}

pub trait RepoStore: Send + Sync + fmt::Debug {
    /// Stage and validate an uploaded `.git` directory under `id`.
    fn put(&self, id: &RepoId, files: Vec<UploadedFile>) -> Result<()>;

    fn get(&self, id: &RepoId) -> Result<RepoHandle>;

    /// Remove a repository. Unknown ids are not an error.
    fn delete(&self, id: &RepoId) -> Result<()>;

    /// Remove every repository older than `ttl`, returning how many were removed.
    fn sweep_expired(&self, ttl: Duration) -> Result<usize>;
}

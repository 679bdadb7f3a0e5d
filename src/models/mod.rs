//! Data transfer objects (DTOs) for API responses.
//!
//! These structs are serialized to JSON for frontend consumption.
//! - `commit`: CommitInfo, CommitNode, CommitGraphResponse
//! - `repository`: UploadResponse, RepositoryInfo, RemoteInfo, BranchInfo

pub mod commit;
pub mod repository;

pub use commit::*;
pub use repository::*;

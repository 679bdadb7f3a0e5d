//! git2-backed access to staged repositories.
//!
//! - `repository`: open a staged repository, metadata and remotes
//! - `branches`: local and remote-tracking branch listing
//! - `log`: raw log production and the commit-graph pipeline

pub mod branches;
pub mod log;
pub mod repository;

pub use log::build_commit_graph;
pub use repository::GitRepository;

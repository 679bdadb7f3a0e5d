//! Commit-graph core: raw log text -> commit records -> positioned nodes.
//!
//! - `parser`: splits the raw log stream into `CommitRecord`s, recovering
//!   per record from short blocks and bad timestamps
//! - `layout`: assigns display ordinals and resolves parent/merge edges by
//!   hash lookup
//!
//! Both stages are pure. Everything here is built fresh per request.

pub mod layout;
pub mod parser;


pub use layout::{EdgeKind, GraphEdge, GraphLayout, PositionedNode, assign_layout};
pub use parser::{BLOCK_DELIMITER, CommitRecord, ParseWarning, ParsedLog, parse_log};

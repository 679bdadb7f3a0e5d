//! Single-lane layout.
//!
//! Every commit gets its input ordinal as the vertical index and lane 0 as
//! the horizontal index. Parent references are resolved by exact hash match
//! against the whole node set; references that fall outside the fetched
//! window produce no edge.

use std::collections::HashMap;

use serde::Serialize;

use crate::graph::parser::CommitRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedNode {
    pub record: CommitRecord,
    pub vertical_index: usize,
    pub horizontal_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Link to the first parent
    Parent,
    /// Link to a non-first parent of a merge commit
    Merge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    /// Vertical index of the child commit
    pub source: usize,
    /// Vertical index of the parent commit
    pub target: usize,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphLayout {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphLayout {
    pub fn merge_edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(|e| e.kind == EdgeKind::Merge)
    }
}

pub fn assign_layout(records: Vec<CommitRecord>) -> GraphLayout {
    // First occurrence wins if a hash is repeated.
    let mut index_by_hash: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        if let Some(hash) = record.hash.as_deref().filter(|h| !h.is_empty()) {
            index_by_hash.entry(hash).or_insert(idx);
        }
    }

    let resolve = |hash: &String| index_by_hash.get(hash.as_str()).copied();

    let mut edges = Vec::new();
    for (source, record) in records.iter().enumerate() {
        if let Some(target) = record.parent_hashes.first().and_then(resolve) {
            edges.push(GraphEdge {
                source,
                target,
                kind: EdgeKind::Parent,
            });
        }

        if record.is_merge() {
            for target in record.parent_hashes[1..].iter().filter_map(resolve) {
                edges.push(GraphEdge {
                    source,
                    target,
                    kind: EdgeKind::Merge,
                });
            }
        }
    }

    let nodes = records
        .into_iter()
        .enumerate()
        .map(|(vertical_index, record)| PositionedNode {
            record,
            vertical_index,
            horizontal_index: 0,
        })
        .collect();

    GraphLayout { nodes, edges }
}

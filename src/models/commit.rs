//! Commit DTOs.
//!
//! - `CommitInfo`: latest commit shown in repository info
//! - `CommitNode`: one positioned commit of the graph view
//! - `CommitGraphResponse`: nodes, resolved edges and parse warnings

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::graph::{GraphEdge, GraphLayout, ParseWarning, PositionedNode};

#[derive(Debug, Clone, Serialize)]
pub struct CommitInfo {
    pub oid: String,
    pub message: String,
    pub author: String,
    pub timestamp: i64,
    pub relative_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitNode {
    pub hash: Option<String>,
    pub message: Option<String>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    /// ISO-8601, UTC, millisecond precision
    pub date: String,
    pub parents: Vec<String>,
    pub graph: String,
    #[serde(rename = "verticalIndex")]
    pub vertical_index: usize,
    #[serde(rename = "horizontalIndex")]
    pub horizontal_index: usize,
}

impl From<PositionedNode> for CommitNode {
    fn from(node: PositionedNode) -> Self {
        let record = node.record;
        Self {
            hash: record.hash,
            message: record.message,
            author_name: record.author_name,
            author_email: record.author_email,
            date: format_iso_date(record.timestamp),
            parents: record.parent_hashes,
            graph: record.graph_marker,
            vertical_index: node.vertical_index,
            horizontal_index: node.horizontal_index,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitGraphResponse {
    pub commits: Vec<CommitNode>,
    pub edges: Vec<GraphEdge>,
    pub warnings: Vec<ParseWarning>,
}

impl CommitGraphResponse {
    pub fn new(layout: GraphLayout, warnings: Vec<ParseWarning>) -> Self {
        Self {
            commits: layout.nodes.into_iter().map(CommitNode::from).collect(),
            edges: layout.edges,
            warnings,
        }
    }
}

/// Render unix seconds as `2023-11-14T22:13:20.000Z`. Out-of-range values
/// render as the epoch.
pub fn format_iso_date(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{assign_layout, parse_log};

    #[test]
    fn test_format_iso_date() {
        assert_eq!(format_iso_date(1_700_000_000), "2023-11-14T22:13:20.000Z");
        assert_eq!(format_iso_date(0), "1970-01-01T00:00:00.000Z");
        assert_eq!(format_iso_date(i64::MAX), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_commit_node_json_shape() {
        let parsed = parse_log("graph1\nabc123\nInitial commit\nAlice\na@x.com\n1700000000\n\n");
        let response = CommitGraphResponse::new(assign_layout(parsed.commits), parsed.warnings);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json["commits"][0],
            serde_json::json!({
                "hash": "abc123",
                "message": "Initial commit",
                "author_name": "Alice",
                "author_email": "a@x.com",
                "date": "2023-11-14T22:13:20.000Z",
                "parents": [],
                "graph": "graph1",
                "verticalIndex": 0,
                "horizontalIndex": 0,
            })
        );
        assert_eq!(json["edges"], serde_json::json!([]));
        assert_eq!(json["warnings"], serde_json::json!([]));
    }

    #[test]
    fn test_invalid_timestamp_renders_epoch() {
        let parsed = parse_log("*\nabc\nSubject\nAlice\na@x.com\nsoon\n");
        let response = CommitGraphResponse::new(assign_layout(parsed.commits), parsed.warnings);

        assert_eq!(response.commits[0].date, "1970-01-01T00:00:00.000Z");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json["warnings"],
            serde_json::json!([{ "index": 0, "hash": "abc", "raw": "soon" }])
        );
    }
}

//! Log stream parser.
//!
//! Input format, one block per commit, blocks separated by a blank line:
//! ```text
//! <graph marker>
//! <hash>
//! <subject>
//! <author name>
//! <author email>
//! <author date, unix seconds>
//! <parent hashes, space separated, may be empty>
//! ```
//!
//! CRLF line endings are accepted. Parsing is best effort: a short block
//! still yields a record (with the missing fields absent) and a bad
//! timestamp falls back to the epoch.

use serde::Serialize;

/// Separator between commit blocks.
pub const BLOCK_DELIMITER: &str = "\n\n";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: Option<String>,
    pub message: Option<String>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    /// Seconds since the epoch. `0` when the source value was unusable.
    pub timestamp: i64,
    pub parent_hashes: Vec<String>,
    pub graph_marker: String,
}

impl CommitRecord {
    pub fn is_merge(&self) -> bool {
        self.parent_hashes.len() > 1
    }
}

/// A recovered timestamp problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    /// Ordinal of the record the warning belongs to.
    pub index: usize,
    pub hash: Option<String>,
    /// Timestamp text as it appeared in the stream, absent if the line was missing.
    pub raw: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLog {
    pub commits: Vec<CommitRecord>,
    pub warnings: Vec<ParseWarning>,
}

/// Parse a raw log stream into commit records, preserving input order.
pub fn parse_log(raw: &str) -> ParsedLog {
    let mut parsed = ParsedLog::default();

    let raw = raw.replace("\r\n", "\n");
    for block in raw.split(BLOCK_DELIMITER) {
        // An empty parent line right before the delimiter leaves newlines at
        // the start of the next block.
        let block = block.trim_start_matches('\n');
        if block.trim().is_empty() {
            continue;
        }

        let index = parsed.commits.len();
        let (record, timestamp_ok) = parse_block(block);

        if !timestamp_ok {
            let raw_timestamp = block.lines().nth(5).map(|s| s.trim().to_string());
            tracing::warn!(
                "Invalid timestamp for commit {}: {:?}",
                record.hash.as_deref().unwrap_or("<unknown>"),
                raw_timestamp
            );
            parsed.warnings.push(ParseWarning {
                index,
                hash: record.hash.clone(),
                raw: raw_timestamp,
            });
        }

        parsed.commits.push(record);
    }

    parsed
}

/// Parse a single non-empty block. The flag is `false` when the timestamp
/// fell back to the epoch.
fn parse_block(block: &str) -> (CommitRecord, bool) {
    let mut lines = block.lines();

    let graph_marker = lines.next().unwrap_or_default().to_string();
    let hash = lines.next().map(field);
    let message = lines.next().map(field);
    let author_name = lines.next().map(field);
    let author_email = lines.next().map(field);
    let timestamp = lines.next().and_then(parse_timestamp);
    let parent_hashes = lines
        .next()
        .map(|line| line.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();

    let record = CommitRecord {
        hash,
        message,
        author_name,
        author_email,
        timestamp: timestamp.unwrap_or(0),
        parent_hashes,
        graph_marker,
    };

    (record, timestamp.is_some())
}

fn field(line: &str) -> String {
    line.trim().to_string()
}

/// Accepts only integers that map onto a representable date.
fn parse_timestamp(line: &str) -> Option<i64> {
    let seconds = line.trim().parse::<i64>().ok()?;
    chrono::DateTime::from_timestamp(seconds, 0).map(|_| seconds)
}

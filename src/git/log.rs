//! Raw log production and the commit-graph pipeline.
//!
//! `LogSource` is the seam between git plumbing and the graph core: a source
//! produces the block-formatted text described in `graph::parser`, and
//! `build_commit_graph` runs it through parse and layout.
//!
//! The git2-backed source walks every ref plus HEAD (like `git log --all`)
//! in topological order, newest first.

use git2::{Repository, Sort};

use crate::error::Result;
use crate::git::repository::GitRepository;
use crate::graph::{BLOCK_DELIMITER, assign_layout, parse_log};
use crate::models::CommitGraphResponse;

/// Marker for commits with at most one parent.
const COMMIT_MARKER: &str = "*";
/// Marker for merge commits.
const MERGE_MARKER: &str = "M";

pub trait LogSource {
    /// Produce the raw log stream for the whole reachable history.
    fn raw_log(&self) -> Result<String>;
}

impl LogSource for GitRepository {
    fn raw_log(&self) -> Result<String> {
        render_log(&self.repo)
    }
}

/// Parse and lay out whatever the source produces.
pub fn build_commit_graph<S: LogSource + ?Sized>(source: &S) -> Result<CommitGraphResponse> {
    let raw = source.raw_log()?;
    let parsed = parse_log(&raw);

    let layout = assign_layout(parsed.commits);
    tracing::debug!(
        "Laid out {} commits with {} edges ({} merge, {} timestamp warnings)",
        layout.nodes.len(),
        layout.edges.len(),
        layout.merge_edges().count(),
        parsed.warnings.len()
    );

    Ok(CommitGraphResponse::new(layout, parsed.warnings))
}

fn render_log(repo: &Repository) -> Result<String> {
    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
    for namespace in ["heads", "remotes", "tags"] {
        revwalk.push_glob(namespace)?;
    }
    // Unborn HEAD (empty repository) has nothing to push
    if repo.head().is_ok() {
        revwalk.push_head()?;
    }

    let mut blocks = Vec::new();
    for oid in revwalk {
        let commit = repo.find_commit(oid?)?;
        let author = commit.author();

        let marker = if commit.parent_count() > 1 {
            MERGE_MARKER
        } else {
            COMMIT_MARKER
        };
        let parents = commit
            .parent_ids()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(" ");

        let lines = [
            marker.to_string(),
            commit.id().to_string(),
            single_line(commit.summary().unwrap_or("")),
            single_line(author.name().unwrap_or("")),
            single_line(author.email().unwrap_or("")),
            author.when().seconds().to_string(),
            single_line(&parents),
        ];
        blocks.push(lines.join("\n"));
    }

    Ok(blocks.join(BLOCK_DELIMITER))
}

/// A field must never become a blank line, or it would be read as a block
/// delimiter. Empty values are written as a single space, which the parser
/// trims back to an empty string.
fn single_line(value: &str) -> String {
    let value = value.replace(['\r', '\n'], " ");
    if value.trim().is_empty() {
        " ".to_string()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeKind;
    use crate::store::{RepoHandle, RepoId};
    use crate::test_support::{BASE_TIME, init_repo_with_history};
    use tempfile::TempDir;

    struct FixedLog(&'static str);

    impl LogSource for FixedLog {
        fn raw_log(&self) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingLog;

    impl LogSource for FailingLog {
        fn raw_log(&self) -> Result<String> {
            Err(git2::Error::from_str("log failed").into())
        }
    }

    #[test]
    fn test_build_commit_graph_from_fixed_text() {
        let graph = build_commit_graph(&FixedLog(
            "*\ndef456\nSecond\nAlice\na@x.com\n1700000100\nabc123\n\n*\nabc123\nFirst\nAlice\na@x.com\n1700000000\n\n",
        ))
        .unwrap();

        assert_eq!(graph.commits.len(), 2);
        assert_eq!(graph.commits[0].parents, vec!["abc123"]);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].kind, EdgeKind::Parent);
    }

    #[test]
    fn test_build_commit_graph_propagates_source_failure() {
        assert!(build_commit_graph(&FailingLog).is_err());
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line(""), " ");
        assert_eq!(single_line("   "), " ");
        assert_eq!(single_line("a\nb"), "a b");
        assert_eq!(single_line("subject"), "subject");
    }

    #[test]
    fn test_repository_graph() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let fixture = init_repo_with_history(&dir.path().join("repo"));
        let handle = RepoHandle {
            id: RepoId::new(),
            path: fixture.path.clone(),
        };
        let repo = GitRepository::open(&handle).unwrap();

        let graph = build_commit_graph(&repo).unwrap();
        assert!(graph.warnings.is_empty());

        let hashes: Vec<_> = graph
            .commits
            .iter()
            .map(|c| c.hash.clone().unwrap_or_default())
            .collect();
        assert_eq!(hashes.len(), 4);
        assert_eq!(hashes[0], fixture.merge.to_string());
        assert_eq!(hashes[3], fixture.root.to_string());

        let merge = &graph.commits[0];
        assert_eq!(merge.graph, MERGE_MARKER);
        assert_eq!(merge.message.as_deref(), Some("Merge feature"));
        assert_eq!(merge.author_name.as_deref(), Some("Alice"));
        assert_eq!(merge.author_email.as_deref(), Some("alice@example.com"));
        assert_eq!(
            merge.parents,
            vec![fixture.main.to_string(), fixture.feature.to_string()]
        );
        assert_eq!(merge.date, crate::models::format_iso_date(BASE_TIME + 300));

        let root = &graph.commits[3];
        assert!(root.parents.is_empty());
        assert_eq!(root.graph, COMMIT_MARKER);

        let feature_index = hashes
            .iter()
            .position(|h| *h == fixture.feature.to_string())
            .unwrap();
        let merges: Vec<_> = graph
            .edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Merge)
            .collect();
        assert_eq!(merges.len(), 1);
        assert_eq!(merges[0].source, 0);
        assert_eq!(merges[0].target, feature_index);

        // merge->main (parent), merge->feature, feature->root, main->root
        assert_eq!(graph.edges.len(), 4);
    }

    #[test]
    fn test_empty_repository_graph() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Repository::init(dir.path()).unwrap();
        let handle = RepoHandle {
            id: RepoId::new(),
            path: dir.path().to_path_buf(),
        };
        let repo = GitRepository::open(&handle).unwrap();

        assert_eq!(repo.raw_log().unwrap(), "");
        let graph = build_commit_graph(&repo).unwrap();
        assert!(graph.commits.is_empty());
        assert!(graph.edges.is_empty());
    }
}

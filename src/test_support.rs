//! Fixtures shared by the unit tests.

use std::fs;
use std::path::{Path, PathBuf};

use git2::{Commit, Oid, Repository, Signature, Time};

use crate::store::UploadedFile;

pub const BASE_TIME: i64 = 1_700_000_000;

/// A small repository with one merged feature branch:
///
/// ```text
/// *   merge    (main)  "Merge feature"
/// |\
/// | * feature  (feature) "Add feature"
/// * | main              "Main work"
/// |/
/// * root                "Initial commit"
/// ```
#[derive(Debug)]
pub struct FixtureRepo {
    pub path: PathBuf,
    pub root: Oid,
    pub feature: Oid,
    pub main: Oid,
    pub merge: Oid,
}

pub fn init_repo_with_history(path: &Path) -> FixtureRepo {
    let repo = Repository::init(path).expect("init repo");
    repo.set_head("refs/heads/main").expect("set HEAD");
    repo.remote("origin", "https://example.com/demo.git")
        .expect("add remote");

    let root = commit(&repo, "HEAD", "Initial commit", BASE_TIME, &[]);
    let root_commit = repo.find_commit(root).expect("root");

    let feature = commit(&repo, "refs/heads/feature", "Add feature", BASE_TIME + 100, &[&root_commit]);
    let main = commit(&repo, "HEAD", "Main work", BASE_TIME + 200, &[&root_commit]);

    let main_commit = repo.find_commit(main).expect("main");
    let feature_commit = repo.find_commit(feature).expect("feature");
    let merge = commit(
        &repo,
        "HEAD",
        "Merge feature\n\nLonger body that is not part of the subject",
        BASE_TIME + 300,
        &[&main_commit, &feature_commit],
    );

    FixtureRepo {
        path: path.to_path_buf(),
        root,
        feature,
        main,
        merge,
    }
}

fn commit(repo: &Repository, update_ref: &str, message: &str, secs: i64, parents: &[&Commit<'_>]) -> Oid {
    let sig = Signature::new("Alice", "alice@example.com", &Time::new(secs, 0)).expect("signature");
    let tree_id = repo.treebuilder(None).and_then(|b| b.write()).expect("empty tree");
    let tree = repo.find_tree(tree_id).expect("tree");
    repo.commit(Some(update_ref), &sig, &sig, message, &tree, parents)
        .expect("commit")
}

/// Every file below `<workdir>/.git`, named relative to `.git`.
pub fn collect_git_files(fixture: &FixtureRepo) -> Vec<UploadedFile> {
    fn walk(base: &Path, dir: &Path, out: &mut Vec<UploadedFile>) {
        for entry in fs::read_dir(dir).expect("read_dir") {
            let path = entry.expect("entry").path();
            if path.is_dir() {
                walk(base, &path, out);
            } else {
                let relative = path
                    .strip_prefix(base)
                    .expect("inside .git")
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().to_string())
                    .collect::<Vec<_>>()
                    .join("/");
                out.push(UploadedFile {
                    path: relative,
                    contents: fs::read(&path).expect("read file"),
                });
            }
        }
    }

    let base = fixture.path.join(".git");
    let mut files = Vec::new();
    walk(&base, &base, &mut files);
    files
}

pub const BOUNDARY: &str = "ggv-test-boundary";

/// Encode files as a `multipart/form-data` body with `files[]` fields.
pub fn multipart_body(files: &[UploadedFile]) -> Vec<u8> {
    let mut body = Vec::new();
    for file in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files[]\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                file.path
            )
            .as_bytes(),
        );
        body.extend_from_slice(&file.contents);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

use git2::{BranchType, ReferenceType};

use crate::error::Result;
use crate::git::repository::GitRepository;
use crate::models::BranchInfo;

const SHORT_ID_LEN: usize = 7;

impl GitRepository {
    /// Local branches first, then remote-tracking ones, each group sorted by name.
    pub fn list_branches(&self) -> Result<Vec<BranchInfo>> {
        let mut branches = Vec::new();

        for item in self.repo.branches(None)? {
            let (branch, branch_type) = item?;

            // Symbolic refs such as `origin/HEAD` duplicate a real branch
            if branch.get().kind() == Some(ReferenceType::Symbolic) {
                continue;
            }

            let Some(name) = branch.name()?.map(|n| n.to_string()) else {
                continue;
            };

            let tip = branch.get().peel_to_commit().ok();
            branches.push(BranchInfo {
                name,
                is_current: branch.is_head(),
                is_remote: matches!(branch_type, BranchType::Remote),
                commit: tip
                    .as_ref()
                    .map(|c| c.id().to_string().chars().take(SHORT_ID_LEN).collect()),
                label: tip.as_ref().and_then(|c| c.summary().map(|s| s.to_string())),
            });
        }

        branches.sort_by(|a, b| a.is_remote.cmp(&b.is_remote).then_with(|| a.name.cmp(&b.name)));

        Ok(branches)
    }
}

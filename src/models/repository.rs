//! Repository-level DTOs.
//!
//! - `RepositoryInfo`: repo metadata (header display)
//! - `BranchInfo`: one branch in the ref picker, current branch flagged

use serde::{Deserialize, Serialize};

use super::CommitListItem;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub name: String,
    pub path: String,
    pub head_branch: Option<String>,
    pub head_commit: Option<CommitListItem>,
    pub is_bare: bool,
    pub is_empty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchInfo {
    pub name: String,
    pub is_current: bool,
    pub is_remote: bool,
    pub last_commit: Option<CommitListItem>,
}

//! Ref queries backing the resolver, plus branch and tag listing.

use git2::{BranchType, Oid, Repository};

use crate::compare::{self, RefQueries, resolver::REMOTE};
use crate::error::Result;
use crate::git::repository::{GitRepository, commit_to_record};
use crate::models::{BranchInfo, CommitListItem, ResolvedRef};

/// `RefQueries` over a live repository. Every query that fails answers
/// `false`/`None`; the resolver's fallback chain takes it from there.
pub struct RepoRefQueries<'a> {
    repo: &'a Repository,
}

impl<'a> RepoRefQueries<'a> {
    pub fn new(repo: &'a Repository) -> Self {
        Self { repo }
    }

    fn commit_oid(&self, refname: &str) -> Option<Oid> {
        self.repo
            .revparse_single(refname)
            .ok()?
            .peel_to_commit()
            .ok()
            .map(|c| c.id())
    }
}

impl RefQueries for RepoRefQueries<'_> {
    fn local_ref_exists(&self, name: &str) -> bool {
        self.repo.find_branch(name, BranchType::Local).is_ok()
    }

    fn remote_ref_exists(&self, name: &str) -> bool {
        self.repo
            .find_branch(&format!("{REMOTE}/{name}"), BranchType::Remote)
            .is_ok()
    }

    fn resolve_to_commit_id(&self, refname: &str) -> Option<String> {
        self.commit_oid(refname).map(|oid| oid.to_string())
    }

    fn common_ancestor(&self, a: &str, b: &str) -> Option<String> {
        let a_id = self.commit_oid(a)?;
        let b_id = self.commit_oid(b)?;
        self.repo.merge_base(a_id, b_id).ok().map(|o| o.to_string())
    }

    fn count_commits_between(&self, base: &str, head: &str) -> Option<usize> {
        let base_id = self.commit_oid(base)?;
        let head_id = self.commit_oid(head)?;

        let mut revwalk = self.repo.revwalk().ok()?;
        revwalk.push(head_id).ok()?;
        revwalk.hide(base_id).ok()?;

        let mut count = 0;
        for oid in revwalk {
            oid.ok()?;
            count += 1;
        }
        Some(count)
    }
}

impl GitRepository {
    /// Resolve a short name to the concrete ref to query.
    pub fn resolve_ref(&self, name: &str) -> Result<ResolvedRef> {
        self.with_repo(|repo| Ok(compare::resolve_ref(name, &RepoRefQueries::new(repo))))
    }

    /// All local and remote branches, current branch flagged, locals
    /// first.
    pub fn list_branches(&self) -> Result<Vec<BranchInfo>> {
        self.with_repo(|repo| {
            let mut branches = Vec::new();

            for entry in repo.branches(None)? {
                let (branch, branch_type) = entry?;
                let Some(name) = branch.name()?.map(str::to_string) else {
                    continue;
                };
                // The symbolic origin/HEAD pointer is not a branch a
                // user would pick.
                if branch_type == BranchType::Remote && name.ends_with("/HEAD") {
                    continue;
                }

                let last_commit = branch
                    .get()
                    .peel_to_commit()
                    .ok()
                    .map(|c| CommitListItem::from_record(commit_to_record(&c)));

                branches.push(BranchInfo {
                    is_current: branch.is_head(),
                    is_remote: branch_type == BranchType::Remote,
                    name,
                    last_commit,
                });
            }

            branches.sort_by(|a, b| {
                (a.is_remote, a.name.to_lowercase()).cmp(&(b.is_remote, b.name.to_lowercase()))
            });

            Ok(branches)
        })
    }

    pub fn list_tags(&self) -> Result<Vec<String>> {
        self.with_repo(|repo| {
            let names = repo.tag_names(None)?;
            Ok(names.iter().flatten().map(str::to_string).collect())
        })
    }
}

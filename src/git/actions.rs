//! History-rewriting operations.
//!
//! Each is one underlying libgit2 operation behind a precondition
//! check; the underlying error message is surfaced verbatim and
//! nothing is retried. Destructive steps that hit conflicts are
//! rolled back before reporting.

use git2::build::CheckoutBuilder;
use git2::{BranchType, ErrorCode, Repository, ResetType, StashFlags, StatusOptions};

use crate::error::{AppError, Result};
use crate::git::repository::{GitRepository, commit_to_record, resolve_commit};
use crate::models::{BranchInfo, CommitListItem, CommitRecord};

impl GitRepository {
    /// Create a local branch at `start_ref` (HEAD when absent).
    pub fn create_branch(&self, name: &str, start_ref: Option<&str>) -> Result<BranchInfo> {
        self.with_repo(|repo| {
            let target = match start_ref {
                Some(refname) => resolve_commit(repo, refname)?,
                None => repo.head()?.peel_to_commit()?,
            };

            let branch = repo.branch(name, &target, false).map_err(|e| {
                if e.code() == ErrorCode::Exists {
                    AppError::InvalidRequest(format!("branch '{}' already exists", name))
                } else {
                    AppError::Git(e)
                }
            })?;

            tracing::info!(branch = name, target = %target.id(), "created branch");

            Ok(BranchInfo {
                name: name.to_string(),
                is_current: branch.is_head(),
                is_remote: false,
                last_commit: Some(CommitListItem::from_record(commit_to_record(&target))),
            })
        })
    }

    /// Delete a local branch. The checked-out branch is refused.
    pub fn delete_branch(&self, name: &str) -> Result<()> {
        self.with_repo(|repo| {
            let mut branch = repo
                .find_branch(name, BranchType::Local)
                .map_err(|_| AppError::RefNotFound(name.to_string()))?;

            if branch.is_head() {
                return Err(AppError::PreconditionFailed(format!(
                    "branch '{}' is checked out",
                    name
                )));
            }

            branch.delete()?;
            tracing::info!(branch = name, "deleted branch");
            Ok(())
        })
    }

    /// Stash working tree changes, untracked files included.
    pub fn stash_changes(&self, message: Option<&str>) -> Result<String> {
        self.with_repo_mut(|repo| {
            let stasher = repo.signature()?;
            let message = message.filter(|m| !m.is_empty()).unwrap_or("gitscope stash");

            let oid = repo
                .stash_save(&stasher, message, Some(StashFlags::INCLUDE_UNTRACKED))
                .map_err(|e| {
                    if e.code() == ErrorCode::NotFound {
                        AppError::PreconditionFailed("nothing to stash".to_string())
                    } else {
                        AppError::Git(e)
                    }
                })?;

            tracing::info!(stash = %oid, "stashed working tree");
            Ok(oid.to_string())
        })
    }

    /// Hard-reset HEAD (and the working tree) to `refname`.
    pub fn hard_reset(&self, refname: &str) -> Result<CommitRecord> {
        self.with_repo(|repo| {
            let target = resolve_commit(repo, refname)?;
            repo.reset(target.as_object(), ResetType::Hard, None)?;

            tracing::info!(target = %target.id(), "hard reset");
            Ok(commit_to_record(&target))
        })
    }

    /// Apply one commit onto HEAD. Requires a clean working tree;
    /// a conflicting pick is rolled back.
    pub fn cherry_pick(&self, refname: &str) -> Result<CommitRecord> {
        self.with_repo(|repo| {
            ensure_clean_worktree(repo)?;

            let commit = resolve_commit(repo, refname)?;
            let head = repo.head()?.peel_to_commit()?;

            let mut opts = git2::CherrypickOptions::new();
            let mut checkout = CheckoutBuilder::new();
            checkout.allow_conflicts(true).force();
            opts.checkout_builder(checkout);

            // A conflicting pick surfaces through the index below.
            if let Err(e) = repo.cherrypick(&commit, Some(&mut opts)) {
                if e.code() != ErrorCode::MergeConflict {
                    return Err(AppError::Git(e));
                }
            }

            let mut index = repo.index()?;
            if index.has_conflicts() {
                repo.reset(head.as_object(), ResetType::Hard, None)?;
                repo.cleanup_state().ok();
                return Err(AppError::PreconditionFailed(format!(
                    "cherry-pick of {} hit conflicts; rolled back",
                    commit.id()
                )));
            }

            let tree = repo.find_tree(index.write_tree()?)?;
            let author = commit.author();
            let committer = repo.signature()?;
            let message = commit.message().unwrap_or("");
            let new_oid = repo.commit(Some("HEAD"), &author, &committer, message, &tree, &[&head])?;

            repo.cleanup_state().ok();
            let mut checkout = CheckoutBuilder::new();
            checkout.force();
            repo.checkout_head(Some(&mut checkout))?;

            tracing::info!(picked = %commit.id(), created = %new_oid, "cherry-picked commit");
            Ok(commit_to_record(&repo.find_commit(new_oid)?))
        })
    }

    /// Rebase `branch` onto `upstream`. Requires a clean working
    /// tree; the first conflict aborts the whole rebase.
    pub fn rebase_branch(&self, branch: &str, upstream: &str) -> Result<usize> {
        self.with_repo(|repo| {
            ensure_clean_worktree(repo)?;

            let branch_ref = repo
                .find_branch(branch, BranchType::Local)
                .map_err(|_| AppError::RefNotFound(branch.to_string()))?
                .into_reference();
            let branch_commit = repo.reference_to_annotated_commit(&branch_ref)?;
            let upstream_commit = repo.find_annotated_commit(resolve_commit(repo, upstream)?.id())?;

            let mut rebase =
                repo.rebase(Some(&branch_commit), Some(&upstream_commit), None, None)?;
            let committer = repo.signature()?;
            let mut applied = 0;

            loop {
                let Some(step) = rebase.next() else { break };
                if let Err(e) = step {
                    rebase.abort()?;
                    return Err(AppError::Git(e));
                }

                if repo.index()?.has_conflicts() {
                    rebase.abort()?;
                    return Err(AppError::PreconditionFailed(format!(
                        "rebase of '{}' onto '{}' hit conflicts; aborted",
                        branch, upstream
                    )));
                }

                match rebase.commit(None, &committer, None) {
                    Ok(_) => applied += 1,
                    // An already-applied patch produces an empty commit;
                    // skip it the way plain `git rebase` does.
                    Err(e) if e.code() == ErrorCode::Applied => {}
                    Err(e) => {
                        rebase.abort()?;
                        return Err(AppError::Git(e));
                    }
                }
            }

            rebase.finish(None)?;
            tracing::info!(branch, upstream, applied, "rebased branch");
            Ok(applied)
        })
    }
}

fn ensure_clean_worktree(repo: &Repository) -> Result<()> {
    let mut opts = StatusOptions::new();
    opts.include_untracked(false).include_ignored(false);

    let statuses = repo.statuses(Some(&mut opts))?;
    if !statuses.is_empty() {
        return Err(AppError::PreconditionFailed(format!(
            "working tree has {} uncommitted change(s)",
            statuses.len()
        )));
    }
    Ok(())
}

//! Commit listing over a resolved ref.
//!
//! Every listing is a bounded revwalk recomputed per request; nothing
//! is cached between calls. Newest-first (`Sort::TIME`).

use git2::Sort;

use crate::error::Result;
use crate::git::repository::{GitRepository, commit_to_record, resolve_commit};
use crate::models::{CommitRecord, ContributorInfo};

/// Per-side cap when feeding the divergence engine.
pub const COMPARE_LIST_LIMIT: usize = 150;
/// Hard ceiling for any caller-supplied limit.
pub const MAX_LIST_LIMIT: usize = 200;

/// How far back the contributor scan looks.
const CONTRIBUTOR_SCAN_LIMIT: usize = 1000;

/// Case-insensitive substring filters for the browse view.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub author: Option<String>,
    pub message: Option<String>,
}

impl HistoryFilter {
    fn matches(&self, record: &CommitRecord) -> bool {
        let author_ok = match self.author.as_deref() {
            Some(f) if !f.is_empty() => record.author.to_lowercase().contains(&f.to_lowercase()),
            _ => true,
        };
        let message_ok = match self.message.as_deref() {
            Some(f) if !f.is_empty() => record.message.to_lowercase().contains(&f.to_lowercase()),
            _ => true,
        };
        author_ok && message_ok
    }
}

impl GitRepository {
    /// List up to `max` commits reachable from `refname`, newest first.
    pub fn list_commits(&self, refname: &str, max: usize) -> Result<Vec<CommitRecord>> {
        self.with_repo(|repo| {
            let tip = resolve_commit(repo, refname)?;

            let mut revwalk = repo.revwalk()?;
            revwalk.set_sorting(Sort::TIME)?;
            revwalk.push(tip.id())?;

            let mut commits = Vec::new();
            for oid in revwalk {
                if commits.len() >= max {
                    break;
                }
                let oid = oid?;
                commits.push(commit_to_record(&repo.find_commit(oid)?));
            }

            Ok(commits)
        })
    }

    /// Paginated, filtered listing for the history browse view.
    ///
    /// Returns the page plus whether more matches exist beyond it.
    pub fn browse_commits(
        &self,
        refname: &str,
        filter: &HistoryFilter,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<CommitRecord>, bool)> {
        self.with_repo(|repo| {
            let tip = resolve_commit(repo, refname)?;

            let mut revwalk = repo.revwalk()?;
            revwalk.set_sorting(Sort::TIME)?;
            revwalk.push(tip.id())?;

            let mut matched = 0usize;
            let mut page = Vec::new();
            let mut has_more = false;

            for oid in revwalk {
                let oid = oid?;
                let record = commit_to_record(&repo.find_commit(oid)?);
                if !filter.matches(&record) {
                    continue;
                }

                matched += 1;
                if matched <= offset {
                    continue;
                }
                if page.len() < limit {
                    page.push(record);
                } else {
                    has_more = true;
                    break;
                }
            }

            Ok((page, has_more))
        })
    }

    /// Authors with commit counts for the filter dropdown, most
    /// prolific first. Scans a bounded slice of recent history.
    pub fn contributors(&self, refname: &str) -> Result<Vec<ContributorInfo>> {
        self.with_repo(|repo| {
            let tip = resolve_commit(repo, refname)?;

            let mut revwalk = repo.revwalk()?;
            revwalk.set_sorting(Sort::TIME)?;
            revwalk.push(tip.id())?;

            let mut contributor_map: std::collections::HashMap<String, (String, usize)> =
                std::collections::HashMap::new();

            for (seen, oid) in revwalk.enumerate() {
                if seen >= CONTRIBUTOR_SCAN_LIMIT {
                    break;
                }
                let oid = oid?;
                let commit = repo.find_commit(oid)?;
                let author = commit.author();
                let email = author.email().unwrap_or("").to_string();
                let name = author.name().unwrap_or("Unknown").to_string();

                contributor_map
                    .entry(email)
                    .and_modify(|(_, count)| *count += 1)
                    .or_insert((name, 1));
            }

            let mut contributors: Vec<ContributorInfo> = contributor_map
                .into_iter()
                .map(|(email, (name, count))| ContributorInfo {
                    name,
                    email,
                    commit_count: count,
                })
                .collect();

            contributors.sort_by(|a, b| b.commit_count.cmp(&a.commit_count));

            Ok(contributors)
        })
    }
}

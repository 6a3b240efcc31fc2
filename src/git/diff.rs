//! Diff between two resolved refs.
//!
//! `from` defaults to the first parent of `to`, so a single commit can
//! be viewed against its parent. Contents are included per file for
//! side-by-side rendering, except for binaries.

use git2::{Delta, DiffOptions, Repository};
use std::path::Path;

use crate::error::{AppError, Result};
use crate::git::repository::{GitRepository, resolve_commit};
use crate::models::{DiffHunk, DiffLine, DiffResponse, DiffStats, DiffStatus, FileDiff, LineType};

impl GitRepository {
    pub fn diff_refs(
        &self,
        from_ref: Option<&str>,
        to_ref: &str,
        path: Option<&str>,
    ) -> Result<DiffResponse> {
        self.with_repo(|repo| {
            let to = resolve_commit(repo, to_ref)?;
            let to_tree = to.tree()?;

            let from_tree = if let Some(from_name) = from_ref {
                Some(resolve_commit(repo, from_name)?.tree()?)
            } else if to.parent_count() > 0 {
                Some(to.parent(0)?.tree()?)
            } else {
                None
            };

            let mut opts = DiffOptions::new();
            opts.context_lines(3);
            if let Some(p) = path {
                if !p.is_empty() {
                    opts.pathspec(p);
                }
            }

            let diff =
                repo.diff_tree_to_tree(from_tree.as_ref(), Some(&to_tree), Some(&mut opts))?;

            let mut files = Vec::new();
            let mut stats = DiffStats::default();

            for (delta_idx, delta) in diff.deltas().enumerate() {
                let old_path = delta
                    .old_file()
                    .path()
                    .map(|p| p.to_string_lossy().to_string());
                let new_path = delta
                    .new_file()
                    .path()
                    .map(|p| p.to_string_lossy().to_string());
                let is_binary = delta.flags().is_binary();

                let old_content = match (&old_path, is_binary, from_tree.as_ref()) {
                    (Some(p), false, Some(tree)) => blob_content(repo, tree, p).ok(),
                    _ => None,
                };
                let new_content = match (&new_path, is_binary) {
                    (Some(p), false) => blob_content(repo, &to_tree, p).ok(),
                    _ => None,
                };

                let hunks = collect_hunks(&diff, delta_idx, &mut stats)?;

                files.push(FileDiff {
                    old_path,
                    new_path,
                    status: delta_status(delta.status()),
                    hunks,
                    old_content,
                    new_content,
                    is_binary,
                });

                stats.files_changed += 1;
            }

            Ok(DiffResponse {
                from_ref: from_ref.map(str::to_string),
                to_ref: to_ref.to_string(),
                path: path.map(str::to_string),
                files,
                stats,
            })
        })
    }
}

fn delta_status(status: Delta) -> DiffStatus {
    match status {
        Delta::Added => DiffStatus::Added,
        Delta::Deleted => DiffStatus::Deleted,
        Delta::Modified => DiffStatus::Modified,
        Delta::Renamed => DiffStatus::Renamed,
        Delta::Copied => DiffStatus::Copied,
        Delta::Typechange => DiffStatus::TypeChanged,
        _ => DiffStatus::Unmodified,
    }
}

fn collect_hunks(diff: &git2::Diff, delta_idx: usize, stats: &mut DiffStats) -> Result<Vec<DiffHunk>> {
    let mut hunks = Vec::new();

    let Some(patch) = git2::Patch::from_diff(diff, delta_idx)? else {
        return Ok(hunks);
    };

    for hunk_idx in 0..patch.num_hunks() {
        let (hunk, _) = patch.hunk(hunk_idx)?;
        let mut lines = Vec::new();

        for line_idx in 0..patch.num_lines_in_hunk(hunk_idx)? {
            let line = patch.line_in_hunk(hunk_idx, line_idx)?;

            let line_type = match line.origin() {
                '+' => {
                    stats.insertions += 1;
                    LineType::Addition
                }
                '-' => {
                    stats.deletions += 1;
                    LineType::Deletion
                }
                ' ' => LineType::Context,
                _ => LineType::Header,
            };

            lines.push(DiffLine {
                line_type,
                old_lineno: line.old_lineno(),
                new_lineno: line.new_lineno(),
                content: String::from_utf8_lossy(line.content()).to_string(),
            });
        }

        hunks.push(DiffHunk {
            old_start: hunk.old_start(),
            old_lines: hunk.old_lines(),
            new_start: hunk.new_start(),
            new_lines: hunk.new_lines(),
            header: String::from_utf8_lossy(hunk.header()).to_string(),
            lines,
        });
    }

    Ok(hunks)
}

fn blob_content(repo: &Repository, tree: &git2::Tree, path: &str) -> Result<String> {
    let entry = tree
        .get_path(Path::new(path))
        .map_err(|_| AppError::RefNotFound(path.to_string()))?;

    let obj = entry.to_object(repo)?;
    let blob = obj
        .as_blob()
        .ok_or_else(|| AppError::InvalidRequest(format!("{} is not a file", path)))?;

    String::from_utf8(blob.content().to_vec())
        .map_err(|_| AppError::Internal("File is not valid UTF-8".to_string()))
}

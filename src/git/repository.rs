use git2::Repository;
use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};

use crate::error::{AppError, Result};
use crate::models::{CommitListItem, CommitRecord, RepositoryInfo};

pub struct GitRepository {
    pub repo: Mutex<Repository>,
    pub path: String,
}

impl GitRepository {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let repo =
            Repository::discover(&path).map_err(|_| AppError::RepoNotFound(path_str.clone()))?;

        Ok(Self {
            repo: Mutex::new(repo),
            path: path_str,
        })
    }

    pub fn info(&self) -> Result<RepositoryInfo> {
        self.with_repo(|repo| {
            let name = Path::new(&self.path)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "Unknown".to_string());

            let head_branch = repo.head().ok().and_then(|h| {
                if h.is_branch() {
                    h.shorthand().map(|s| s.to_string())
                } else {
                    None
                }
            });

            let head_commit = repo.head().ok().and_then(|h| {
                h.peel_to_commit()
                    .ok()
                    .map(|c| CommitListItem::from_record(commit_to_record(&c)))
            });

            Ok(RepositoryInfo {
                name,
                path: self.path.clone(),
                head_branch,
                head_commit,
                is_bare: repo.is_bare(),
                is_empty: repo.is_empty().unwrap_or(true),
            })
        })
    }

    pub fn with_repo<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Repository) -> Result<T>,
    {
        let repo = self
            .repo
            .lock()
            .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;
        f(&repo)
    }

    pub fn with_repo_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Repository) -> Result<T>,
    {
        let mut repo = self
            .repo
            .lock()
            .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;
        f(&mut repo)
    }
}

/// Build the canonical commit record: raw `Name <email>` author,
/// first line of the message.
pub fn commit_to_record(commit: &git2::Commit) -> CommitRecord {
    let author = commit.author();
    let name = author.name().unwrap_or("Unknown");
    let raw_author = match author.email() {
        Some(email) if !email.is_empty() => format!("{} <{}>", name, email),
        _ => name.to_string(),
    };

    CommitRecord {
        hash: commit.id().to_string(),
        author: raw_author,
        timestamp: commit.time().seconds(),
        message: commit.summary().unwrap_or("").to_string(),
    }
}

/// Resolve any rev (branch, `origin/...`, tag, SHA) to a commit.
pub(crate) fn resolve_commit<'r>(repo: &'r Repository, refname: &str) -> Result<git2::Commit<'r>> {
    let obj = repo
        .revparse_single(refname)
        .map_err(|_| AppError::RefNotFound(refname.to_string()))?;
    obj.peel_to_commit()
        .map_err(|_| AppError::RefNotFound(refname.to_string()))
}

pub type SharedRepo = Arc<RwLock<GitRepository>>;

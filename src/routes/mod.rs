//! API route handlers - maps HTTP endpoints to git operations.
//!
//! Each submodule defines routes for a feature area:
//! - `repository`: Basic repo info (GET /api/v1/repository)
//! - `branches`: Branch listing, create/delete, tags
//! - `commits`: Commit history browsing with filtering
//! - `compare`: Two-ref divergence report
//! - `diff`: Diff between refs
//! - `actions`: Stash, cherry-pick, rebase, hard reset

pub mod actions;
pub mod branches;
pub mod commits;
pub mod compare;
pub mod diff;
pub mod repository;

use std::sync::{Arc, RwLock};

use axum::Router;

use crate::git::SharedRepo;

/// Last-used compare inputs. The only state that outlives a request,
/// kept solely to prepopulate the panel's next comparison.
#[derive(Debug, Default)]
pub struct CompareSession {
    pub last_from: Option<String>,
    pub last_to: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub repo: SharedRepo,
    pub session: Arc<RwLock<CompareSession>>,
}

impl AppState {
    pub fn new(repo: SharedRepo) -> Self {
        Self {
            repo,
            session: Arc::new(RwLock::new(CompareSession::default())),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(repository::routes(state.clone()))
        .merge(branches::routes(state.clone()))
        .merge(commits::routes(state.clone()))
        .merge(compare::routes(state.clone()))
        .merge(diff::routes(state.clone()))
        .merge(actions::routes(state))
}

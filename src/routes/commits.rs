//! Commit history browsing.
//!
//! - GET /api/v1/repository/commits?ref&limit&offset&author&message
//!   The ref goes through the resolver, so `main` may come back as
//!   `origin/main`; the response says which. Filters are
//!   case-insensitive substrings.
//!
//! - GET /api/v1/repository/contributors?ref
//!   Authors with commit counts for the filter dropdown.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::git::history::{HistoryFilter, MAX_LIST_LIMIT};
use crate::models::{CommitListItem, CommitListResponse, ContributorInfo, ResolvedRef};
use crate::routes::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/repository/commits", get(get_commits))
        .route("/api/v1/repository/contributors", get(get_contributors))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct CommitsQuery {
    #[serde(rename = "ref")]
    ref_name: Option<String>,
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default)]
    offset: usize,
    author: Option<String>,
    message: Option<String>,
}

fn default_limit() -> usize {
    50
}

async fn get_commits(
    State(state): State<AppState>,
    Query(query): Query<CommitsQuery>,
) -> Result<Json<CommitListResponse>> {
    let repo = state
        .repo
        .read()
        .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;

    // HEAD is already concrete; everything else is resolved first.
    let resolved = match query.ref_name.as_deref() {
        Some(name) if !name.is_empty() => repo.resolve_ref(name)?,
        _ => ResolvedRef {
            query_ref: "HEAD".to_string(),
            used_remote: false,
        },
    };

    let filter = HistoryFilter {
        author: query.author,
        message: query.message,
    };
    let limit = query.limit.clamp(1, MAX_LIST_LIMIT);

    let (commits, has_more) =
        repo.browse_commits(&resolved.query_ref, &filter, limit, query.offset)?;

    Ok(Json(CommitListResponse {
        query_ref: resolved.query_ref,
        used_remote: resolved.used_remote,
        commits: commits.into_iter().map(CommitListItem::from_record).collect(),
        has_more,
    }))
}

#[derive(Debug, Deserialize)]
struct ContributorsQuery {
    #[serde(rename = "ref")]
    ref_name: Option<String>,
}

async fn get_contributors(
    State(state): State<AppState>,
    Query(query): Query<ContributorsQuery>,
) -> Result<Json<Vec<ContributorInfo>>> {
    let repo = state
        .repo
        .read()
        .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;

    let refname = match query.ref_name.as_deref() {
        Some(name) if !name.is_empty() => repo.resolve_ref(name)?.query_ref,
        _ => "HEAD".to_string(),
    };

    let contributors = repo.contributors(&refname)?;
    Ok(Json(contributors))
}

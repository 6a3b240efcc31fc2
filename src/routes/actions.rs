//! History-rewriting endpoints.
//!
//! Each validates a precondition, invokes one underlying operation,
//! and reports the underlying error verbatim on failure. No retries.
//!
//! - POST /api/v1/repository/stash { message? }
//! - POST /api/v1/repository/cherry-pick { commit }
//! - POST /api/v1/repository/rebase { branch, upstream }
//! - POST /api/v1/repository/reset { ref }

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::CommitListItem;
use crate::routes::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/repository/stash", post(stash))
        .route("/api/v1/repository/cherry-pick", post(cherry_pick))
        .route("/api/v1/repository/rebase", post(rebase))
        .route("/api/v1/repository/reset", post(reset))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct StashRequest {
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct StashResponse {
    stash_id: String,
}

async fn stash(
    State(state): State<AppState>,
    Json(request): Json<StashRequest>,
) -> Result<Json<StashResponse>> {
    let repo = state
        .repo
        .read()
        .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;
    let stash_id = repo.stash_changes(request.message.as_deref())?;
    Ok(Json(StashResponse { stash_id }))
}

#[derive(Debug, Deserialize)]
struct CherryPickRequest {
    commit: String,
}

async fn cherry_pick(
    State(state): State<AppState>,
    Json(request): Json<CherryPickRequest>,
) -> Result<Json<CommitListItem>> {
    let repo = state
        .repo
        .read()
        .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;
    let created = repo.cherry_pick(&request.commit)?;
    Ok(Json(CommitListItem::from_record(created)))
}

#[derive(Debug, Deserialize)]
struct RebaseRequest {
    branch: String,
    upstream: String,
}

#[derive(Debug, Serialize)]
struct RebaseResponse {
    applied: usize,
}

async fn rebase(
    State(state): State<AppState>,
    Json(request): Json<RebaseRequest>,
) -> Result<Json<RebaseResponse>> {
    let repo = state
        .repo
        .read()
        .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;
    let applied = repo.rebase_branch(&request.branch, &request.upstream)?;
    Ok(Json(RebaseResponse { applied }))
}

#[derive(Debug, Deserialize)]
struct ResetRequest {
    #[serde(rename = "ref")]
    ref_name: String,
}

async fn reset(
    State(state): State<AppState>,
    Json(request): Json<ResetRequest>,
) -> Result<Json<CommitListItem>> {
    let repo = state
        .repo
        .read()
        .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;
    let target = repo.hard_reset(&request.ref_name)?;
    Ok(Json(CommitListItem::from_record(target)))
}

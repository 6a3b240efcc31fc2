//! Branch and tag endpoints.
//!
//! - GET /api/v1/repository/branches
//!   Lists local and remote branches with the current branch flagged.
//!   Used by: ref picker in the panel header
//!
//! - POST /api/v1/repository/branches { name, start_ref? }
//!   Creates a local branch at the given ref (HEAD when omitted).
//!
//! - DELETE /api/v1/repository/branches/{name}
//!   Deletes a local branch; the checked-out branch is refused.
//!
//! - GET /api/v1/repository/tags
//!   Lists tag names for the ref picker.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::BranchInfo;
use crate::routes::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/v1/repository/branches",
            get(list_branches).post(create_branch),
        )
        .route("/api/v1/repository/branches/{*name}", delete(delete_branch))
        .route("/api/v1/repository/tags", get(list_tags))
        .with_state(state)
}

async fn list_branches(State(state): State<AppState>) -> Result<Json<Vec<BranchInfo>>> {
    let repo = state
        .repo
        .read()
        .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;
    let branches = repo.list_branches()?;
    Ok(Json(branches))
}

#[derive(Debug, Deserialize)]
struct CreateBranchRequest {
    name: String,
    start_ref: Option<String>,
}

async fn create_branch(
    State(state): State<AppState>,
    Json(request): Json<CreateBranchRequest>,
) -> Result<Json<BranchInfo>> {
    if request.name.is_empty() {
        return Err(AppError::InvalidRequest("branch name is empty".to_string()));
    }

    let repo = state
        .repo
        .read()
        .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;
    let branch = repo.create_branch(&request.name, request.start_ref.as_deref())?;
    Ok(Json(branch))
}

async fn delete_branch(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<()>> {
    let repo = state
        .repo
        .read()
        .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;
    repo.delete_branch(&name)?;
    Ok(Json(()))
}

async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let repo = state
        .repo
        .read()
        .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;
    let tags = repo.list_tags()?;
    Ok(Json(tags))
}

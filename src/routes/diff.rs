use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::DiffResponse;
use crate::routes::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/repository/diff", get(get_diff))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct DiffQuery {
    from: Option<String>,
    to: String,
    path: Option<String>,
}

async fn get_diff(
    State(state): State<AppState>,
    Query(query): Query<DiffQuery>,
) -> Result<Json<DiffResponse>> {
    let repo = state
        .repo
        .read()
        .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;
    let response = repo.diff_refs(query.from.as_deref(), &query.to, query.path.as_deref())?;
    Ok(Json(response))
}

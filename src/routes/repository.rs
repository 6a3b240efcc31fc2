use axum::{Json, Router, extract::State, routing::get};

use crate::error::{AppError, Result};
use crate::models::RepositoryInfo;
use crate::routes::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/repository", get(get_repository_info))
        .with_state(state)
}

async fn get_repository_info(State(state): State<AppState>) -> Result<Json<RepositoryInfo>> {
    let repo = state
        .repo
        .read()
        .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;
    let info = repo.info()?;
    Ok(Json(info))
}

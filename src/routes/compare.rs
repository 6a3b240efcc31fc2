//! Two-ref comparison.
//!
//! - GET /api/v1/repository/compare?from&to&hide_identical&author
//!   Resolves both names, lists both sides (capped), runs the
//!   divergence engine, and remembers the pair for next time.
//!
//! - GET /api/v1/repository/compare/defaults
//!   The remembered pair, for prepopulating the form.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::compare::{CompareOptions, compute_divergence};
use crate::error::{AppError, Result};
use crate::git::history::COMPARE_LIST_LIMIT;
use crate::models::{CompareDefaults, CompareResponse};
use crate::routes::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/repository/compare", get(compare_refs))
        .route("/api/v1/repository/compare/defaults", get(compare_defaults))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct CompareQuery {
    from: String,
    to: String,
    #[serde(default)]
    hide_identical: bool,
    author: Option<String>,
}

async fn compare_refs(
    State(state): State<AppState>,
    Query(query): Query<CompareQuery>,
) -> Result<Json<CompareResponse>> {
    if query.from.is_empty() || query.to.is_empty() {
        return Err(AppError::InvalidRequest(
            "both 'from' and 'to' refs are required".to_string(),
        ));
    }

    let repo = state
        .repo
        .read()
        .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;

    let from = repo.resolve_ref(&query.from)?;
    let to = repo.resolve_ref(&query.to)?;
    tracing::debug!(from = %from.query_ref, to = %to.query_ref, "comparing refs");

    let from_commits = repo.list_commits(&from.query_ref, COMPARE_LIST_LIMIT)?;
    let to_commits = repo.list_commits(&to.query_ref, COMPARE_LIST_LIMIT)?;

    let options = CompareOptions {
        hide_identical: query.hide_identical,
        author_filter: query.author,
    };
    let report = compute_divergence(&from_commits, &to_commits, &options);

    {
        let mut session = state
            .session
            .write()
            .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;
        session.last_from = Some(query.from.clone());
        session.last_to = Some(query.to.clone());
    }

    Ok(Json(CompareResponse {
        from,
        to,
        from_total: from_commits.len(),
        to_total: to_commits.len(),
        only_in_from_count: report.only_in_from.len(),
        only_in_to_count: report.only_in_to.len(),
        changed_message_count: report.changed_message.len(),
        report,
    }))
}

async fn compare_defaults(State(state): State<AppState>) -> Result<Json<CompareDefaults>> {
    let session = state
        .session
        .read()
        .map_err(|_| AppError::Internal("Lock poisoned".to_string()))?;
    Ok(Json(CompareDefaults {
        from: session.last_from.clone(),
        to: session.last_to.clone(),
    }))
}

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::CandidateItem,
    routes::AppState,
    services::ranking,
};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    pub page: usize,
}

fn first_page() -> usize {
    1
}

/// Handler for recommendations endpoint
///
/// Computes the user's recommendation list and returns one page of it.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<u64>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<CandidateItem>>> {
    if query.page == 0 {
        return Err(AppError::InvalidInput("page must be >= 1".to_string()));
    }

    let recommendations = state.engine.generate_recommendations(user_id).await;
    let page = ranking::page(&recommendations, query.page).to_vec();

    tracing::debug!(
        user_id = user_id,
        page = query.page,
        items = page.len(),
        "Serving recommendations page"
    );

    Ok(Json(page))
}

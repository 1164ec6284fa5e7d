//! Categories Handler
//!
//! Distinct facet values the storefront uses to build its filter sidebar.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::repository::ProductRepository;
use crate::utils::AppResult;

#[derive(Debug, Serialize)]
pub struct Categories {
    pub studios: Vec<String>,
    pub titles: Vec<String>,
    pub scales: Vec<String>,
}

/// GET /api/categories - distinct studio / title / scale values
pub async fn list_categories(State(state): State<ServerState>) -> AppResult<Json<Categories>> {
    let repo = ProductRepository::new(state.get_db());
    let studios = repo.distinct_field("studio").await?;
    let titles = repo.distinct_field("title").await?;
    let scales = repo.distinct_field("scale").await?;
    Ok(Json(Categories {
        studios,
        titles,
        scales,
    }))
}

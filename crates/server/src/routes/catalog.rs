//! Catalog route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::models::product::ProductView;
use crate::state::AppState;

/// Catalog listing query parameters.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    /// Case-insensitive name search.
    pub q: Option<String>,
}

/// `GET /catalog` - list products, optionally filtered by name.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let products = state.catalog().list(query.q.as_deref()).await?;
    Ok(Json(products.into_iter().map(ProductView::from).collect()))
}

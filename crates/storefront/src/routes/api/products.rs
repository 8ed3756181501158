//! Product grid as JSON.

use axum::{
    Json,
    extract::{RawQuery, State},
};
use serde::Serialize;
use tracing::instrument;

use stride_core::{Product, ProductFilter};

use crate::routes::products::parse_filter;
use crate::state::AppState;

/// Response body for `GET /api/products`.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub total: usize,
    pub filter: ProductFilter,
    pub products: Vec<Product>,
}

/// List products matching the query-string filter.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Json<ProductListResponse> {
    let filter = parse_filter(query.as_deref());
    let products: Vec<Product> = filter
        .apply(state.catalog().iter())
        .into_iter()
        .cloned()
        .collect();

    Json(ProductListResponse {
        total: products.len(),
        filter,
        products,
    })
}

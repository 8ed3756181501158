//! Static page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::{StatusCode, Uri},
    response::IntoResponse,
};
use tracing::instrument;

use crate::error::NotFoundTemplate;
use crate::filters;
use crate::middleware::ClientStorage;
use crate::middleware::client_storage::Layout;

/// Placeholder page for sections that are not built yet.
#[derive(Template, WebTemplate)]
#[template(path = "pages/under_construction.html")]
pub struct UnderConstructionTemplate {
    pub layout: Layout,
}

/// Display the under-construction page.
#[instrument(skip(storage))]
pub async fn under_construction(mut storage: ClientStorage) -> impl IntoResponse {
    UnderConstructionTemplate {
        layout: storage.layout(),
    }
}

/// Fallback for unknown routes.
#[instrument(skip(storage))]
pub async fn not_found(mut storage: ClientStorage, uri: Uri) -> impl IntoResponse {
    let page = NotFoundTemplate::with_layout(storage.layout(), format!("page {}", uri.path()));
    (StatusCode::NOT_FOUND, page)
}

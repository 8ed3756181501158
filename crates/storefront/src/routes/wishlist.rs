//! Wishlist route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use stride_core::ProductId;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::ClientStorage;
use crate::middleware::client_storage::Layout;
use crate::routes::products::ProductCard;
use crate::routes::redirect_back;
use crate::state::AppState;

/// Wishlist form data.
#[derive(Debug, Deserialize)]
pub struct WishlistForm {
    pub product_id: u32,
}

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist/show.html")]
pub struct WishlistShowTemplate {
    pub layout: Layout,
    pub products: Vec<ProductCard>,
}

/// Display wishlist page.
#[instrument(skip(storage))]
pub async fn show(mut storage: ClientStorage) -> impl IntoResponse {
    let wishlist = storage.wishlist();
    let products = ProductCard::list(
        wishlist.wishlist().items().iter().map(|item| &item.product),
        wishlist.wishlist(),
    );

    WishlistShowTemplate {
        layout: storage.layout(),
        products,
    }
}

/// Add a product to the wishlist. Adding twice is a no-op.
///
/// # Errors
///
/// Returns 404 if the product is not in the catalog.
#[instrument(skip(state, storage, headers))]
pub async fn add(
    State(state): State<AppState>,
    mut storage: ClientStorage,
    headers: HeaderMap,
    Form(form): Form<WishlistForm>,
) -> Result<Redirect> {
    let id = ProductId::new(form.product_id);
    let product = state
        .catalog()
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    storage.wishlist().add_to_wishlist(product.clone());
    storage.commit().await?;

    Ok(redirect_back(&headers, "/wishlist"))
}

/// Remove a product from the wishlist.
///
/// Works for ids no longer in the catalog so stale entries can be cleared.
///
/// # Errors
///
/// Returns an error if the session cannot be saved.
#[instrument(skip(storage, headers))]
pub async fn remove(
    mut storage: ClientStorage,
    headers: HeaderMap,
    Form(form): Form<WishlistForm>,
) -> Result<Redirect> {
    storage
        .wishlist()
        .remove_from_wishlist(ProductId::new(form.product_id));
    storage.commit().await?;

    Ok(redirect_back(&headers, "/wishlist"))
}

/// Flip a product's wishlist membership (the heart button).
///
/// # Errors
///
/// Returns 404 if the product is not in the catalog.
#[instrument(skip(state, storage, headers))]
pub async fn toggle(
    State(state): State<AppState>,
    mut storage: ClientStorage,
    headers: HeaderMap,
    Form(form): Form<WishlistForm>,
) -> Result<Redirect> {
    let id = ProductId::new(form.product_id);
    let product = state
        .catalog()
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let added = storage.wishlist().toggle(product.clone());
    tracing::debug!(%id, added, "Wishlist toggled");
    storage.commit().await?;

    Ok(redirect_back(&headers, "/wishlist"))
}

/// Empty the wishlist.
///
/// # Errors
///
/// Returns an error if the session cannot be saved.
#[instrument(skip(storage))]
pub async fn clear(mut storage: ClientStorage) -> Result<Redirect> {
    storage.wishlist().clear_wishlist();
    storage.commit().await?;

    Ok(Redirect::to("/wishlist"))
}

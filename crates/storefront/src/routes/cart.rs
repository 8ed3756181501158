//! Cart route handlers.
//!
//! Mutations are plain form posts that redirect back to the cart page. The
//! cart itself lives in the visitor's client storage under `cart`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use stride_core::{Cart, CartItem, LineKey, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::ClientStorage;
use crate::middleware::client_storage::Layout;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: u32,
    pub name: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartItemView {
                    id: item.product.id.as_u32(),
                    name: item.product.name.clone(),
                    size: item.selected_size.clone().unwrap_or_default(),
                    color: item.selected_color.clone().unwrap_or_default(),
                    quantity: item.quantity,
                    price: item.product.price.display(),
                    line_price: item.line_total().display(),
                })
                .collect(),
            subtotal: cart.subtotal().display(),
            item_count: cart.item_count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: u32,
    pub quantity: Option<u32>,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: u32,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: u32,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl UpdateCartForm {
    fn key(&self) -> LineKey {
        LineKey::new(
            ProductId::new(self.product_id),
            self.size.clone(),
            self.color.clone(),
        )
    }
}

impl RemoveFromCartForm {
    fn key(&self) -> LineKey {
        LineKey::new(
            ProductId::new(self.product_id),
            self.size.clone(),
            self.color.clone(),
        )
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub cart: CartView,
}

/// Cart count response.
#[derive(Debug, Serialize)]
pub struct CartCountResponse {
    pub count: u32,
}

/// Display cart page.
#[instrument(skip(storage))]
pub async fn show(mut storage: ClientStorage) -> impl IntoResponse {
    let cart = CartView::from(storage.cart().cart());
    CartShowTemplate {
        layout: storage.layout(),
        cart,
    }
}

/// Add a product variant to the cart.
///
/// A size or color the product is not offered in is ignored.
///
/// # Errors
///
/// Returns 404 if the product is not in the catalog.
#[instrument(skip(state, storage))]
pub async fn add(
    State(state): State<AppState>,
    mut storage: ClientStorage,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let id = ProductId::new(form.product_id);
    let product = state
        .catalog()
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    // Selections the product doesn't offer are dropped rather than stored
    let size = form
        .size
        .as_deref()
        .and_then(|size| product.offered_size(size))
        .map(str::to_string);
    let color = form
        .color
        .as_deref()
        .and_then(|color| product.offered_color(color))
        .map(str::to_string);

    let item = CartItem::new(product.clone(), form.quantity.unwrap_or(1), size, color);
    add_breadcrumb(
        "cart",
        "Added to cart",
        &[
            ("product_id", id.to_string()),
            ("quantity", item.quantity.to_string()),
        ],
    );
    storage.cart().add_to_cart(item);
    storage.commit().await?;

    Ok(Redirect::to("/cart"))
}

/// Change a line's quantity. Unknown lines are ignored.
///
/// # Errors
///
/// Returns an error if the session cannot be saved.
#[instrument(skip(storage))]
pub async fn update(
    mut storage: ClientStorage,
    Form(form): Form<UpdateCartForm>,
) -> Result<Redirect> {
    if !storage.cart().update_quantity(&form.key(), form.quantity) {
        tracing::debug!("Quantity update for a line not in the cart");
    }
    storage.commit().await?;

    Ok(Redirect::to("/cart"))
}

/// Remove a line. Unknown lines are ignored.
///
/// # Errors
///
/// Returns an error if the session cannot be saved.
#[instrument(skip(storage))]
pub async fn remove(
    mut storage: ClientStorage,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Redirect> {
    storage.cart().remove_from_cart(&form.key());
    storage.commit().await?;

    Ok(Redirect::to("/cart"))
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the session cannot be saved.
#[instrument(skip(storage))]
pub async fn clear(mut storage: ClientStorage) -> Result<Redirect> {
    storage.cart().clear_cart();
    storage.commit().await?;

    Ok(Redirect::to("/cart"))
}

/// Total quantity across all lines, for the header badge.
#[instrument(skip(storage))]
pub async fn count(mut storage: ClientStorage) -> Json<CartCountResponse> {
    Json(CartCountResponse {
        count: storage.cart().cart().item_count(),
    })
}

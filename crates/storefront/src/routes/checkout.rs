//! Checkout route handlers.
//!
//! Checkout is simulated: no payment provider is called. After a short
//! processing delay the order is confirmed and the cart emptied.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use stride_core::checkout::{CheckoutForm, OrderConfirmation};

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::ClientStorage;
use crate::middleware::client_storage::Layout;
use crate::routes::cart::CartView;
use crate::state::AppState;

/// Checkout form page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/form.html")]
pub struct CheckoutFormTemplate {
    pub layout: Layout,
    pub cart: CartView,
    pub form: CheckoutForm,
    pub error: Option<String>,
}

/// Order confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub layout: Layout,
    pub order: OrderConfirmation,
    pub total: String,
}

/// Display the checkout form, or go back to the cart if it is empty.
#[instrument(skip(storage))]
pub async fn show(mut storage: ClientStorage) -> Response {
    let cart = CartView::from(storage.cart().cart());
    if cart.items.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    CheckoutFormTemplate {
        layout: storage.layout(),
        cart,
        form: CheckoutForm::default(),
        error: None,
    }
    .into_response()
}

/// Validate the form, simulate processing, confirm the order and empty the
/// cart.
///
/// # Errors
///
/// Returns an error if the session cannot be saved.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    mut storage: ClientStorage,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let cart = storage.cart().cart().clone();
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let shipping = match form.validate() {
        Ok(shipping) => shipping,
        Err(e) => {
            tracing::debug!(error = %e, "Checkout form rejected");
            let page = CheckoutFormTemplate {
                layout: storage.layout(),
                cart: CartView::from(&cart),
                form,
                error: Some(e.to_string()),
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    tokio::time::sleep(state.config().checkout_delay).await;

    let order = match OrderConfirmation::place(shipping, &cart) {
        Ok(order) => order,
        Err(e) => {
            tracing::warn!(error = %e, "Order could not be placed");
            return Ok(Redirect::to("/cart").into_response());
        }
    };

    storage.cart().clear_cart();
    add_breadcrumb(
        "checkout",
        "Order placed",
        &[
            ("reference", order.reference.clone()),
            ("items", order.item_count.to_string()),
        ],
    );
    tracing::info!(
        reference = %order.reference,
        items = order.item_count,
        total = %order.total,
        "Order placed"
    );

    let total = order.total.display();
    let page = ConfirmationTemplate {
        layout: storage.layout(),
        order,
        total,
    };
    storage.commit().await?;

    Ok(page.into_response())
}

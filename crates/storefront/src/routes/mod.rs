//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (featured, new arrivals)
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /men, /women, /kids     - Category grid (filters via query string)
//! GET  /products               - Full product grid
//! GET  /products/{id}          - Product detail
//! GET  /api/products           - Filtered grid as JSON
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart, redirect to /cart
//! POST /cart/update            - Update quantity, redirect to /cart
//! POST /cart/remove            - Remove line, redirect to /cart
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Item count (JSON)
//!
//! # Wishlist
//! GET  /wishlist               - Wishlist page
//! POST /wishlist/add           - Save a product
//! POST /wishlist/remove        - Unsave a product
//! POST /wishlist/toggle        - Heart button
//! POST /wishlist/clear         - Empty the wishlist
//!
//! # Checkout
//! GET  /checkout               - Checkout form
//! POST /checkout               - Simulated order placement
//!
//! # Misc
//! POST /api/chat               - Support chat relay (JSON, rate limited)
//! POST /theme                  - Store light/dark preference
//! GET  /under-construction     - Placeholder for unfinished sections
//! ```

pub mod api;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod pages;
pub mod products;
pub mod theme;
pub mod wishlist;

use axum::{
    Router,
    http::{HeaderMap, header::REFERER},
    middleware::{from_fn, from_fn_with_state},
    response::Redirect,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::{
    chat_rate_limiter, create_session_layer, request_id_middleware, security_headers_middleware,
    under_construction_middleware,
};
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
        .route("/toggle", post(wishlist::toggle))
        .route("/clear", post(wishlist::clear))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(api::products::list))
        .route(
            "/chat",
            post(api::chat::send).layer(chat_rate_limiter()),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        // Category grids
        .route("/men", get(products::men))
        .route("/women", get(products::women))
        .route("/kids", get(products::kids))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .route("/checkout", get(checkout::show).post(checkout::submit))
        .route("/theme", post(theme::set))
        .route("/under-construction", get(pages::under_construction))
        .nest("/api", api_routes())
        .fallback(pages::not_found)
}

/// Build the full application with its middleware stack.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config(), state.sessions());

    routes()
        .layer(from_fn_with_state(
            state.clone(),
            under_construction_middleware,
        ))
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Redirect to the same-site page in the `Referer` header, or `fallback`.
///
/// Only the path and query are kept so a forged referrer cannot send the
/// visitor off-site.
pub(crate) fn redirect_back(headers: &HeaderMap, fallback: &str) -> Redirect {
    let target = headers
        .get(REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|referer| url::Url::parse(referer).ok())
        .map(|url| match url.query() {
            Some(query) => format!("{}?{query}", url.path()),
            None => url.path().to_string(),
        })
        .filter(|path| path.starts_with('/') && !path.starts_with("//"));

    match target {
        Some(path) => Redirect::to(&path),
        None => Redirect::to(fallback),
    }
}

//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use stride_core::Category;

use crate::filters;
use crate::middleware::ClientStorage;
use crate::middleware::client_storage::Layout;
use crate::routes::products::ProductCard;
use crate::state::AppState;

/// Products shown in each home page rail.
const RAIL_LIMIT: usize = 4;

/// Category tile linking to a category grid.
#[derive(Clone)]
pub struct CategoryLink {
    pub href: String,
    pub label: &'static str,
    pub count: usize,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub categories: Vec<CategoryLink>,
    pub featured: Vec<ProductCard>,
    pub new_arrivals: Vec<ProductCard>,
}

/// Display the home page.
#[instrument(skip(state, storage))]
pub async fn home(State(state): State<AppState>, mut storage: ClientStorage) -> impl IntoResponse {
    let catalog = state.catalog();
    let categories = Category::ALL
        .into_iter()
        .map(|category| CategoryLink {
            href: format!("/{}", category.as_str()),
            label: category.label(),
            count: catalog.in_category(category).count(),
        })
        .collect();

    let wishlist = storage.wishlist();
    let featured = ProductCard::list(catalog.featured(RAIL_LIMIT), wishlist.wishlist());
    let new_arrivals = ProductCard::list(catalog.new_arrivals(RAIL_LIMIT), wishlist.wishlist());

    HomeTemplate {
        layout: storage.layout(),
        categories,
        featured,
        new_arrivals,
    }
}

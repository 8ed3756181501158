//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use stride_core::filter::Facets;
use stride_core::{Category, Product, ProductFilter, ProductId, SortOrder, Wishlist};

use crate::error::NotFoundTemplate;
use crate::filters;
use crate::middleware::ClientStorage;
use crate::middleware::client_storage::Layout;
use crate::state::AppState;

/// Number of related products shown under a product.
const RELATED_LIMIT: usize = 4;

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCard {
    pub id: u32,
    pub name: String,
    pub price: String,
    pub rating: f32,
    pub category: &'static str,
    pub product_type: &'static str,
    pub is_new: bool,
    pub in_wishlist: bool,
}

impl ProductCard {
    #[must_use]
    pub fn new(product: &Product, wishlist: &Wishlist) -> Self {
        Self {
            id: product.id.as_u32(),
            name: product.name.clone(),
            price: product.price.display(),
            rating: product.rating,
            category: product.category.label(),
            product_type: product.product_type.as_str(),
            is_new: product.is_new,
            in_wishlist: wishlist.contains(product.id),
        }
    }

    /// Cards for `products`, marking the ones already wishlisted.
    #[must_use]
    pub fn list<'a>(
        products: impl IntoIterator<Item = &'a Product>,
        wishlist: &Wishlist,
    ) -> Vec<Self> {
        products
            .into_iter()
            .map(|p| Self::new(p, wishlist))
            .collect()
    }
}

/// Product detail display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub price: String,
    pub rating: f32,
    pub category: &'static str,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub materials: Vec<String>,
    pub is_new: bool,
    pub in_wishlist: bool,
}

impl ProductView {
    fn new(product: &Product, wishlist: &Wishlist) -> Self {
        Self {
            id: product.id.as_u32(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.display(),
            rating: product.rating,
            category: product.category.label(),
            colors: product.colors.clone(),
            sizes: product.sizes.clone(),
            materials: product.materials.clone(),
            is_new: product.is_new,
            in_wishlist: wishlist.contains(product.id),
        }
    }
}

/// Filter sidebar state for templates.
#[derive(Clone)]
pub struct FilterView {
    /// Form target, e.g. `/men` or `/products`.
    pub action: String,
    pub colors: Vec<FacetOption>,
    pub sizes: Vec<FacetOption>,
    pub product_type: String,
    pub search: String,
    pub newest: bool,
}

/// One checkbox in the filter sidebar.
#[derive(Clone)]
pub struct FacetOption {
    pub value: String,
    pub checked: bool,
}

impl FilterView {
    fn new(action: &str, facets: Facets, filter: &ProductFilter) -> Self {
        let option = |value: String, selected: &[String]| FacetOption {
            checked: selected.iter().any(|s| s.eq_ignore_ascii_case(&value)),
            value,
        };

        Self {
            action: action.to_string(),
            colors: facets
                .colors
                .into_iter()
                .map(|c| option(c, &filter.colors))
                .collect(),
            sizes: facets
                .sizes
                .into_iter()
                .map(|s| option(s, &filter.sizes))
                .collect(),
            product_type: filter
                .product_type
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            search: filter.search.clone().unwrap_or_default(),
            newest: filter.sort == SortOrder::Newest,
        }
    }
}

/// Product grid page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: Layout,
    pub title: String,
    pub products: Vec<ProductCard>,
    pub sidebar: FilterView,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: ProductView,
    pub related_products: Vec<ProductCard>,
}

/// Decode a raw query string into a filter.
#[must_use]
pub fn parse_filter(query: Option<&str>) -> ProductFilter {
    query.map_or_else(ProductFilter::default, |q| {
        ProductFilter::from_pairs(url::form_urlencoded::parse(q.as_bytes()))
    })
}

fn render_grid(
    state: &AppState,
    storage: &mut ClientStorage,
    title: &str,
    action: &str,
    filter: &ProductFilter,
) -> ProductsIndexTemplate {
    let catalog = state.catalog();
    let facets = match filter.category {
        Some(category) => Facets::collect(catalog.in_category(category)),
        None => Facets::collect(catalog.iter()),
    };
    let matched = filter.apply(catalog.iter());
    tracing::debug!(matched = matched.len(), "Filtered product grid");

    let wishlist = storage.wishlist();
    let products = ProductCard::list(matched, wishlist.wishlist());

    ProductsIndexTemplate {
        layout: storage.layout(),
        title: title.to_string(),
        products,
        sidebar: FilterView::new(action, facets, filter),
    }
}

/// Display the full product grid.
#[instrument(skip(state, storage))]
pub async fn index(
    State(state): State<AppState>,
    mut storage: ClientStorage,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    let filter = parse_filter(query.as_deref());
    render_grid(&state, &mut storage, "All products", "/products", &filter)
}

fn category_page(
    state: &AppState,
    mut storage: ClientStorage,
    query: Option<&str>,
    category: Category,
) -> ProductsIndexTemplate {
    let mut filter = parse_filter(query);
    filter.category = Some(category);
    let action = format!("/{}", category.as_str());
    render_grid(state, &mut storage, category.label(), &action, &filter)
}

/// Display the men's category grid.
#[instrument(skip(state, storage))]
pub async fn men(
    State(state): State<AppState>,
    storage: ClientStorage,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    category_page(&state, storage, query.as_deref(), Category::Men)
}

/// Display the women's category grid.
#[instrument(skip(state, storage))]
pub async fn women(
    State(state): State<AppState>,
    storage: ClientStorage,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    category_page(&state, storage, query.as_deref(), Category::Women)
}

/// Display the kids' category grid.
#[instrument(skip(state, storage))]
pub async fn kids(
    State(state): State<AppState>,
    storage: ClientStorage,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    category_page(&state, storage, query.as_deref(), Category::Kids)
}

/// Display product detail page.
///
/// A malformed or unknown id renders the not-found page with the visitor's
/// own layout.
#[instrument(skip(state, storage))]
pub async fn show(
    State(state): State<AppState>,
    mut storage: ClientStorage,
    Path(id): Path<String>,
) -> Response {
    let found = id
        .parse::<ProductId>()
        .ok()
        .and_then(|id| state.catalog().get(id));
    let Some(product) = found else {
        tracing::debug!(%id, "Unknown product");
        let page = NotFoundTemplate::with_layout(storage.layout(), format!("product {id}"));
        return (StatusCode::NOT_FOUND, page).into_response();
    };

    let wishlist = storage.wishlist();
    let view = ProductView::new(product, wishlist.wishlist());
    let related_products = ProductCard::list(
        state.catalog().related(product, RELATED_LIMIT),
        wishlist.wishlist(),
    );

    ProductShowTemplate {
        layout: storage.layout(),
        product: view,
        related_products,
    }
    .into_response()
}

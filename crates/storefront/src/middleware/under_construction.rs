//! Redirect unfinished sections of the site to a placeholder page.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::state::AppState;

/// Placeholder page every unfinished path lands on.
pub const UNDER_CONSTRUCTION_PATH: &str = "/under-construction";

/// Whether `path` falls under one of `prefixes`.
///
/// A prefix matches itself and anything below it, so `/account` covers
/// `/account/orders` but not `/accounting`.
#[must_use]
pub fn is_under_construction(path: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| {
        path.strip_prefix(prefix.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// Send requests for configured prefixes to [`UNDER_CONSTRUCTION_PATH`].
pub async fn under_construction_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if is_under_construction(path, &state.config().under_construction) {
        tracing::debug!(path, "Redirecting unfinished section");
        return Redirect::to(UNDER_CONSTRUCTION_PATH).into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixes() -> Vec<String> {
        vec!["/account".to_string(), "/gift-cards".to_string()]
    }

    #[test]
    fn test_matches_prefix_and_children() {
        assert!(is_under_construction("/account", &prefixes()));
        assert!(is_under_construction("/account/", &prefixes()));
        assert!(is_under_construction("/account/orders", &prefixes()));
        assert!(is_under_construction("/gift-cards", &prefixes()));
    }

    #[test]
    fn test_ignores_lookalikes() {
        assert!(!is_under_construction("/accounting", &prefixes()));
        assert!(!is_under_construction("/", &prefixes()));
        assert!(!is_under_construction("/products", &prefixes()));
        assert!(!is_under_construction("/account", &[]));
    }
}

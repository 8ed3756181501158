//! Theme preference handler.

use axum::{Form, http::HeaderMap, response::Redirect};
use serde::Deserialize;
use tracing::instrument;

use stride_core::Theme;

use crate::error::Result;
use crate::middleware::ClientStorage;
use crate::routes::redirect_back;

/// Theme form data. A missing or unknown value toggles the current theme.
#[derive(Debug, Deserialize)]
pub struct ThemeForm {
    pub theme: Option<String>,
}

/// Store the visitor's theme preference.
///
/// # Errors
///
/// Returns an error if the session cannot be saved.
#[instrument(skip(storage, headers))]
pub async fn set(
    mut storage: ClientStorage,
    headers: HeaderMap,
    Form(form): Form<ThemeForm>,
) -> Result<Redirect> {
    let current = storage.theme();
    let theme = match form.theme.as_deref().map(str::trim) {
        Some("light") => Theme::Light,
        Some("dark") => Theme::Dark,
        _ => current.toggled(),
    };

    storage.set_theme(theme);
    storage.commit().await?;

    Ok(redirect_back(&headers, "/"))
}

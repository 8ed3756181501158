//! Application state shared across handlers.

use std::sync::Arc;

use stride_core::{Catalog, CatalogError};

use crate::config::StorefrontConfig;
use crate::middleware::session::VisitorSessions;
use crate::services::{ChatClient, ChatError};

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to read catalog file {path}: {source}")]
    CatalogFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("chat client: {0}")]
    Chat(#[from] ChatError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The catalog is read-only for
/// the life of the process; visitor sessions are the only mutable state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    chat: ChatClient,
    sessions: VisitorSessions,
}

impl AppState {
    /// Create application state, loading the catalog named in `config` or
    /// the bundled one.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or parsed, or the HTTP
    /// client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let catalog = match &config.catalog_path {
            Some(path) => {
                let json =
                    std::fs::read_to_string(path).map_err(|source| StateError::CatalogFile {
                        path: path.display().to_string(),
                        source,
                    })?;
                Catalog::from_json(&json)?
            }
            None => Catalog::builtin()?,
        };
        tracing::info!(products = catalog.len(), "Catalog loaded");

        Self::with_catalog(config, catalog)
    }

    /// Create application state around an already-built catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_catalog(config: StorefrontConfig, catalog: Catalog) -> Result<Self, StateError> {
        let chat = ChatClient::new(&config.chat)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                chat,
                sessions: VisitorSessions::default(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the chat webhook client.
    #[must_use]
    pub fn chat(&self) -> &ChatClient {
        &self.inner.chat
    }

    /// Visitor session store and per-visitor locks.
    #[must_use]
    pub fn sessions(&self) -> &VisitorSessions {
        &self.inner.sessions
    }
}

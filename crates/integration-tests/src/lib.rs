//! Integration test support for Stride.
//!
//! Each test spawns the full storefront router on an ephemeral port and talks
//! to it through a cookie-carrying HTTP client, so client storage survives
//! across requests exactly as it would for a browser.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p stride-integration-tests
//! ```

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use reqwest::{Client, Response, redirect::Policy};
use stride_storefront::config::StorefrontConfig;
use stride_storefront::routes;
use stride_storefront::state::AppState;

/// A running storefront plus a client that keeps its session cookie.
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
}

impl TestApp {
    /// Spawn with defaults and no checkout delay.
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config()).await
    }

    /// Spawn with a custom configuration.
    pub async fn spawn_with(config: StorefrontConfig) -> Self {
        let state = AppState::new(config).expect("Failed to build application state");
        let app = routes::app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Test server failed");
        });

        // Redirects are asserted on, not followed
        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: format!("http://{addr}"),
            client,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed")
    }

    pub async fn get_text(&self, path: &str) -> String {
        self.get(path).await.text().await.expect("Body was not text")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST failed")
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("POST failed")
    }

    /// Current cart item count as reported by `/cart/count`.
    pub async fn cart_count(&self) -> u64 {
        let body: serde_json::Value = self
            .get("/cart/count")
            .await
            .json()
            .await
            .expect("Cart count was not JSON");
        body["count"].as_u64().expect("Cart count missing")
    }
}

/// Default configuration for tests: bundled catalog, no webhook, no
/// checkout delay.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        checkout_delay: Duration::ZERO,
        ..StorefrontConfig::default()
    }
}

/// Serve `router` on an ephemeral port and return the URL of `/hook`.
pub async fn spawn_webhook(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind webhook listener");
    let addr = listener.local_addr().expect("Listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Webhook server failed");
    });
    format!("http://{addr}/hook")
}

//! Simulated checkout.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use reqwest::StatusCode;
use stride_integration_tests::{TestApp, test_config};
use stride_storefront::config::StorefrontConfig;

const VALID_FORM: [(&str, &str); 6] = [
    ("full_name", "Jordan Lee"),
    ("email", "jordan@example.com"),
    ("address", "1 Main St"),
    ("city", "Portland"),
    ("postal_code", "97201"),
    ("country", "US"),
];

#[tokio::test]
async fn test_checkout_with_empty_cart_redirects() {
    let app = TestApp::spawn().await;

    let response = app.get("/checkout").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app.post_form("/checkout", &VALID_FORM).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_invalid_form_keeps_cart() {
    let app = TestApp::spawn().await;
    app.post_form("/cart/add", &[("product_id", "3"), ("size", "9")])
        .await;

    let mut form = VALID_FORM;
    form[1] = ("email", "not-an-email");
    let response = app.post_form("/checkout", &form).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = response.text().await.unwrap();
    assert!(page.contains("invalid email"));
    // Entered values are kept
    assert!(page.contains("Jordan Lee"));

    assert_eq!(app.cart_count().await, 1);
}

#[tokio::test]
async fn test_checkout_clears_cart() {
    let app = TestApp::spawn().await;
    app.post_form(
        "/cart/add",
        &[("product_id", "8"), ("size", "M"), ("quantity", "2")],
    )
    .await;

    let response = app.get("/checkout").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("Balance Leggings"));

    let response = app.post_form("/checkout", &VALID_FORM).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = response.text().await.unwrap();
    assert!(page.contains("STR-"));
    assert!(page.contains("$136.00"));
    assert!(page.contains("jordan@example.com"));

    assert_eq!(app.cart_count().await, 0);
}

#[tokio::test]
async fn test_request_during_checkout_is_not_lost() {
    let app = TestApp::spawn_with(StorefrontConfig {
        checkout_delay: Duration::from_millis(300),
        ..test_config()
    })
    .await;
    app.post_form("/cart/add", &[("product_id", "5")]).await;

    // Theme change lands while the order is still processing
    let (checkout, theme) = tokio::join!(app.post_form("/checkout", &VALID_FORM), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        app.post_form("/theme", &[("theme", "dark")]).await
    });
    assert_eq!(checkout.status(), StatusCode::OK);
    assert_eq!(theme.status(), StatusCode::SEE_OTHER);

    assert_eq!(app.cart_count().await, 0);
    assert!(app.get_text("/").await.contains("data-theme=\"dark\""));
}

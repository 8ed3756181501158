//! Catalog browsing, filtering and product pages.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::Value;
use stride_integration_tests::TestApp;

async fn api_products(app: &TestApp, query: &str) -> Value {
    app.get(&format!("/api/products{query}"))
        .await
        .json()
        .await
        .unwrap()
}

fn ids(body: &Value) -> Vec<u64> {
    body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_category_filter_returns_only_that_category() {
    let app = TestApp::spawn().await;

    let body = api_products(&app, "?category=men").await;
    let products = body["products"].as_array().unwrap();
    assert!(!products.is_empty());
    assert!(products.iter().all(|p| p["category"] == "men"));
    assert_eq!(body["total"].as_u64().unwrap(), products.len() as u64);
}

#[tokio::test]
async fn test_size_filter_skips_one_size_products() {
    let app = TestApp::spawn().await;

    // Size 9 matches men's shoes; the backpack has no sizes and still shows
    let body = api_products(&app, "?category=men&size=9").await;
    assert_eq!(ids(&body), vec![1, 3, 2, 5]);
}

#[tokio::test]
async fn test_sort_newest_is_descending() {
    let app = TestApp::spawn().await;

    let body = api_products(&app, "?sort=newest").await;
    let dates: Vec<&str> = body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["createdAt"].as_str().unwrap())
        .collect();
    assert!(dates.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_featured_first() {
    let app = TestApp::spawn().await;

    let ids = ids(&api_products(&app, "").await);
    let pos = |id| ids.iter().position(|&x| x == id).unwrap();
    assert!(pos(1) < pos(2));
}

#[tokio::test]
async fn test_search_and_color_filters_on_category_page() {
    let app = TestApp::spawn().await;

    let page = app.get_text("/women?color=pink").await;
    assert!(page.contains("Aerial Flyknit"));
    assert!(!page.contains("Studio Slip-On"));
    assert!(!page.contains("Cloudstride Runner"));

    let page = app.get_text("/products?q=TOTE").await;
    assert!(page.contains("Weekender Tote"));
    assert!(page.contains("1 products"));
}

#[tokio::test]
async fn test_product_detail_and_not_found() {
    let app = TestApp::spawn().await;

    let response = app.get("/products/6").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = response.text().await.unwrap();
    assert!(page.contains("Aerial Flyknit"));
    assert!(page.contains("$149.99"));

    let response = app.get("/products/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.text().await.unwrap().contains("Not found"));

    let response = app.get("/products/not-a-number").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_not_found_page_keeps_visitor_layout() {
    let app = TestApp::spawn().await;
    app.post_form("/theme", &[("theme", "dark")]).await;
    app.post_form("/cart/add", &[("product_id", "5")]).await;

    for path in ["/products/999", "/no-such-page"] {
        let response = app.get(path).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
        let page = response.text().await.unwrap();
        assert!(page.contains("data-theme=\"dark\""), "{path}");
        assert!(page.contains("Cart (1)"), "{path}");
    }
}

#[tokio::test]
async fn test_home_lists_featured_products() {
    let app = TestApp::spawn().await;

    let page = app.get_text("/").await;
    assert!(page.contains("Featured"));
    assert!(page.contains("Cloudstride Runner"));
    assert!(page.contains("href=\"/kids\""));
}

//! Integration tests for the storefront cart HTTP surface
//!
//! These tests verify the routes end to end against an in-memory catalog:
//! - Product listing and detail lookup (id and slug)
//! - Cart mutations (add, update quantity, remove)
//! - Promo codes and delayed error dismissal
//! - Persistence across store restarts
//! - Error handling

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt; // for `oneshot`

use storefront_cart::cart::models::Product;
use storefront_cart::cart::{AppState, CartStore};
use storefront_cart::catalog::{CatalogError, ProductSource, StaticCatalog};
use storefront_cart::router::create_app_router;
use storefront_cart::storage::{FileStorage, KeyValueStorage, MemoryStorage};

fn sample_products() -> Vec<Product> {
    serde_json::from_value(json!([
        {
            "id": 1,
            "title": "Essence Mascara Lash Princess",
            "price": 10,
            "discountPercentage": 0,
            "rating": 4.94,
            "stock": 5,
            "brand": "Essence",
            "category": "beauty",
            "thumbnail": "https://cdn.example/1.png",
            "reviews": [{ "rating": 5, "comment": "Great!", "reviewerName": "Ana" }]
        },
        {
            "id": 2,
            "title": "Eyeshadow Palette with Mirror",
            "price": 25,
            "discountPercentage": 20,
            "rating": 3.28,
            "stock": 44,
            "category": "beauty",
            "thumbnail": "https://cdn.example/2.png",
            "warrantyInformation": "1 year warranty"
        }
    ]))
    .unwrap()
}

/// Catalog that always fails
struct OfflineCatalog;

#[async_trait::async_trait]
impl ProductSource for OfflineCatalog {
    async fn fetch_all(&self) -> Result<Vec<Product>, CatalogError> {
        let err = serde_json::from_str::<Value>("<html>").unwrap_err();
        Err(CatalogError::Decode(err))
    }
}

/// Helper function to create a test app instance over the given storage
fn create_test_app_with(
    storage: Arc<dyn KeyValueStorage>,
    catalog: Arc<dyn ProductSource>,
    promo_error_display: Duration,
) -> axum::Router {
    let state = AppState::new(CartStore::open(storage), catalog, promo_error_display).shared();
    create_app_router(state)
}

fn create_test_app() -> axum::Router {
    create_test_app_with(
        Arc::new(MemoryStorage::new()),
        Arc::new(StaticCatalog::new(sample_products())),
        Duration::from_secs(3),
    )
}

/// Helper function to send a request and get the JSON response
async fn send_request(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!({}));

    (status, body)
}

async fn add(app: &axum::Router, product_id: u64) -> Value {
    let (status, body) =
        send_request(app, "POST", "/cart/items", Some(json!({ "productId": product_id }))).await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn test_list_products_marks_cart_membership() {
    let app = create_test_app();
    add(&app, 2).await;

    let (status, body) = send_request(&app, "GET", "/products", None).await;
    assert_eq!(status, StatusCode::OK);

    let products = body.as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0]["slug"], "essence-mascara-lash-princess");
    assert_eq!(products[0]["inCart"], false);
    assert_eq!(products[1]["inCart"], true);
    assert_eq!(products[1]["warrantyInformation"], "1 year warranty");
}

#[tokio::test]
async fn test_product_detail_by_id_and_slug() {
    let app = create_test_app();

    let (status, body) = send_request(&app, "GET", "/products/2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Eyeshadow Palette with Mirror");

    let (status, body) =
        send_request(&app, "GET", "/products/essence-mascara-lash-princess", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["reviews"][0]["reviewerName"], "Ana");

    let (status, body) = send_request(&app, "GET", "/products/no-such-thing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found.");
}

#[tokio::test]
async fn test_catalog_failure_is_reported_not_fatal() {
    let app = create_test_app_with(
        Arc::new(MemoryStorage::new()),
        Arc::new(OfflineCatalog),
        Duration::from_secs(3),
    );

    let (status, body) = send_request(&app, "GET", "/products", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Failed to fetch products");

    let (status, body) =
        send_request(&app, "POST", "/cart/items", Some(json!({ "productId": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Failed to fetch product details");

    // The cart still works
    let (status, body) = send_request(&app, "GET", "/cart", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lineCount"], 0);
}

#[tokio::test]
async fn test_add_update_remove() {
    let app = create_test_app();

    add(&app, 1).await;
    add(&app, 2).await;
    let body = add(&app, 1).await;

    assert_eq!(body["lineCount"], 2);
    assert_eq!(body["itemCount"], 3);
    assert_eq!(body["items"][0]["id"], 1);
    assert_eq!(body["items"][0]["quantity"], 2);
    // 10 * 2 + 25 * 0.8
    assert_eq!(body["totals"]["subtotal"].as_str().unwrap().parse::<f64>().unwrap(), 40.0);

    let line = &body["items"][1];
    assert_eq!(line["effectivePrice"].as_str().unwrap().parse::<f64>().unwrap(), 20.0);
    assert_eq!(line["lineOriginal"].as_str().unwrap().parse::<f64>().unwrap(), 25.0);

    let (status, body) =
        send_request(&app, "PUT", "/cart/items/2", Some(json!({ "quantity": 3 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][1]["quantity"], 3);
    assert_eq!(body["items"][1]["lineSubtotal"].as_str().unwrap().parse::<f64>().unwrap(), 60.0);

    let (status, body) = send_request(&app, "DELETE", "/cart/items/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lineCount"], 1);
    assert_eq!(body["items"][0]["id"], 2);

    // Removing an absent id changes nothing
    let (status, again) = send_request(&app, "DELETE", "/cart/items/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again, body);
}

#[tokio::test]
async fn test_add_by_slug_and_invalid_inputs() {
    let app = create_test_app();

    let (status, body) = send_request(
        &app,
        "POST",
        "/cart/items",
        Some(json!({ "slug": "eyeshadow-palette-with-mirror" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["id"], 2);

    let (status, _) = send_request(&app, "POST", "/cart/items", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) =
        send_request(&app, "POST", "/cart/items", Some(json!({ "productId": 404 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found.");
}

#[tokio::test]
async fn test_quantity_zero_is_rejected() {
    let app = create_test_app();
    add(&app, 1).await;

    let (status, body) =
        send_request(&app, "PUT", "/cart/items/1", Some(json!({ "quantity": 0 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("at least 1"));

    let (_, cart) = send_request(&app, "GET", "/cart", None).await;
    assert_eq!(cart["items"][0]["quantity"], 1);
}

#[tokio::test]
async fn test_promo_codes() {
    let app = create_test_app();
    for id in [1, 1, 2, 2, 2, 2] {
        add(&app, id).await;
    }
    // 10 * 2 + 20 * 4 = 100

    let (status, body) =
        send_request(&app, "PUT", "/cart/promo", Some(json!({ "code": "DISCOUNT10" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["promo"]["code"], "DISCOUNT10");
    assert_eq!(body["promo"]["discount"].as_str().unwrap().parse::<f64>().unwrap(), 0.0);

    // Applies the stored text
    let (status, body) = send_request(&app, "POST", "/cart/promo", None).await;
    assert_eq!(status, StatusCode::OK);
    let totals = &body["totals"];
    assert_eq!(totals["subtotal"].as_str().unwrap().parse::<f64>().unwrap(), 100.0);
    assert_eq!(totals["discount"].as_str().unwrap().parse::<f64>().unwrap(), 10.0);
    assert_eq!(totals["total"].as_str().unwrap().parse::<f64>().unwrap(), 90.0);
    assert_eq!(body["promo"]["error"], "");

    let (_, body) =
        send_request(&app, "POST", "/cart/promo", Some(json!({ "code": "BOGUS" }))).await;
    assert_eq!(body["promo"]["error"], "Promo code is invalid.");
    assert_eq!(body["promo"]["code"], "BOGUS");
    assert_eq!(body["totals"]["discount"].as_str().unwrap().parse::<f64>().unwrap(), 0.0);
}

#[tokio::test]
async fn test_malformed_promo_body_is_rejected() {
    let app = create_test_app();
    add(&app, 1).await;
    send_request(&app, "PUT", "/cart/promo", Some(json!({ "code": "DISCOUNT10" }))).await;

    let (status, body) =
        send_request(&app, "POST", "/cart/promo", Some(json!({ "code": 5 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // Nothing was applied
    let (_, body) = send_request(&app, "GET", "/cart", None).await;
    assert_eq!(body["promo"]["code"], "DISCOUNT10");
    assert_eq!(body["promo"]["error"], "");
    assert_eq!(body["totals"]["discount"].as_str().unwrap().parse::<f64>().unwrap(), 0.0);
}

#[tokio::test]
async fn test_promo_error_is_dismissed_after_display_interval() {
    let app = create_test_app_with(
        Arc::new(MemoryStorage::new()),
        Arc::new(StaticCatalog::new(sample_products())),
        Duration::from_millis(50),
    );

    let (_, body) =
        send_request(&app, "POST", "/cart/promo", Some(json!({ "code": "BOGUS" }))).await;
    assert_eq!(body["promo"]["error"], "Promo code is invalid.");

    tokio::time::sleep(Duration::from_millis(300)).await;

    let (_, body) = send_request(&app, "GET", "/cart", None).await;
    assert_eq!(body["promo"]["error"], "");
    assert_eq!(body["promo"]["code"], "BOGUS");
}

#[tokio::test]
async fn test_cart_survives_restart_but_promo_does_not() {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
    let catalog: Arc<dyn ProductSource> = Arc::new(StaticCatalog::new(sample_products()));

    let app = create_test_app_with(storage.clone(), catalog.clone(), Duration::from_secs(3));
    add(&app, 2).await;
    add(&app, 1).await;
    send_request(&app, "POST", "/cart/promo", Some(json!({ "code": "DISCOUNT30" }))).await;
    let (_, before) = send_request(&app, "GET", "/cart", None).await;

    let restarted = create_test_app_with(storage, catalog, Duration::from_secs(3));
    let (_, after) = send_request(&restarted, "GET", "/cart", None).await;
    assert_eq!(after["items"], before["items"]);
    assert_eq!(after["promo"]["code"], "");
    assert_eq!(after["totals"]["discount"].as_str().unwrap().parse::<f64>().unwrap(), 0.0);
}

#[tokio::test]
async fn test_checkout_is_a_stub() {
    let app = create_test_app();
    add(&app, 1).await;

    let (status, body) = send_request(&app, "POST", "/checkout", None).await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(body["status"], "not_implemented");
    assert_eq!(body["message"], "Sorry, the functionality is not implemented yet.");

    let (_, cart) = send_request(&app, "GET", "/cart", None).await;
    assert_eq!(cart["lineCount"], 1);
}

#[tokio::test]
async fn test_file_storage_record_follows_cart() {
    let dir = tempfile::tempdir().unwrap();
    let record = dir.path().join("cart.json");
    let storage: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::open(dir.path()).unwrap());
    let app = create_test_app_with(
        storage,
        Arc::new(StaticCatalog::new(sample_products())),
        Duration::from_secs(3),
    );

    add(&app, 1).await;
    let persisted: Value =
        serde_json::from_str(&std::fs::read_to_string(&record).unwrap()).unwrap();
    assert_eq!(persisted[0]["id"], 1);
    assert_eq!(persisted[0]["quantity"], 1);
    assert_eq!(persisted[0]["thumbnail"], "https://cdn.example/1.png");

    // The record is deleted rather than left as an empty array
    send_request(&app, "DELETE", "/cart/items/1", None).await;
    assert!(!record.exists());
}

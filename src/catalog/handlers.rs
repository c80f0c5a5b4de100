//! Product listing and detail routes

use crate::cart::{models::Product, state::SharedState};
use crate::catalog::ProductKey;
use crate::error::AppError;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

/// Creates routes for catalog browsing
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/:key", get(product_detail))
}

/// A catalog product annotated for display
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub slug: String,
    pub in_cart: bool,
}

/// Endpoint: GET /products
async fn list_products(
    State(state): State<SharedState>,
) -> Result<Json<Vec<ProductView>>, AppError> {
    let products = state
        .catalog
        .fetch_all()
        .await
        .map_err(|e| AppError::catalog("Failed to fetch products", e))?;

    let cart = state.cart.lock().await;
    let views = products
        .into_iter()
        .map(|product| ProductView {
            slug: product.slug(),
            in_cart: cart.contains(product.id),
            product,
        })
        .collect();

    Ok(Json(views))
}

/// Endpoint: GET /products/:key
/// `key` is either a numeric id or a slug.
async fn product_detail(
    State(state): State<SharedState>,
    Path(key): Path<String>,
) -> Result<Json<ProductView>, AppError> {
    let product = state
        .catalog
        .fetch_by_key(&ProductKey::parse(&key))
        .await
        .map_err(|e| AppError::catalog("Failed to fetch product details", e))?
        .ok_or_else(|| AppError::NotFound("Product not found.".into()))?;

    let in_cart = state.cart.lock().await.contains(product.id);
    Ok(Json(ProductView {
        slug: product.slug(),
        in_cart,
        product,
    }))
}

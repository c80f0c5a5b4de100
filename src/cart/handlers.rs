//! REST API handlers for shopping cart operations
//!
//! These routes are a thin adapter for the view layer: each one forwards to a
//! single `CartStore` operation and answers with the resulting cart.

use super::{helpers::format_item_summary, models::*, promo::PromoOutcome, state::SharedState};
use crate::catalog::ProductKey;
use crate::error::AppError;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{debug, info};

/// Shown by the checkout stub
pub const CHECKOUT_NOT_IMPLEMENTED: &str = "Sorry, the functionality is not implemented yet.";

/// Creates routes for cart-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/cart", get(view_cart))
        .route("/cart/items", post(add_item))
        .route("/cart/items/:id", put(update_item).delete(remove_item))
        .route("/cart/promo", put(set_promo_code).post(apply_promo))
        .route("/checkout", post(checkout))
}

/// Endpoint: GET /cart
async fn view_cart(State(state): State<SharedState>) -> Json<CartView> {
    let cart = state.cart.lock().await;
    Json(cart.snapshot().into())
}

/// Endpoint: POST /cart/items
/// Looks the product up in the catalog and adds one unit of it.
async fn add_item(
    State(state): State<SharedState>,
    Json(payload): Json<AddToCartInput>,
) -> Result<Json<CartView>, AppError> {
    let key = match (payload.product_id, payload.slug) {
        (Some(id), _) => ProductKey::Id(id),
        (None, Some(slug)) => ProductKey::Slug(slug),
        (None, None) => {
            return Err(AppError::BadRequest(
                "either productId or slug is required".into(),
            ))
        }
    };

    // The lock is not held while the catalog is queried.
    let product = state
        .catalog
        .fetch_by_key(&key)
        .await
        .map_err(|e| AppError::catalog("Failed to fetch product details", e))?
        .ok_or_else(|| AppError::NotFound("Product not found.".into()))?;

    let mut cart = state.cart.lock().await;
    cart.add_to_cart(&product)?;
    info!(product_id = product.id, title = %product.title, "added to cart");

    Ok(Json(cart.snapshot().into()))
}

/// Endpoint: PUT /cart/items/:id
async fn update_item(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    Json(payload): Json<UpdateQuantityInput>,
) -> Result<Json<CartView>, AppError> {
    let mut cart = state.cart.lock().await;
    cart.update_quantity(id, payload.quantity)?;
    Ok(Json(cart.snapshot().into()))
}

/// Endpoint: DELETE /cart/items/:id
async fn remove_item(State(state): State<SharedState>, Path(id): Path<u64>) -> Json<CartView> {
    let mut cart = state.cart.lock().await;
    if cart.remove_from_cart(id) {
        info!(product_id = id, "removed from cart");
    }
    Json(cart.snapshot().into())
}

/// Endpoint: PUT /cart/promo
/// Stores the promo input text without applying it.
async fn set_promo_code(
    State(state): State<SharedState>,
    Json(payload): Json<SetPromoCodeInput>,
) -> Json<CartView> {
    let mut cart = state.cart.lock().await;
    cart.set_promo_code(payload.code);
    Json(cart.snapshot().into())
}

/// Endpoint: POST /cart/promo
/// Applies the given code, or the stored input text when the request has no
/// JSON body. A JSON body that does not parse is rejected.
async fn apply_promo(
    State(state): State<SharedState>,
    body: Result<Json<ApplyPromoInput>, JsonRejection>,
) -> Result<Json<CartView>, AppError> {
    let payload = match body {
        Ok(Json(payload)) => payload,
        Err(JsonRejection::MissingJsonContentType(_)) => ApplyPromoInput::default(),
        Err(e) => return Err(AppError::BadRequest(e.body_text())),
    };

    let (outcome, generation, view) = {
        let mut cart = state.cart.lock().await;
        let code = match payload.code {
            Some(code) => {
                cart.set_promo_code(code.clone());
                code
            }
            None => cart.promo().code.clone(),
        };
        let outcome = cart.apply_promo_code(&code);
        (outcome, cart.promo_generation(), CartView::from(cart.snapshot()))
    };

    if outcome == PromoOutcome::Invalid {
        schedule_promo_error_dismissal(state, generation);
    }

    Ok(Json(view))
}

/// Clears the promo error after the display interval, unless another promo
/// error was raised in the meantime.
fn schedule_promo_error_dismissal(state: SharedState, generation: u64) {
    tokio::spawn(async move {
        tokio::time::sleep(state.promo_error_display).await;
        let mut cart = state.cart.lock().await;
        if cart.promo_generation() == generation {
            cart.dismiss_promo_error();
            debug!("promo error dismissed");
        }
    });
}

/// Endpoint: POST /checkout
/// Placeholder: the cart is left as it is.
async fn checkout(State(state): State<SharedState>) -> (StatusCode, Json<StatusResponse>) {
    let cart = state.cart.lock().await;
    info!(items = %format_item_summary(cart.items()), "checkout requested");

    (
        StatusCode::NOT_IMPLEMENTED,
        Json(StatusResponse {
            status: "not_implemented".to_string(),
            message: CHECKOUT_NOT_IMPLEMENTED.to_string(),
        }),
    )
}

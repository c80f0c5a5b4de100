//! Shopping Cart Domain Models
//!
//! This module contains all data structures related to the shopping cart
//! business domain: catalog products, cart line items, promo state, derived
//! totals, and the request/response shapes of the cart routes.

use super::helpers::{effective_price, generate_slug, line_original, line_subtotal};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

// =============================================================================
// Catalog Models
// =============================================================================

/// A product record as served by the remote catalog.
///
/// Prices are decimal amounts in an unspecified currency. Catalog fields the
/// cart does not interpret are kept in `extra` so a snapshotted line item
/// carries every field the catalog sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub category: String,

    /// Unit price before the product discount
    pub price: Decimal,

    /// Product discount, 0 to 100
    #[serde(default)]
    pub discount_percentage: Decimal,

    #[serde(default)]
    pub rating: f64,

    #[serde(default)]
    pub stock: u32,

    /// Some catalog entries (e.g. groceries) have no brand
    #[serde(default)]
    pub brand: Option<String>,

    #[serde(default)]
    pub thumbnail: String,

    #[serde(default)]
    pub reviews: Vec<Review>,

    /// Captures any extra fields (e.g., tags, warrantyInformation) dynamically
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Product {
    /// Unit price after the product discount, `None` when out of range
    pub fn effective_price(&self) -> Option<Decimal> {
        effective_price(self.price, self.discount_percentage)
    }

    /// URL-friendly key derived from the title
    pub fn slug(&self) -> String {
        generate_slug(&self.title)
    }
}

/// A customer review attached to a product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default)]
    pub reviewer_name: String,

    #[serde(default)]
    pub rating: u32,

    #[serde(default)]
    pub comment: String,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Envelope returned by the catalog's list endpoint
#[derive(Debug, Deserialize)]
pub struct ProductList {
    pub products: Vec<Product>,
}

// =============================================================================
// Cart Domain Models
// =============================================================================

/// Returns the default quantity (1) for cart items
fn default_quantity() -> u32 {
    1
}

/// One product entry in the cart.
///
/// The product fields are a snapshot taken when the product was first added;
/// later catalog changes do not affect them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLineItem {
    #[serde(flatten)]
    pub product: Product,

    /// Quantity of this item (defaults to 1)
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl CartLineItem {
    /// Snapshots `product` into a new line with quantity 1
    pub fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    pub fn id(&self) -> u64 {
        self.product.id
    }

    /// Effective price times quantity, `None` when out of range
    pub fn subtotal(&self) -> Option<Decimal> {
        line_subtotal(self)
    }
}

/// Promo code input and the outcome of the last application.
///
/// Never persisted; a rehydrated cart always starts with the default.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromoState {
    /// Free-form text the user typed, independent of application
    pub code: String,

    /// Absolute amount computed at apply-time
    pub discount: Decimal,

    /// Last validation error, empty when none
    pub error: String,
}

/// Totals derived from the cart on every read
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

/// Read-only view of the whole cart at one point in time
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub items: Vec<CartLineItem>,
    pub promo: PromoState,
    pub totals: CartTotals,
}

impl CartSnapshot {
    /// Number of distinct line items
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities across all lines
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}

// =============================================================================
// Request Models
// =============================================================================

/// Input for adding a product to the cart, by id or by slug
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartInput {
    pub product_id: Option<u64>,
    pub slug: Option<String>,
}

/// Input for setting a line item's quantity
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityInput {
    pub quantity: u32,
}

/// Input for editing the promo code text
#[derive(Debug, Deserialize)]
pub struct SetPromoCodeInput {
    pub code: String,
}

/// Input for applying a promo code; falls back to the stored text
#[derive(Debug, Default, Deserialize)]
pub struct ApplyPromoInput {
    #[serde(default)]
    pub code: Option<String>,
}

// =============================================================================
// Response Models
// =============================================================================

/// A line item with its display amounts.
///
/// Lines held by the store always have in-range amounts, so the zero
/// fallbacks below are never observed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineView {
    #[serde(flatten)]
    pub item: CartLineItem,
    pub effective_price: Decimal,
    pub line_subtotal: Decimal,
    /// Price before the product discount, times quantity
    pub line_original: Decimal,
}

impl From<CartLineItem> for LineView {
    fn from(item: CartLineItem) -> Self {
        Self {
            effective_price: item.product.effective_price().unwrap_or_default(),
            line_subtotal: line_subtotal(&item).unwrap_or_default(),
            line_original: line_original(&item).unwrap_or_default(),
            item,
        }
    }
}

/// Response body of every cart route
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<LineView>,
    pub promo: PromoState,
    pub totals: CartTotals,
    pub line_count: usize,
    pub item_count: u64,
}

impl From<CartSnapshot> for CartView {
    fn from(snapshot: CartSnapshot) -> Self {
        let line_count = snapshot.line_count();
        let item_count = snapshot.item_count();
        Self {
            items: snapshot.items.into_iter().map(LineView::from).collect(),
            promo: snapshot.promo,
            totals: snapshot.totals,
            line_count,
            item_count,
        }
    }
}

/// Response for operations that only report a status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Status of the operation
    pub status: String,

    /// Human-readable message
    pub message: String,
}

//! Cart Store
//!
//! Single source of truth for cart contents and promo state. Line items are
//! persisted to a [`KeyValueStorage`] after every mutation; promo state is
//! kept in memory only. Readers either call the accessors directly or hold a
//! [`watch::Receiver`] from [`CartStore::subscribe`].

use super::{
    helpers::{first_overflowing_line, subtotal},
    models::{CartLineItem, CartSnapshot, CartTotals, Product, PromoState},
    promo::{discount_rate, PromoOutcome, INVALID_PROMO_MESSAGE},
};
use crate::storage::KeyValueStorage;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, warn};

/// Name of the persisted record holding the line items
pub const CART_STORAGE_KEY: &str = "cart";

/// Errors returned to callers of cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("quantity for product {product_id} must be at least 1, got {requested}")]
    QuantityBelowMinimum { product_id: u64, requested: u32 },

    #[error("cart amounts for product {product_id} exceed the supported range")]
    AmountOutOfRange { product_id: u64 },
}

pub struct CartStore {
    items: Vec<CartLineItem>,
    promo: PromoState,
    /// Bumped whenever the promo error is (re)set
    promo_generation: u64,
    storage: Arc<dyn KeyValueStorage>,
    updates: watch::Sender<CartSnapshot>,
}

impl CartStore {
    /// Creates an empty store. Nothing is read from `storage` until
    /// [`initialize`](Self::initialize) runs.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let (updates, _) = watch::channel(CartSnapshot::default());
        Self {
            items: Vec::new(),
            promo: PromoState::default(),
            promo_generation: 0,
            storage,
            updates,
        }
    }

    /// Creates a store and rehydrates it from `storage`
    pub fn open(storage: Arc<dyn KeyValueStorage>) -> Self {
        let mut store = Self::new(storage);
        store.initialize();
        store
    }

    /// Loads the persisted line items.
    ///
    /// A missing record yields an empty cart. An unreadable or corrupt record
    /// is logged, erased, and also yields an empty cart; nothing is returned
    /// to the caller.
    pub fn initialize(&mut self) {
        self.items = match self.storage.get_item(CART_STORAGE_KEY) {
            Ok(Some(raw)) => match decode_items(&raw) {
                Ok(items) => {
                    debug!(lines = items.len(), "rehydrated cart from storage");
                    items
                }
                Err(reason) => {
                    error!(%reason, "failed to parse persisted cart, discarding it");
                    if let Err(e) = self.storage.remove_item(CART_STORAGE_KEY) {
                        warn!(error = %e, "failed to erase corrupt cart record");
                    }
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "cart storage unavailable, starting empty");
                Vec::new()
            }
        };
        self.publish();
    }

    // =========================================================================
    // Line item mutations
    // =========================================================================

    /// Adds one unit of `product`.
    ///
    /// An existing line for the same id gets its quantity incremented and
    /// keeps its original snapshot; otherwise the product is copied into a new
    /// line with quantity 1. A change whose amounts would leave the
    /// `Decimal` range is rejected and nothing is persisted.
    pub fn add_to_cart(&mut self, product: &Product) -> Result<(), CartError> {
        let out_of_range = CartError::AmountOutOfRange {
            product_id: product.id,
        };

        match self.items.iter().position(|i| i.id() == product.id) {
            Some(index) => {
                let previous = self.items[index].quantity;
                let Some(next) = previous.checked_add(1) else {
                    warn!(product_id = product.id, "rejected quantity increment past u32::MAX");
                    return Err(out_of_range);
                };
                self.items[index].quantity = next;
                if let Err(e) = self.ensure_amounts_in_range() {
                    self.items[index].quantity = previous;
                    return Err(e);
                }
            }
            None => {
                self.items.push(CartLineItem::new(product.clone()));
                if let Err(e) = self.ensure_amounts_in_range() {
                    self.items.pop();
                    return Err(e);
                }
            }
        }

        self.commit();
        Ok(())
    }

    /// Deletes the line for `product_id`. Absent ids are a no-op.
    ///
    /// Returns whether a line was removed.
    pub fn remove_from_cart(&mut self, product_id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id() != product_id);
        let removed = self.items.len() != before;
        if removed {
            self.commit();
        }
        removed
    }

    /// Sets the quantity of the line for `product_id`.
    ///
    /// A quantity of 0 is rejected and the cart is left untouched, so a
    /// decrement below 1 can never create an empty line. So is a quantity
    /// whose amounts would leave the `Decimal` range. Absent ids are a no-op.
    pub fn update_quantity(&mut self, product_id: u64, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            warn!(product_id, "rejected quantity update below 1");
            return Err(CartError::QuantityBelowMinimum {
                product_id,
                requested: quantity,
            });
        }

        if let Some(index) = self.items.iter().position(|i| i.id() == product_id) {
            let previous = self.items[index].quantity;
            self.items[index].quantity = quantity;
            if let Err(e) = self.ensure_amounts_in_range() {
                self.items[index].quantity = previous;
                return Err(e);
            }
            self.commit();
        }
        Ok(())
    }

    // =========================================================================
    // Promo mutations (not persisted)
    // =========================================================================

    /// Replaces the promo input text without applying it
    pub fn set_promo_code(&mut self, code: impl Into<String>) {
        self.promo.code = code.into();
        self.publish();
    }

    /// Evaluates `code` against the lookup table.
    ///
    /// The previous discount and error are cleared first. A valid code sets
    /// the discount to its rate times the current subtotal; the amount is not
    /// recomputed when the cart changes later.
    pub fn apply_promo_code(&mut self, code: &str) -> PromoOutcome {
        self.promo.error.clear();
        self.promo.discount = Decimal::ZERO;

        let outcome = match discount_rate(code) {
            Some(rate) => {
                self.promo.discount = self
                    .totals()
                    .subtotal
                    .checked_mul(rate)
                    .unwrap_or_default();
                PromoOutcome::Applied {
                    discount: self.promo.discount,
                }
            }
            None => {
                self.promo.error = INVALID_PROMO_MESSAGE.to_string();
                PromoOutcome::Invalid
            }
        };
        self.promo_generation += 1;

        debug!(code, ?outcome, "applied promo code");
        self.publish();
        outcome
    }

    /// Overwrites the promo error message
    pub fn set_promo_error(&mut self, message: impl Into<String>) {
        self.promo.error = message.into();
        self.promo_generation += 1;
        self.publish();
    }

    /// Clears the promo error message, keeping any discount
    pub fn dismiss_promo_error(&mut self) {
        if !self.promo.error.is_empty() {
            self.promo.error.clear();
            self.publish();
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn promo(&self) -> &PromoState {
        &self.promo
    }

    /// Changes every time the promo error is set, so a delayed dismissal can
    /// tell whether the message it was scheduled for is still showing.
    pub fn promo_generation(&self) -> u64 {
        self.promo_generation
    }

    /// Whether a line exists for `product_id`
    pub fn contains(&self, product_id: u64) -> bool {
        self.items.iter().any(|i| i.id() == product_id)
    }

    /// Number of distinct line items
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities across all lines
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Subtotal, promo discount, and subtotal minus discount
    ///
    /// Every mutation keeps the line amounts in range, so the zero fallbacks
    /// only guard against arithmetic the store has already ruled out.
    pub fn totals(&self) -> CartTotals {
        let subtotal = subtotal(&self.items).unwrap_or_else(|| {
            error!("cart subtotal out of range");
            Decimal::ZERO
        });
        CartTotals {
            subtotal,
            discount: self.promo.discount,
            total: subtotal
                .checked_sub(self.promo.discount)
                .unwrap_or_default(),
        }
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            promo: self.promo.clone(),
            totals: self.totals(),
        }
    }

    /// Receiver that observes a fresh snapshot after every mutation
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.updates.subscribe()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn ensure_amounts_in_range(&self) -> Result<(), CartError> {
        match first_overflowing_line(&self.items) {
            Some(product_id) => {
                warn!(product_id, "rejected cart change with out-of-range amounts");
                Err(CartError::AmountOutOfRange { product_id })
            }
            None => Ok(()),
        }
    }

    fn commit(&mut self) {
        self.persist();
        self.publish();
    }

    /// Writes the line items, or erases the record when the cart is empty.
    /// Failures are logged only.
    fn persist(&self) {
        let result = if self.items.is_empty() {
            self.storage.remove_item(CART_STORAGE_KEY)
        } else {
            match serde_json::to_string(&self.items) {
                Ok(raw) => self.storage.set_item(CART_STORAGE_KEY, &raw),
                Err(e) => {
                    error!(error = %e, "failed to serialize cart");
                    return;
                }
            }
        };

        if let Err(e) = result {
            warn!(error = %e, "failed to persist cart");
        }
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }
}

/// Parses a persisted record, rejecting data that breaks the line invariants
fn decode_items(raw: &str) -> Result<Vec<CartLineItem>, String> {
    let items: Vec<CartLineItem> = serde_json::from_str(raw).map_err(|e| e.to_string())?;

    for (index, item) in items.iter().enumerate() {
        if item.quantity == 0 {
            return Err(format!("line {} has quantity 0", item.id()));
        }
        if items[..index].iter().any(|other| other.id() == item.id()) {
            return Err(format!("duplicate line for product {}", item.id()));
        }
    }
    if let Some(product_id) = first_overflowing_line(&items) {
        return Err(format!("amounts for product {product_id} are out of range"));
    }
    Ok(items)
}

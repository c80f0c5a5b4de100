//! Shopping Cart Domain Module
//!
//! This module contains all shopping cart business logic, including:
//! - Domain models (Product, CartLineItem, totals, inputs, responses)
//! - Pricing and formatting helpers
//! - Promo code lookup
//! - The cart store and its persistence
//! - Application state management
//! - REST API handlers

pub mod handlers;
pub mod helpers;
pub mod models;
pub mod promo;
pub mod state;
pub mod store;

// Re-export commonly used types for convenience
pub use handlers::routes;
pub use state::{AppState, SharedState};
pub use store::{CartError, CartStore, CART_STORAGE_KEY};

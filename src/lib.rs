//! Storefront Cart Library
//!
//! This library provides the cart state container of a small storefront:
//! line items with snapshot pricing, promo codes, derived totals, and
//! persistence to local key-value storage, plus a thin HTTP surface over a
//! remote product catalog.

// Domain modules
pub mod cart;
pub mod catalog;

// Infrastructure
pub mod config;
pub mod error;
pub mod router;
pub mod storage;

//! Product Catalog Module
//!
//! Read-only access to the remote product catalog, including:
//! - The `ProductSource` trait consumed by the cart routes
//! - `HttpCatalog`, the HTTP client for the public catalog API
//! - `StaticCatalog`, a fixed in-memory product list
//! - Product listing and detail routes

pub mod fixed;
pub mod handlers;
pub mod http;

pub use fixed::StaticCatalog;
pub use handlers::routes;
pub use http::HttpCatalog;

use crate::cart::models::Product;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while reading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog responded with status {0}")]
    Status(reqwest::StatusCode),

    #[error("catalog response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// How a single product is addressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductKey {
    Id(u64),
    /// Lowercased title with whitespace runs replaced by `-`
    Slug(String),
}

impl ProductKey {
    /// Interprets an all-digit segment as an id and anything else as a slug
    pub fn parse(segment: &str) -> Self {
        match segment.parse::<u64>() {
            Ok(id) if segment.bytes().all(|b| b.is_ascii_digit()) => Self::Id(id),
            _ => Self::Slug(segment.to_string()),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::Id(id) => product.id == *id,
            Self::Slug(slug) => product.slug() == *slug,
        }
    }
}

/// A read-only remote catalog.
///
/// Failures are reported to the caller, who must treat them as "no data
/// available".
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Returns the full product collection
    async fn fetch_all(&self) -> Result<Vec<Product>, CatalogError>;

    /// Returns the product addressed by `key`, `None` when it does not exist
    async fn fetch_by_key(&self, key: &ProductKey) -> Result<Option<Product>, CatalogError> {
        let products = self.fetch_all().await?;
        Ok(products.into_iter().find(|p| key.matches(p)))
    }
}

//! Fixed in-memory catalog

use super::{CatalogError, ProductSource};
use crate::cart::models::Product;
use async_trait::async_trait;

/// Serves a product list that never changes
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl ProductSource for StaticCatalog {
    async fn fetch_all(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.clone())
    }
}

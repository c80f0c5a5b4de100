//! HTTP client for the public product catalog
//!
//! Talks to a DummyJSON-style API: `GET {base}/products` returns
//! `{ "products": [...] }` and `GET {base}/products/{id}` returns one record.

use super::{CatalogError, ProductKey, ProductSource};
use crate::cart::models::{Product, ProductList};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info};

/// Default public catalog
pub const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GETs `path` and decodes the body. A 404 yields `None`.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "fetching from catalog");

        let response = self.client.get(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            status if !status.is_success() => return Err(CatalogError::Status(status)),
            _ => {}
        }

        let body = response.bytes().await?;
        Ok(Some(serde_json::from_slice(&body)?))
    }
}

#[async_trait]
impl ProductSource for HttpCatalog {
    async fn fetch_all(&self) -> Result<Vec<Product>, CatalogError> {
        let list: Option<ProductList> = self.get_json("/products").await?;
        let products = list.map(|l| l.products).unwrap_or_default();
        info!(count = products.len(), "fetched product list");
        Ok(products)
    }

    async fn fetch_by_key(&self, key: &ProductKey) -> Result<Option<Product>, CatalogError> {
        match key {
            ProductKey::Id(id) => self.get_json(&format!("/products/{id}")).await,
            ProductKey::Slug(_) => {
                let products = self.fetch_all().await?;
                Ok(products.into_iter().find(|p| key.matches(p)))
            }
        }
    }
}

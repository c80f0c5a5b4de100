//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STOREFRONT_HOST` - Bind address (default: 0.0.0.0)
//! - `STOREFRONT_PORT` - Listen port (default: 8000)
//! - `CATALOG_BASE_URL` - Product catalog API (default: https://dummyjson.com)
//! - `CART_STORAGE_DIR` - Directory holding the persisted cart (default: .storefront)
//! - `PROMO_ERROR_DISPLAY_SECS` - How long a promo error stays visible (default: 3)

use crate::catalog::http::DEFAULT_CATALOG_URL;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_STORAGE_DIR: &str = ".storefront";
const DEFAULT_PROMO_ERROR_DISPLAY_SECS: u64 = 3;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Base URL of the product catalog API
    pub catalog_base_url: String,
    /// Directory for the file-backed cart storage
    pub storage_dir: PathBuf,
    /// Delay before a promo validation error is cleared
    pub promo_error_display: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            catalog_base_url: DEFAULT_CATALOG_URL.to_string(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            promo_error_display: Duration::from_secs(DEFAULT_PROMO_ERROR_DISPLAY_SECS),
        }
    }
}

impl AppConfig {
    /// Reads the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            host: parse_var(&lookup, "STOREFRONT_HOST")?.unwrap_or(defaults.host),
            port: parse_var(&lookup, "STOREFRONT_PORT")?.unwrap_or(defaults.port),
            catalog_base_url: lookup("CATALOG_BASE_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.catalog_base_url),
            storage_dir: lookup("CART_STORAGE_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            promo_error_display: parse_var(&lookup, "PROMO_ERROR_DISPLAY_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.promo_error_display),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(name.to_string(), e.to_string())),
    }
}

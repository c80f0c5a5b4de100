//! Error responses for the HTTP surface
//!
//! Every route returns `Result<T, AppError>`; the error is logged and turned
//! into a status code with a `{ "error": message }` body.

use crate::cart::store::CartError;
use crate::catalog::CatalogError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The catalog could not be read. `message` is what the user sees.
    #[error("{message}: {source}")]
    CatalogUnavailable {
        message: &'static str,
        #[source]
        source: CatalogError,
    },

    /// A cart mutation was refused.
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),
}

impl AppError {
    pub fn catalog(message: &'static str, source: CatalogError) -> Self {
        Self::CatalogUnavailable { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::CatalogUnavailable { .. } => StatusCode::BAD_GATEWAY,
            Self::Cart(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Message safe to show to the end user
    pub fn public_message(&self) -> String {
        match self {
            Self::CatalogUnavailable { message, .. } => (*message).to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

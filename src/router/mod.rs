//! Routing module for the storefront cart application

use crate::cart::state::SharedState;
use axum::{body::Body, extract::Request, middleware::Next, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn, Instrument};
use uuid::Uuid;

/// Creates and configures the application router with all routes and middleware
pub fn create_app_router(state: SharedState) -> Router {
    // Middleware: Log requests inside a per-request span
    let log_layer = axum::middleware::from_fn(|req: Request<Body>, next: Next| async move {
        let span = tracing::info_span!(
            "request",
            request_id = %Uuid::new_v4().simple(),
            method = %req.method(),
            uri = %req.uri(),
        );

        async move {
            info!("REQ");
            let res = next.run(req).await;
            if !res.status().is_success() {
                warn!(status = %res.status(), "RES (Error)");
            }
            res
        }
        .instrument(span)
        .await
    });

    // Middleware: CORS (Permissive for local dev)
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Routes
    Router::new()
        .merge(crate::catalog::routes())
        .merge(crate::cart::routes())
        .layer(log_layer)
        .layer(cors_layer)
        .with_state(state)
}

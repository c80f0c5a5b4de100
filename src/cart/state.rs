//! Shopping Cart State Management
//!
//! This module owns the application state shared by the routes: the cart
//! store (single writer, behind a mutex) and the product catalog.

use super::store::CartStore;
use crate::catalog::ProductSource;
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

/// Core application state containing the cart and its collaborators
pub struct AppState {
    /// The one cart. Every route mutates it through this lock, so operations
    /// never interleave.
    pub cart: Mutex<CartStore>,

    /// Read-only product catalog
    pub catalog: Arc<dyn ProductSource>,

    /// Delay before an invalid promo message is cleared
    pub promo_error_display: Duration,
}

impl AppState {
    pub fn new(
        cart: CartStore,
        catalog: Arc<dyn ProductSource>,
        promo_error_display: Duration,
    ) -> Self {
        Self {
            cart: Mutex::new(cart),
            catalog,
            promo_error_display,
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}

//! Cart engine bound to one session
//!
//! Every mutation persists the full cart snapshot through the storage
//! port, so a page reload restores the cart alongside its session.
//! Checkout is two-phase: nothing local is cleared until the server
//! acknowledges the order, so on failure the cart and session are
//! exactly as they were.

use std::sync::Arc;

use thiserror::Error;

use crate::error::ClientError;
use crate::http::HttpClient;
use crate::session::SessionManager;
use crate::session::storage::{SessionStore, StorageError};
use shared::models::{Cart, Order, OrderCreate};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("No live session")]
    NoSession,

    #[error("Cart is empty")]
    EmptyCart,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Persistence-backed cart operations for the customer flow
pub struct CartEngine<S: SessionStore> {
    storage: Arc<S>,
    cart: Cart,
}

impl<S: SessionStore> CartEngine<S> {
    /// Restore the persisted cart (empty when nothing was saved).
    pub fn load(storage: Arc<S>) -> Result<Self, StorageError> {
        let cart = storage.load_cart()?;
        Ok(Self { storage, cart })
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn total_cents(&self) -> i64 {
        self.cart.total_cents()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Add one unit of an item, then persist.
    pub fn add(&mut self, item_id: i64, name: &str, price_cents: i64) -> Result<(), StorageError> {
        self.cart.add(item_id, name, price_cents);
        self.persist()
    }

    /// Bump a present item, then persist. Returns false when absent.
    pub fn increment(&mut self, item_id: i64) -> Result<bool, StorageError> {
        let changed = self.cart.increment(item_id);
        if changed {
            self.persist()?;
        }
        Ok(changed)
    }

    /// Drop a present item's quantity (removing it at 1), then persist.
    pub fn decrement(&mut self, item_id: i64) -> Result<bool, StorageError> {
        let changed = self.cart.decrement(item_id);
        if changed {
            self.persist()?;
        }
        Ok(changed)
    }

    /// Delete an item, then persist.
    pub fn remove(&mut self, item_id: i64) -> Result<(), StorageError> {
        self.cart.remove(item_id);
        self.persist()
    }

    fn persist(&self) -> Result<(), StorageError> {
        self.storage.save_cart(&self.cart)
    }

    /// Submit the cart as an order.
    ///
    /// Two-phase: the order is built from the live session and submitted;
    /// only on server acknowledgment is the cart cleared and the session
    /// ended (which also cancels the eviction timer). Any failure leaves
    /// cart and session untouched for a retry.
    pub async fn checkout(
        &mut self,
        http: &HttpClient,
        manager: &mut SessionManager<S>,
        payment_method: &str,
    ) -> Result<Order, CheckoutError> {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let session = self
            .storage
            .load_session()?
            .ok_or(CheckoutError::NoSession)?;

        let payload = OrderCreate {
            customer_name: Some(session.name.clone()),
            table_name: None,
            phone: Some(session.phone.clone()),
            payment_method: payment_method.to_string(),
            total_cents: self.cart.total_cents(),
            lines: self.cart.to_order_lines(),
        };

        let order = http.create_order(&payload).await?;

        self.cart.clear();
        manager.end()?;
        tracing::info!(order_id = order.id, "Checkout confirmed, session ended");
        Ok(order)
    }
}

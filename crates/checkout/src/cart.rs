//! The shopping cart handle shared between the storefront and checkout.
//!
//! Checkout only ever reads the cart until the final success point, at
//! which it performs a single clearing mutation. There is no partial or
//! incremental mutation during checkout.

use std::sync::{Arc, Mutex, PoisonError};

use kikuubo_core::{Money, ProductId};
use serde::{Deserialize, Serialize};

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub title: String,
    pub quantity: u32,
    pub unit_price: Money,
}

impl CartLine {
    /// Price of this line (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add a line; merges quantity into an existing line for the same
    /// product.
    pub fn add_line(&mut self, line: CartLine) {
        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == line.product_id)
        {
            existing.quantity += line.quantity;
        } else {
            self.lines.push(line);
        }
    }

    /// The cart lines.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total quantity across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Remove every line. Checkout calls this exactly once, after both
    /// the order and the payment have been created.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Shared handle to the cart.
pub type SharedCart = Arc<Mutex<Cart>>;

/// Wrap a cart in a shared handle.
#[must_use]
pub fn shared(cart: Cart) -> SharedCart {
    Arc::new(Mutex::new(cart))
}

/// Run a closure against the cart behind a shared handle.
///
/// A poisoned lock is recovered: the cart is plain data and stays
/// consistent even if a holder panicked.
pub fn with_cart<R>(cart: &SharedCart, f: impl FnOnce(&mut Cart) -> R) -> R {
    let mut guard = cart.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

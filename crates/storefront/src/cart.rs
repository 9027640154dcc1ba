//! Shopping cart state and its persisted snapshot.
//!
//! The cart is an insertion-ordered list of lines, at most one per product.
//! Every mutation rewrites the whole snapshot under [`CART_STORAGE_KEY`];
//! loading is best-effort and falls back to an empty cart.

use std::sync::Arc;

use lustre_core::{Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::store::KeyValueStore;

/// Key under which the cart snapshot is stored.
pub const CART_STORAGE_KEY: &str = "jewelry_cart";

/// One product in the cart with its quantity.
///
/// Serialized flat: the product's fields followed by `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// The product id this line belongs to.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Price times quantity, unrounded.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// The session's cart, synchronized to a key-value store.
pub struct Cart {
    lines: Vec<CartLine>,
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Cart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cart")
            .field("lines", &self.lines)
            .field("store", &"[dyn KeyValueStore]")
            .finish()
    }
}

impl Cart {
    /// Restore the cart from the store.
    ///
    /// A missing, unreadable or corrupt snapshot yields an empty cart; the
    /// problem is logged and never surfaced.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let lines = match store.get(CART_STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartLine>>(&raw) {
                Ok(lines) => normalize(lines),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding corrupt cart snapshot");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cart snapshot");
                Vec::new()
            }
        };

        tracing::debug!(lines = lines.len(), "Cart loaded");
        Self { lines, store }
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line or appends a new one. There is no
    /// rejection path, so this always returns `true`.
    pub fn add_item(&mut self, product: &Product) -> bool {
        if let Some(line) = self.lines.iter_mut().find(|l| l.id() == product.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLine {
                product: product.clone(),
                quantity: 1,
            });
        }
        self.persist();
        true
    }

    /// Change a line's quantity by `delta`.
    ///
    /// Unknown ids are a no-op and return `false`. A resulting quantity of
    /// zero or below removes the line.
    pub fn update_quantity(&mut self, id: ProductId, delta: i32) -> bool {
        let Some(pos) = self.lines.iter().position(|l| l.id() == id) else {
            return false;
        };

        let remaining = self
            .lines
            .get(pos)
            .map_or(0, |l| i64::from(l.quantity) + i64::from(delta));

        if remaining <= 0 {
            self.lines.remove(pos);
        } else if let Some(line) = self.lines.get_mut(pos) {
            line.quantity = u32::try_from(remaining).unwrap_or(u32::MAX);
        }

        self.persist();
        true
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |sum, l| sum.saturating_add(l.quantity))
    }

    /// Sum of price times quantity, unrounded.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total as a display price.
    #[must_use]
    pub fn total_price(&self) -> Price {
        Price::usd(self.total())
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.persist();
    }

    fn persist(&self) {
        let raw = match serde_json::to_string(&self.lines) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize cart snapshot");
                return;
            }
        };
        if let Err(e) = self.store.set(CART_STORAGE_KEY, &raw) {
            tracing::warn!(error = %e, "Failed to persist cart snapshot");
        }
    }
}

/// Merge repeated ids into the first occurrence and drop empty lines.
fn normalize(lines: Vec<CartLine>) -> Vec<CartLine> {
    let mut merged: Vec<CartLine> = Vec::with_capacity(lines.len());
    for line in lines {
        if let Some(existing) = merged.iter_mut().find(|l| l.id() == line.id()) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            merged.push(line);
        }
    }
    merged.retain(|l| l.quantity > 0);
    merged
}

//! The shopping cart state machine.
//!
//! A [`Cart`] holds at most one [`CartLine`] per product. Each line moves
//! through a small set of states:
//!
//! ```text
//! absent --add--> present(1)
//! present(n) --change(d)--> present(n + d)     when n + d >= 1
//! present(n) --change(d)--> absent             when n + d <= 0
//! present(n) --remove--> absent
//! ```
//!
//! Lines copy the product's name, price and default image when first added and
//! keep them even if the catalog later changes.
//!
//! Every operation is total: an unknown product id is a no-op, never an error.
//! Mutating operations return whether the cart changed so callers know when a
//! new snapshot needs to be written.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Product};
use crate::types::{Price, ProductId};

/// One product-and-quantity entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub quantity: u32,
}

impl CartLine {
    fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.default_image().to_string(),
            quantity: 1,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Line shape accepted when reading a stored snapshot.
///
/// Quantity is signed so hand-edited or stale snapshots with zero or negative
/// quantities still parse; such lines are dropped on load.
#[derive(Deserialize)]
struct StoredLine {
    id: ProductId,
    name: String,
    price: Price,
    #[serde(default)]
    image: Option<String>,
    quantity: i64,
}

/// An ordered list of cart lines, unique by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `id`, if present.
    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of `product`, appending a new line if needed.
    pub fn add(&mut self, product: &Product) {
        match self.lines.iter_mut().find(|line| line.id == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine::from_product(product)),
        }
    }

    /// Look up `id` in `catalog` and add one unit of it.
    ///
    /// Returns the product added, or `None` (and leaves the cart untouched)
    /// when the catalog has no such product.
    pub fn add_item<'c>(&mut self, catalog: &'c Catalog, id: ProductId) -> Option<&'c Product> {
        let product = catalog.get(id)?;
        self.add(product);
        Some(product)
    }

    /// Adjust the quantity of `id` by `delta`, removing the line at zero or below.
    ///
    /// Returns `false` when there is no line for `id`.
    pub fn change_quantity(&mut self, id: ProductId, delta: i32) -> bool {
        let Some(index) = self.lines.iter().position(|line| line.id == id) else {
            return false;
        };
        let remaining = self
            .lines
            .get(index)
            .map_or(0, |line| i64::from(line.quantity) + i64::from(delta));
        if remaining <= 0 {
            self.lines.remove(index);
        } else if let Some(line) = self.lines.get_mut(index) {
            line.quantity = u32::try_from(remaining).unwrap_or(u32::MAX);
        }
        true
    }

    /// Remove the line for `id`. Returns `false` when it was already absent.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.id != id);
        self.lines.len() != before
    }

    /// Empty the cart. Returns `false` when it was already empty.
    pub fn clear(&mut self) -> bool {
        let changed = !self.lines.is_empty();
        self.lines.clear();
        changed
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Serialize to the storage format: a JSON array of
    /// `{id, name, price, image, quantity}` objects.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if serialization fails.
    pub fn to_snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.lines)
    }

    /// Parse a stored snapshot.
    ///
    /// Lines with a quantity of zero or less are dropped and repeated product
    /// ids are merged into the first occurrence, so the result always satisfies
    /// the cart invariants.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if `snapshot` is not a valid cart array.
    pub fn from_snapshot(snapshot: &str) -> Result<Self, serde_json::Error> {
        let stored: Vec<StoredLine> = serde_json::from_str(snapshot)?;
        let mut cart = Self::new();
        for line in stored {
            let Ok(quantity) = u32::try_from(line.quantity) else {
                continue;
            };
            if quantity == 0 {
                continue;
            }
            match cart.lines.iter_mut().find(|existing| existing.id == line.id) {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
                None => cart.lines.push(CartLine {
                    id: line.id,
                    name: line.name,
                    price: line.price,
                    image: line.image.unwrap_or_default(),
                    quantity,
                }),
            }
        }
        Ok(cart)
    }
}

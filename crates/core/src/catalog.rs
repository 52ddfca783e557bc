//! The product catalog.
//!
//! A [`Catalog`] is fixed at startup and read-only afterwards. Construction
//! validates the catalog invariants so the rest of the system can rely on them:
//!
//! - product IDs are positive and unique
//! - every product has at least one image (the first is the default)
//! - prices are non-negative (enforced by [`Price`])

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Price, ProductId};

/// Errors building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("product id must be positive (got {0})")]
    NonPositiveId(ProductId),
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
    #[error("product {0} has no images")]
    NoImages(ProductId),
}

/// A purchasable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub images: Vec<String>,
}

impl Product {
    /// The default display image.
    #[must_use]
    pub fn default_image(&self) -> &str {
        self.images.first().map_or("", String::as_str)
    }

    /// Whether the product should show a thumbnail strip.
    #[must_use]
    pub fn has_gallery(&self) -> bool {
        self.images.len() > 1
    }
}

/// Category selector for the product grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// The selector value meaning "no filter".
    pub const ALL: &'static str = "all";

    /// Parse a selector value. `"all"` (any case) and blank mean [`CategoryFilter::All`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(Self::ALL) {
            Self::All
        } else {
            Self::Category(value.to_string())
        }
    }

    /// The selector value to echo back into a form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => Self::ALL,
            Self::Category(category) => category,
        }
    }

    /// Whether `product` passes this filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => product.category == *category,
        }
    }
}

/// The fixed list of products available for sale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, validating its invariants.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if an id is non-positive or repeated, or a
    /// product has no images.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if product.id.as_i32() <= 0 {
                return Err(CatalogError::NonPositiveId(product.id));
            }
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            if product.images.is_empty() {
                return Err(CatalogError::NoImages(product.id));
            }
        }
        Ok(Self { products })
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON, or any validation
    /// error from [`Catalog::new`].
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// The first `count` products, shown on the home page.
    #[must_use]
    pub fn featured(&self, count: usize) -> &[Product] {
        let end = count.min(self.products.len());
        self.products.get(..end).unwrap_or_default()
    }

    /// Products passing `filter`, in catalog order.
    pub fn filter<'a>(&'a self, filter: &'a CategoryFilter) -> impl Iterator<Item = &'a Product> {
        self.products.iter().filter(move |p| filter.matches(p))
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

//! The product catalog.
//!
//! A fixed, insertion-ordered list of products loaded once at startup. The
//! catalog answers category filters and free-text searches and remembers the
//! last category filter so a re-render without arguments can reuse it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use lustre_core::{Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Built-in seed catalog.
const SEED_JSON: &str = include_str!("../data/catalog.json");

/// Sentinel category that disables filtering.
pub const ALL_CATEGORIES: &str = "all";

/// Glyph shown when a product has neither an image nor its own icon.
pub const DEFAULT_GLYPH: &str = "💎";

/// Errors that can occur while loading a catalog seed.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The seed file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The seed is not a JSON array of products.
    #[error("Invalid catalog seed: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two seed entries share an identifier.
    #[error("Duplicate product id {0} in catalog seed")]
    DuplicateId(ProductId),
}

/// A sellable product.
///
/// Seed entries may omit the name, category or description; such products
/// still render and simply never match a search on the missing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Product {
    /// Name for display, empty when the seed omitted it.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Description for display, empty when the seed omitted it.
    #[must_use]
    pub fn display_description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Icon glyph, falling back to [`DEFAULT_GLYPH`].
    #[must_use]
    pub fn glyph(&self) -> &str {
        self.icon.as_deref().unwrap_or(DEFAULT_GLYPH)
    }

    /// Unit price in the store currency.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::usd(self.price)
    }

    /// Case-insensitive substring match against name, description and
    /// category. `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        [&self.name, &self.description, &self.category]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Category selection for the product grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// No filtering.
    #[default]
    All,
    /// Exact, case-sensitive category match.
    Named(String),
}

impl CategoryFilter {
    /// Parse a category control value; `"all"` is the only sentinel.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Named(value.to_owned())
        }
    }

    /// Control value for this filter.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Named(category) => category,
        }
    }

    fn admits(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Named(category) => product.category.as_deref() == Some(category.as_str()),
        }
    }
}

/// The immutable product list plus the current category filter.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    current_filter: CategoryFilter,
}

impl Catalog {
    /// Build a catalog from a product list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two products share an id.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        if let Some(dup) = products.iter().find(|p| !seen.insert(p.id)) {
            return Err(CatalogError::DuplicateId(dup.id));
        }
        Ok(Self {
            products,
            current_filter: CategoryFilter::All,
        })
    }

    /// The built-in jewelry seed.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` only if the embedded seed is corrupt.
    pub fn seeded() -> Result<Self, CatalogError> {
        Self::from_json(SEED_JSON)
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the JSON is invalid or ids repeat.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Load a catalog seed from a file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file is unreadable or invalid.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The seed at `path`, or the built-in seed when there is none.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the seed is unreadable or invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        path.map_or_else(Self::seeded, Self::from_path)
    }

    /// Every product, in seed order.
    #[must_use]
    pub fn list_all(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get_by_id(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Filter by category and remember the filter for later re-renders.
    pub fn filter_by_category(&mut self, category: &str) -> Vec<&Product> {
        self.current_filter = CategoryFilter::parse(category);
        self.filtered()
    }

    /// Products admitted by the current filter.
    #[must_use]
    pub fn filtered(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| self.current_filter.admits(p))
            .collect()
    }

    /// Case-insensitive substring search over name, description and category.
    ///
    /// The term is used as given; callers decide what a blank term means.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&Product> {
        let needle = term.to_lowercase();
        self.products.iter().filter(|p| p.matches(&needle)).collect()
    }

    /// The last category filter applied.
    #[must_use]
    pub const fn current_filter(&self) -> &CategoryFilter {
        &self.current_filter
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .filter_map(|p| p.category.as_deref())
            .filter(|c| seen.insert(*c))
            .collect()
    }
}

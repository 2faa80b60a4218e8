//! Catalog products owned by a tenant.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::identity::IdentityId;

/// Category applied when a manually created product has none.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Validation errors raised when building product drafts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductValidationError {
    /// Name was blank.
    #[error("product name must not be empty")]
    EmptyName,
    /// Price was negative, NaN or infinite.
    #[error("price must be a finite, non-negative number")]
    InvalidPrice,
}

/// Numeric product identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated product fields, used for inserts and full updates.
///
/// ## Invariants
/// - `name` is trimmed and non-empty.
/// - `price` is finite and non-negative.
/// - `category` is never blank.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    name: String,
    description: String,
    sku: String,
    price: f64,
    category: String,
}

impl ProductDraft {
    /// Validate raw product fields.
    ///
    /// # Examples
    /// ```
    /// use moderaflow::domain::ProductDraft;
    ///
    /// let draft = ProductDraft::try_new("Mug", "", "MUG-1", 9.5, "").unwrap();
    /// assert_eq!(draft.category(), "Uncategorized");
    /// ```
    pub fn try_new(
        name: &str,
        description: &str,
        sku: &str,
        price: f64,
        category: &str,
    ) -> Result<Self, ProductValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProductValidationError::EmptyName);
        }
        if !price.is_finite() || price < 0.0 {
            return Err(ProductValidationError::InvalidPrice);
        }
        let category = match category.trim() {
            "" => DEFAULT_CATEGORY,
            other => other,
        };
        Ok(Self {
            name: name.to_owned(),
            description: description.trim().to_owned(),
            sku: sku.trim().to_owned(),
            price,
            category: category.to_owned(),
        })
    }

    /// Product name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-form description, possibly empty.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Stock keeping unit, possibly empty.
    pub fn sku(&self) -> &str {
        &self.sku
    }

    /// Unit price.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Category label.
    pub fn category(&self) -> &str {
        &self.category
    }
}

/// Stored catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Store-assigned identifier.
    pub id: ProductId,
    /// Owning tenant.
    pub owner_id: IdentityId,
    /// Validated product fields.
    pub draft: ProductDraft,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether `needle` matches the name or SKU, ignoring case.
    pub fn matches(&self, needle: &pagination::SearchFilter) -> bool {
        needle.matches(self.draft.name()) || needle.matches(self.draft.sku())
    }
}

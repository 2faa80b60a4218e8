//! Port abstraction for catalog persistence.
use async_trait::async_trait;
use pagination::Page;

use crate::domain::{IdentityId, Product, ProductDraft, ProductId};

use super::{ListQuery, define_port_error};

define_port_error! {
    /// Errors raised by product repository adapters.
    pub enum ProductRepositoryError {
        /// The store refused the caller's credentials or row policy.
        AccessDenied { message: String } => "product store denied access: {message}",
        /// A row did not match the expected shape.
        SchemaMismatch { message: String } => "product row has an unexpected shape: {message}",
        /// No product with this id belongs to the owner.
        NotFound { id: i64 } => "product {id} not found",
        /// The store was temporarily unreachable.
        Transient { message: String } => "product store unavailable: {message}",
        /// Any other query failure.
        Query { message: String } => "product store query failed: {message}",
    }
}

/// Owner-scoped catalog storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// List the owner's products newest first, filtered on name or SKU.
    async fn list(
        &self,
        owner: &IdentityId,
        query: &ListQuery,
    ) -> Result<Page<Product>, ProductRepositoryError>;

    /// Insert one product.
    async fn insert(
        &self,
        owner: &IdentityId,
        draft: &ProductDraft,
    ) -> Result<Product, ProductRepositoryError>;

    /// Insert many products in one batch; returns the number stored.
    async fn insert_batch(
        &self,
        owner: &IdentityId,
        drafts: &[ProductDraft],
    ) -> Result<usize, ProductRepositoryError>;

    /// Replace the fields of one of the owner's products.
    async fn update(
        &self,
        owner: &IdentityId,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, ProductRepositoryError>;

    /// Delete one of the owner's products.
    async fn delete(&self, owner: &IdentityId, id: ProductId)
    -> Result<(), ProductRepositoryError>;
}

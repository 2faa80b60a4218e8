//! Port abstraction for tenant record persistence.
use async_trait::async_trait;
use pagination::Page;

use crate::domain::{IdentityId, TenantRecord, TenantUpdate};

use super::{ListQuery, define_port_error};

define_port_error! {
    /// Errors raised by tenant repository adapters.
    pub enum TenantRepositoryError {
        /// The store refused the caller's credentials or row policy.
        AccessDenied { message: String } => "tenant store denied access: {message}",
        /// A row did not match the expected shape.
        SchemaMismatch { message: String } => "tenant row has an unexpected shape: {message}",
        /// A record already exists for the identity.
        UniqueViolation { message: String } => "tenant record already exists: {message}",
        /// No record matched the identifier.
        NotFound { id: String } => "tenant {id} not found",
        /// The store was temporarily unreachable.
        Transient { message: String } => "tenant store unavailable: {message}",
        /// Any other query failure.
        Query { message: String } => "tenant store query failed: {message}",
    }
}

/// Durable tenant records keyed by identity id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Fetch the record for an identity, if one exists.
    async fn find_by_id(&self, id: &IdentityId)
    -> Result<Option<TenantRecord>, TenantRepositoryError>;

    /// Insert a new record; fails with `UniqueViolation` when one exists.
    async fn create(&self, record: &TenantRecord) -> Result<(), TenantRepositoryError>;

    /// Apply a partial update and return the stored record.
    async fn update(
        &self,
        id: &IdentityId,
        update: &TenantUpdate,
    ) -> Result<TenantRecord, TenantRepositoryError>;

    /// Remove a record.
    async fn delete(&self, id: &IdentityId) -> Result<(), TenantRepositoryError>;

    /// List records newest first, filtered on organization name.
    async fn list(&self, query: &ListQuery) -> Result<Page<TenantRecord>, TenantRepositoryError>;
}

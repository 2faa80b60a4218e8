//! Port abstraction for Facebook Page connections.
use async_trait::async_trait;

use crate::domain::{IdentityId, PageConnection};

use super::define_port_error;

define_port_error! {
    /// Errors raised by page connection adapters.
    pub enum PageConnectionRepositoryError {
        /// The store refused the caller's credentials or row policy.
        AccessDenied { message: String } => "page store denied access: {message}",
        /// A row did not match the expected shape.
        SchemaMismatch { message: String } => "page row has an unexpected shape: {message}",
        /// The store was temporarily unreachable.
        Transient { message: String } => "page store unavailable: {message}",
        /// Any other query failure.
        Query { message: String } => "page store query failed: {message}",
    }
}

/// At most one page connection per tenant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageConnectionRepository: Send + Sync {
    /// Fetch the tenant's connection, if any.
    async fn find(
        &self,
        owner: &IdentityId,
    ) -> Result<Option<PageConnection>, PageConnectionRepositoryError>;

    /// Store a connection, replacing any other page bound to the tenant.
    async fn upsert(&self, connection: &PageConnection)
    -> Result<(), PageConnectionRepositoryError>;

    /// Remove every connection for the tenant.
    async fn delete_all(&self, owner: &IdentityId) -> Result<(), PageConnectionRepositoryError>;
}

//! Port abstraction for per-tenant integration settings.
use async_trait::async_trait;

use crate::domain::{AppSettings, IdentityId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by settings repository adapters.
    pub enum AppSettingsRepositoryError {
        /// The store refused the caller's credentials or row policy.
        AccessDenied { message: String } => "settings store denied access: {message}",
        /// A row did not match the expected shape.
        SchemaMismatch { message: String } => "settings row has an unexpected shape: {message}",
        /// The store was temporarily unreachable.
        Transient { message: String } => "settings store unavailable: {message}",
        /// Any other query failure.
        Query { message: String } => "settings store query failed: {message}",
    }
}

/// One settings record per tenant, written with upsert semantics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppSettingsRepository: Send + Sync {
    /// Fetch the owner's settings, if saved.
    async fn find(&self, owner: &IdentityId)
    -> Result<Option<AppSettings>, AppSettingsRepositoryError>;

    /// Replace the owner's settings wholesale.
    async fn upsert(
        &self,
        owner: &IdentityId,
        settings: &AppSettings,
    ) -> Result<(), AppSettingsRepositoryError>;
}

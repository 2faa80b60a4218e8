//! Port for writing identity metadata held by the session service.
use async_trait::async_trait;

use crate::domain::{IdentityId, Role};

use super::define_port_error;

define_port_error! {
    /// Errors raised while writing identity metadata.
    pub enum IdentityMetadataError {
        /// The session service refused the write.
        AccessDenied { message: String } => "metadata write denied: {message}",
        /// The session service was temporarily unreachable.
        Transient { message: String } => "session service unavailable: {message}",
        /// Any other failure.
        Query { message: String } => "metadata write failed: {message}",
    }
}

/// Updates the advisory role claim on an identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityMetadataWriter: Send + Sync {
    /// Overwrite the metadata role for `identity_id`.
    async fn update_role(
        &self,
        identity_id: &IdentityId,
        role: Role,
    ) -> Result<(), IdentityMetadataError>;
}

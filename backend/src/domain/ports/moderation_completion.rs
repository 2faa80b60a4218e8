//! Port for the hosted language-model completion endpoint.
use async_trait::async_trait;

use crate::domain::{ModerationPreview, ModerationRequest};

use super::define_port_error;

define_port_error! {
    /// Errors raised by completion adapters.
    pub enum ModerationCompletionError {
        /// No API key is configured, or the provider rejected it.
        Credentials { message: String } => "completion credentials rejected: {message}",
        /// The provider is throttling requests.
        RateLimited { message: String } => "completion rate limited: {message}",
        /// The provider failed or answered with an unusable payload.
        Upstream { message: String } => "completion provider failed: {message}",
        /// The provider could not be reached in time.
        Transient { message: String } => "completion provider unavailable: {message}",
    }
}

/// Drafts a moderation reply for a customer message.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModerationCompletion: Send + Sync {
    /// Request a structured preview for `request`.
    async fn complete(
        &self,
        request: &ModerationRequest,
    ) -> Result<ModerationPreview, ModerationCompletionError>;
}

//! Moderation reply previews.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::ModerationCompletion;
use crate::domain::{Error, IdentityId, ModerationPreview, ModerationRequest};

/// Requests reply previews from the completion provider.
pub struct ModerationService<C: ?Sized> {
    completion: Arc<C>,
}

impl<C: ?Sized> Clone for ModerationService<C> {
    fn clone(&self) -> Self {
        Self {
            completion: Arc::clone(&self.completion),
        }
    }
}

impl<C: ?Sized> ModerationService<C> {
    /// Create the service.
    pub fn new(completion: Arc<C>) -> Self {
        Self { completion }
    }
}

impl<C: ?Sized> ModerationService<C>
where
    C: ModerationCompletion,
{
    /// Draft a reply for `request`.
    pub async fn preview(
        &self,
        requester: &IdentityId,
        request: &ModerationRequest,
    ) -> Result<ModerationPreview, Error> {
        let preview = self.completion.complete(request).await?;
        info!(
            identity_id = %requester,
            sentiment = %preview.sentiment,
            "moderation preview generated"
        );
        Ok(preview)
    }
}

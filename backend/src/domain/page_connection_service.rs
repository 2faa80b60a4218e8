//! Facebook Page connection management.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::ports::PageConnectionRepository;
use crate::domain::{Confirmed, Error, IdentityId, PageBinding, PageConnection};

/// Connects, inspects and disconnects the tenant's page.
pub struct PageConnectionService<R: ?Sized> {
    pages: Arc<R>,
}

impl<R: ?Sized> Clone for PageConnectionService<R> {
    fn clone(&self) -> Self {
        Self {
            pages: Arc::clone(&self.pages),
        }
    }
}

impl<R: ?Sized> PageConnectionService<R> {
    /// Create the service.
    pub fn new(pages: Arc<R>) -> Self {
        Self { pages }
    }
}

impl<R: ?Sized> PageConnectionService<R>
where
    R: PageConnectionRepository,
{
    /// Current connection, if any.
    pub async fn current(&self, owner: &IdentityId) -> Result<Option<PageConnection>, Error> {
        Ok(self.pages.find(owner).await?)
    }

    /// Bind a page, replacing any existing connection.
    pub async fn connect(
        &self,
        owner: &IdentityId,
        binding: PageBinding,
    ) -> Result<PageConnection, Error> {
        let connection = PageConnection {
            tenant_id: owner.clone(),
            binding,
            connected_at: Utc::now(),
        };
        self.pages.upsert(&connection).await?;
        info!(
            tenant_id = %owner,
            page_id = connection.binding.page_id(),
            "page connected"
        );
        Ok(connection)
    }

    /// Remove every connection for the tenant.
    pub async fn disconnect(&self, owner: &IdentityId, _confirmed: Confirmed) -> Result<(), Error> {
        self.pages.delete_all(owner).await?;
        info!(tenant_id = %owner, "page disconnected");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for page connections.
    use super::*;
    use crate::outbound::memory::InMemoryPageConnectionRepository;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn reconnecting_replaces_the_page() {
        let service =
            PageConnectionService::new(Arc::new(InMemoryPageConnectionRepository::default()));
        let owner = IdentityId::random();
        let first = PageBinding::try_from_parts("111", "Old Shop", "tok-1").expect("binding");
        let second = PageBinding::try_from_parts("222", "New Shop", "tok-2").expect("binding");

        service.connect(&owner, first).await.expect("connected");
        service.connect(&owner, second).await.expect("connected");

        let current = service.current(&owner).await.expect("lookup").expect("connected");
        assert_eq!(current.binding.page_id(), "222");
        assert_eq!(current.binding.page_name(), "New Shop");
    }

    #[rstest]
    #[tokio::test]
    async fn disconnect_clears_the_connection() {
        let service =
            PageConnectionService::new(Arc::new(InMemoryPageConnectionRepository::default()));
        let owner = IdentityId::random();
        let binding = PageBinding::try_from_parts("111", "Shop", "tok").expect("binding");
        service.connect(&owner, binding).await.expect("connected");

        service
            .disconnect(&owner, Confirmed::check(Some(true)).expect("confirmed"))
            .await
            .expect("disconnected");

        assert!(service.current(&owner).await.expect("lookup").is_none());
    }
}

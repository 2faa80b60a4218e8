//! In-memory page connection table.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{PageConnectionRepository, PageConnectionRepositoryError};
use crate::domain::{IdentityId, PageConnection};

/// One connection per tenant; an upsert replaces any previous page.
#[derive(Debug, Default)]
pub struct InMemoryPageConnectionRepository {
    rows: Mutex<HashMap<IdentityId, PageConnection>>,
}

fn poisoned<T>(_: T) -> PageConnectionRepositoryError {
    PageConnectionRepositoryError::query("page table lock poisoned")
}

#[async_trait]
impl PageConnectionRepository for InMemoryPageConnectionRepository {
    async fn find(
        &self,
        owner: &IdentityId,
    ) -> Result<Option<PageConnection>, PageConnectionRepositoryError> {
        Ok(self.rows.lock().map_err(poisoned)?.get(owner).cloned())
    }

    async fn upsert(
        &self,
        connection: &PageConnection,
    ) -> Result<(), PageConnectionRepositoryError> {
        self.rows
            .lock()
            .map_err(poisoned)?
            .insert(connection.tenant_id.clone(), connection.clone());
        Ok(())
    }

    async fn delete_all(&self, owner: &IdentityId) -> Result<(), PageConnectionRepositoryError> {
        self.rows.lock().map_err(poisoned)?.remove(owner);
        Ok(())
    }
}

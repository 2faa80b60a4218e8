//! In-memory app settings table.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{AppSettingsRepository, AppSettingsRepositoryError};
use crate::domain::{AppSettings, IdentityId};

/// Settings keyed by owner; writes replace the whole record.
#[derive(Debug, Default)]
pub struct InMemoryAppSettingsRepository {
    rows: Mutex<HashMap<IdentityId, AppSettings>>,
}

#[async_trait]
impl AppSettingsRepository for InMemoryAppSettingsRepository {
    async fn find(
        &self,
        owner: &IdentityId,
    ) -> Result<Option<AppSettings>, AppSettingsRepositoryError> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| AppSettingsRepositoryError::query("settings table lock poisoned"))?;
        Ok(rows.get(owner).cloned())
    }

    async fn upsert(
        &self,
        owner: &IdentityId,
        settings: &AppSettings,
    ) -> Result<(), AppSettingsRepositoryError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| AppSettingsRepositoryError::query("settings table lock poisoned"))?;
        rows.insert(owner.clone(), settings.clone());
        Ok(())
    }
}

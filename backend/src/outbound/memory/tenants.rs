//! In-memory tenant table.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use pagination::Page;

use super::paginate;
use crate::domain::ports::{ListQuery, TenantRepository, TenantRepositoryError};
use crate::domain::{IdentityId, TenantRecord, TenantUpdate};

/// Tenant records keyed by identity id.
#[derive(Debug, Default)]
pub struct InMemoryTenantRepository {
    records: Mutex<HashMap<IdentityId, TenantRecord>>,
}

impl InMemoryTenantRepository {
    /// Seed the table with existing records.
    pub fn with_records(records: impl IntoIterator<Item = TenantRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        Self {
            records: Mutex::new(records),
        }
    }

    /// Every record, newest first.
    pub fn snapshot(&self) -> Vec<TenantRecord> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        newest_first(records.values().cloned().collect())
    }

    fn table(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<IdentityId, TenantRecord>>, TenantRepositoryError>
    {
        self.records
            .lock()
            .map_err(|_| TenantRepositoryError::query("tenant table lock poisoned"))
    }
}

fn newest_first(mut rows: Vec<TenantRecord>) -> Vec<TenantRecord> {
    rows.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
    });
    rows
}

#[async_trait]
impl TenantRepository for InMemoryTenantRepository {
    async fn find_by_id(
        &self,
        id: &IdentityId,
    ) -> Result<Option<TenantRecord>, TenantRepositoryError> {
        Ok(self.table()?.get(id).cloned())
    }

    async fn create(&self, record: &TenantRecord) -> Result<(), TenantRepositoryError> {
        let mut table = self.table()?;
        if table.contains_key(&record.id) {
            return Err(TenantRepositoryError::unique_violation(format!(
                "duplicate key value violates unique constraint tenants_pkey ({})",
                record.id
            )));
        }
        table.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: &IdentityId,
        update: &TenantUpdate,
    ) -> Result<TenantRecord, TenantRepositoryError> {
        let mut table = self.table()?;
        let record = table
            .get_mut(id)
            .ok_or_else(|| TenantRepositoryError::not_found(id.to_string()))?;
        update.apply_to(record);
        Ok(record.clone())
    }

    async fn delete(&self, id: &IdentityId) -> Result<(), TenantRepositoryError> {
        self.table()?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| TenantRepositoryError::not_found(id.to_string()))
    }

    async fn list(&self, query: &ListQuery) -> Result<Page<TenantRecord>, TenantRepositoryError> {
        let rows: Vec<TenantRecord> = self
            .table()?
            .values()
            .filter(|record| {
                query
                    .filter
                    .as_ref()
                    .is_none_or(|filter| filter.matches(record.org_name.as_ref()))
            })
            .cloned()
            .collect();
        Ok(paginate(newest_first(rows), query.request))
    }
}

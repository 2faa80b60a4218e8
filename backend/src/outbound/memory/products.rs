//! In-memory product table.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use pagination::Page;

use super::paginate;
use crate::domain::ports::{ListQuery, ProductRepository, ProductRepositoryError};
use crate::domain::{IdentityId, Product, ProductDraft, ProductId};

#[derive(Debug, Default)]
struct ProductTable {
    last_id: i64,
    rows: Vec<Product>,
}

impl ProductTable {
    fn insert(&mut self, owner: &IdentityId, draft: &ProductDraft) -> Product {
        self.last_id += 1;
        let product = Product {
            id: ProductId::new(self.last_id),
            owner_id: owner.clone(),
            draft: draft.clone(),
            created_at: Utc::now(),
        };
        self.rows.push(product.clone());
        product
    }

    fn owned_mut(&mut self, owner: &IdentityId, id: ProductId) -> Option<&mut Product> {
        self.rows
            .iter_mut()
            .find(|product| product.id == id && &product.owner_id == owner)
    }
}

/// Products with store-assigned incrementing ids.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    table: Mutex<ProductTable>,
}

impl InMemoryProductRepository {
    fn table(&self) -> Result<MutexGuard<'_, ProductTable>, ProductRepositoryError> {
        self.table
            .lock()
            .map_err(|_| ProductRepositoryError::query("product table lock poisoned"))
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list(
        &self,
        owner: &IdentityId,
        query: &ListQuery,
    ) -> Result<Page<Product>, ProductRepositoryError> {
        let mut rows: Vec<Product> = self
            .table()?
            .rows
            .iter()
            .filter(|product| &product.owner_id == owner)
            .filter(|product| query.filter.as_ref().is_none_or(|f| product.matches(f)))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(paginate(rows, query.request))
    }

    async fn insert(
        &self,
        owner: &IdentityId,
        draft: &ProductDraft,
    ) -> Result<Product, ProductRepositoryError> {
        Ok(self.table()?.insert(owner, draft))
    }

    async fn insert_batch(
        &self,
        owner: &IdentityId,
        drafts: &[ProductDraft],
    ) -> Result<usize, ProductRepositoryError> {
        let mut table = self.table()?;
        for draft in drafts {
            table.insert(owner, draft);
        }
        Ok(drafts.len())
    }

    async fn update(
        &self,
        owner: &IdentityId,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, ProductRepositoryError> {
        let mut table = self.table()?;
        let product = table
            .owned_mut(owner, id)
            .ok_or_else(|| ProductRepositoryError::not_found(id.get()))?;
        product.draft = draft.clone();
        Ok(product.clone())
    }

    async fn delete(
        &self,
        owner: &IdentityId,
        id: ProductId,
    ) -> Result<(), ProductRepositoryError> {
        let mut table = self.table()?;
        let before = table.rows.len();
        table
            .rows
            .retain(|product| !(product.id == id && &product.owner_id == owner));
        if table.rows.len() == before {
            return Err(ProductRepositoryError::not_found(id.get()));
        }
        Ok(())
    }
}

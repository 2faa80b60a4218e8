//! Owner-scoped product catalog.
//!
//! Every operation carries the owner's identity id; products belonging to
//! another owner behave as missing.

use std::sync::Arc;

use pagination::{ListState, Page};
use tracing::info;

use crate::domain::catalog_import::parse_catalog_csv;
use crate::domain::listing::fetch_page;
use crate::domain::ports::ProductRepository;
use crate::domain::{Confirmed, Error, IdentityId, Product, ProductDraft, ProductId};

/// Catalog operations for the signed-in tenant.
pub struct CatalogService<P: ?Sized> {
    products: Arc<P>,
}

impl<P: ?Sized> Clone for CatalogService<P> {
    fn clone(&self) -> Self {
        Self {
            products: Arc::clone(&self.products),
        }
    }
}

impl<P: ?Sized> CatalogService<P> {
    /// Create the service.
    pub fn new(products: Arc<P>) -> Self {
        Self { products }
    }
}

impl<P: ?Sized> CatalogService<P>
where
    P: ProductRepository,
{
    /// Fetch the page `state` points at, filtered on name or SKU.
    pub async fn list(
        &self,
        owner: &IdentityId,
        state: &mut ListState,
    ) -> Result<Page<Product>, Error> {
        let products = &self.products;
        let page = fetch_page(state, |query| async move {
            products.list(owner, &query).await
        })
        .await?;
        Ok(page)
    }

    /// Add one product.
    pub async fn create(&self, owner: &IdentityId, draft: &ProductDraft) -> Result<Product, Error> {
        let product = self.products.insert(owner, draft).await?;
        info!(owner_id = %owner, product_id = %product.id, "product created");
        Ok(product)
    }

    /// Replace the fields of one product.
    pub async fn update(
        &self,
        owner: &IdentityId,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, Error> {
        let product = self.products.update(owner, id, draft).await?;
        Ok(product)
    }

    /// Delete one product.
    pub async fn delete(
        &self,
        owner: &IdentityId,
        id: ProductId,
        _confirmed: Confirmed,
    ) -> Result<(), Error> {
        self.products.delete(owner, id).await?;
        info!(owner_id = %owner, product_id = %id, "product deleted");
        Ok(())
    }

    /// Parse CSV text and insert every row in one batch.
    ///
    /// Returns the number of imported products. Parsing completes before
    /// the store is touched.
    pub async fn import_csv(&self, owner: &IdentityId, csv: &str) -> Result<usize, Error> {
        let drafts =
            parse_catalog_csv(csv).map_err(|err| Error::invalid_request(err.to_string()))?;
        let imported = self.products.insert_batch(owner, &drafts).await?;
        info!(owner_id = %owner, imported, "catalog imported");
        Ok(imported)
    }
}

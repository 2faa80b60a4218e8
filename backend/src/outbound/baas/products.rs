//! `products` table adapter. Every call is filtered by owner.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Page;
use reqwest::Method;

use super::client::{
    BaasClient, BaasFailure, FailureKind, PREFER_HEADER, quote_filter_value, send,
};
use super::dto::{ProductRowDto, ProductWriteDto};
use crate::domain::ports::{ListQuery, ProductRepository, ProductRepositoryError};
use crate::domain::{IdentityId, Product, ProductDraft, ProductId};

const TABLE: &str = "products";

impl From<BaasFailure> for ProductRepositoryError {
    fn from(failure: BaasFailure) -> Self {
        let BaasFailure { kind, message } = failure;
        match kind {
            FailureKind::AccessDenied | FailureKind::InvalidCredentials => {
                Self::access_denied(message)
            }
            FailureKind::SchemaMismatch => Self::schema_mismatch(message),
            FailureKind::Transient => Self::transient(message),
            FailureKind::UniqueViolation | FailureKind::Rejected | FailureKind::Query => {
                Self::query(message)
            }
        }
    }
}

fn decode_rows(rows: Vec<ProductRowDto>) -> Result<Vec<Product>, ProductRepositoryError> {
    rows.into_iter()
        .map(ProductRowDto::into_domain)
        .collect::<Result<_, _>>()
        .map_err(ProductRepositoryError::schema_mismatch)
}

fn single_row(
    rows: Vec<ProductRowDto>,
    id: ProductId,
) -> Result<Product, ProductRepositoryError> {
    decode_rows(rows)?
        .into_iter()
        .next()
        .ok_or_else(|| ProductRepositoryError::not_found(id.get()))
}

fn owned(owner: &IdentityId, id: ProductId) -> [(&'static str, String); 2] {
    [("id", format!("eq.{id}")), ("user_id", format!("eq.{owner}"))]
}

/// Product repository backed by the hosted `products` table.
pub struct BaasProductRepository {
    client: Arc<BaasClient>,
}

impl BaasProductRepository {
    /// Wrap a shared client.
    pub fn new(client: Arc<BaasClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProductRepository for BaasProductRepository {
    async fn list(
        &self,
        owner: &IdentityId,
        query: &ListQuery,
    ) -> Result<Page<Product>, ProductRepositoryError> {
        let mut params = vec![
            ("select", "*".to_owned()),
            ("user_id", format!("eq.{owner}")),
            ("order", "created_at.desc,id.desc".to_owned()),
            ("offset", query.request.offset().to_string()),
            ("limit", query.request.limit().to_string()),
        ];
        if let Some(filter) = &query.filter {
            let pattern = quote_filter_value(&format!("*{}*", filter.as_str()));
            params.push(("or", format!("(name.ilike.{pattern},sku.ilike.{pattern})")));
        }
        let request = self
            .client
            .table(Method::GET, TABLE)?
            .query(&params)
            .header(PREFER_HEADER, "count=exact");
        let response = send(request).await?;
        let total = response.exact_total()?;
        let rows: Vec<ProductRowDto> = response.json()?;
        Ok(Page::new(decode_rows(rows)?, total, query.request))
    }

    async fn insert(
        &self,
        owner: &IdentityId,
        draft: &ProductDraft,
    ) -> Result<Product, ProductRepositoryError> {
        let request = self
            .client
            .table(Method::POST, TABLE)?
            .header(PREFER_HEADER, "return=representation")
            .json(&ProductWriteDto::new(owner, draft));
        let rows: Vec<ProductRowDto> = send(request).await?.json()?;
        decode_rows(rows)?
            .into_iter()
            .next()
            .ok_or_else(|| ProductRepositoryError::schema_mismatch("insert returned no row"))
    }

    async fn insert_batch(
        &self,
        owner: &IdentityId,
        drafts: &[ProductDraft],
    ) -> Result<usize, ProductRepositoryError> {
        let rows: Vec<ProductWriteDto<'_>> = drafts
            .iter()
            .map(|draft| ProductWriteDto::new(owner, draft))
            .collect();
        let request = self
            .client
            .table(Method::POST, TABLE)?
            .header(PREFER_HEADER, "return=minimal")
            .json(&rows);
        send(request).await?;
        Ok(drafts.len())
    }

    async fn update(
        &self,
        owner: &IdentityId,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, ProductRepositoryError> {
        let request = self
            .client
            .table(Method::PATCH, TABLE)?
            .query(&owned(owner, id))
            .header(PREFER_HEADER, "return=representation")
            .json(&ProductWriteDto::new(owner, draft));
        single_row(send(request).await?.json()?, id)
    }

    async fn delete(
        &self,
        owner: &IdentityId,
        id: ProductId,
    ) -> Result<(), ProductRepositoryError> {
        let request = self
            .client
            .table(Method::DELETE, TABLE)?
            .query(&owned(owner, id))
            .header(PREFER_HEADER, "return=representation");
        single_row(send(request).await?.json()?, id).map(drop)
    }
}

//! `tenants` table adapter.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Page;
use reqwest::Method;

use super::client::{BaasClient, BaasFailure, FailureKind, PREFER_HEADER, send};
use super::dto::{NewTenantDto, TenantPatchDto, TenantRowDto};
use crate::domain::ports::{ListQuery, TenantRepository, TenantRepositoryError};
use crate::domain::{IdentityId, TenantRecord, TenantUpdate};

const TABLE: &str = "tenants";

impl From<BaasFailure> for TenantRepositoryError {
    fn from(failure: BaasFailure) -> Self {
        let BaasFailure { kind, message } = failure;
        match kind {
            FailureKind::AccessDenied | FailureKind::InvalidCredentials => {
                Self::access_denied(message)
            }
            FailureKind::UniqueViolation => Self::unique_violation(message),
            FailureKind::SchemaMismatch => Self::schema_mismatch(message),
            FailureKind::Transient => Self::transient(message),
            FailureKind::Rejected | FailureKind::Query => Self::query(message),
        }
    }
}

fn decode_rows(rows: Vec<TenantRowDto>) -> Result<Vec<TenantRecord>, TenantRepositoryError> {
    rows.into_iter()
        .map(TenantRowDto::into_domain)
        .collect::<Result<_, _>>()
        .map_err(TenantRepositoryError::schema_mismatch)
}

/// Tenant repository backed by the hosted `tenants` table.
pub struct BaasTenantRepository {
    client: Arc<BaasClient>,
}

impl BaasTenantRepository {
    /// Wrap a shared client.
    pub fn new(client: Arc<BaasClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TenantRepository for BaasTenantRepository {
    async fn find_by_id(
        &self,
        id: &IdentityId,
    ) -> Result<Option<TenantRecord>, TenantRepositoryError> {
        let request = self.client.table(Method::GET, TABLE)?.query(&[
            ("select", "*".to_owned()),
            ("id", format!("eq.{id}")),
        ]);
        let rows: Vec<TenantRowDto> = send(request).await?.json()?;
        Ok(decode_rows(rows)?.into_iter().next())
    }

    async fn create(&self, record: &TenantRecord) -> Result<(), TenantRepositoryError> {
        let request = self
            .client
            .table(Method::POST, TABLE)?
            .header(PREFER_HEADER, "return=minimal")
            .json(&NewTenantDto::from(record));
        send(request).await?;
        Ok(())
    }

    async fn update(
        &self,
        id: &IdentityId,
        update: &TenantUpdate,
    ) -> Result<TenantRecord, TenantRepositoryError> {
        let request = self
            .client
            .table(Method::PATCH, TABLE)?
            .query(&[("id", format!("eq.{id}"))])
            .header(PREFER_HEADER, "return=representation")
            .json(&TenantPatchDto::from(update));
        let rows: Vec<TenantRowDto> = send(request).await?.json()?;
        decode_rows(rows)?
            .into_iter()
            .next()
            .ok_or_else(|| TenantRepositoryError::not_found(id.to_string()))
    }

    async fn delete(&self, id: &IdentityId) -> Result<(), TenantRepositoryError> {
        let request = self
            .client
            .table(Method::DELETE, TABLE)?
            .query(&[("id", format!("eq.{id}")), ("select", "id".to_owned())])
            .header(PREFER_HEADER, "return=representation");
        let deleted: Vec<serde_json::Value> = send(request).await?.json()?;
        if deleted.is_empty() {
            return Err(TenantRepositoryError::not_found(id.to_string()));
        }
        Ok(())
    }

    async fn list(&self, query: &ListQuery) -> Result<Page<TenantRecord>, TenantRepositoryError> {
        let mut params = vec![
            ("select", "*".to_owned()),
            ("order", "created_at.desc,id.desc".to_owned()),
            ("offset", query.request.offset().to_string()),
            ("limit", query.request.limit().to_string()),
        ];
        if let Some(filter) = &query.filter {
            params.push(("org_name", format!("ilike.*{}*", filter.as_str())));
        }
        let request = self
            .client
            .table(Method::GET, TABLE)?
            .query(&params)
            .header(PREFER_HEADER, "count=exact");
        let response = send(request).await?;
        let total = response.exact_total()?;
        let rows: Vec<TenantRowDto> = response.json()?;
        Ok(Page::new(decode_rows(rows)?, total, query.request))
    }
}

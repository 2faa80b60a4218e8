//! `connected_pages` table adapter.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;

use super::client::{BaasClient, BaasFailure, FailureKind, PREFER_HEADER, send};
use super::dto::PageRowDto;
use crate::domain::ports::{PageConnectionRepository, PageConnectionRepositoryError};
use crate::domain::{IdentityId, PageConnection};

const TABLE: &str = "connected_pages";

impl From<BaasFailure> for PageConnectionRepositoryError {
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

/// Page connection repository backed by the hosted `connected_pages` table.
pub struct BaasPageConnectionRepository {
    client: Arc<BaasClient>,
}

impl BaasPageConnectionRepository {
    /// Wrap a shared client.
    pub fn new(client: Arc<BaasClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageConnectionRepository for BaasPageConnectionRepository {
    async fn find(
        &self,
        owner: &IdentityId,
    ) -> Result<Option<PageConnection>, PageConnectionRepositoryError> {
        let request = self.client.table(Method::GET, TABLE)?.query(&[
            ("select", "*".to_owned()),
            ("user_id", format!("eq.{owner}")),
            ("order", "created_at.desc".to_owned()),
            ("limit", "1".to_owned()),
        ]);
        let rows: Vec<PageRowDto> = send(request).await?.json()?;
        rows.into_iter()
            .next()
            .map(PageRowDto::into_domain)
            .transpose()
            .map_err(PageConnectionRepositoryError::schema_mismatch)
    }

    async fn upsert(
        &self,
        connection: &PageConnection,
    ) -> Result<(), PageConnectionRepositoryError> {
        let owner = &connection.tenant_id;
        let request = self
            .client
            .table(Method::POST, TABLE)?
            .query(&[("on_conflict", "user_id,page_id")])
            .header(PREFER_HEADER, "resolution=merge-duplicates,return=minimal")
            .json(&PageRowDto::from(connection));
        send(request).await?;

        // Only drop the previous page once the new one is stored.
        let clear = self.client.table(Method::DELETE, TABLE)?.query(&[
            ("user_id", format!("eq.{owner}")),
            ("page_id", format!("neq.{}", connection.binding.page_id())),
        ]);
        send(clear).await?;
        Ok(())
    }

    async fn delete_all(&self, owner: &IdentityId) -> Result<(), PageConnectionRepositoryError> {
        let request = self
            .client
            .table(Method::DELETE, TABLE)?
            .query(&[("user_id", format!("eq.{owner}"))]);
        send(request).await?;
        Ok(())
    }
}

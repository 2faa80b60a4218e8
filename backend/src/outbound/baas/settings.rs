//! `app_settings` table adapter.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;

use super::client::{BaasClient, BaasFailure, FailureKind, PREFER_HEADER, send};
use super::dto::AppSettingsRowDto;
use crate::domain::ports::{AppSettingsRepository, AppSettingsRepositoryError};
use crate::domain::{AppSettings, IdentityId};

const TABLE: &str = "app_settings";

impl From<BaasFailure> for AppSettingsRepositoryError {
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

/// Settings repository backed by the hosted `app_settings` table.
pub struct BaasAppSettingsRepository {
    client: Arc<BaasClient>,
}

impl BaasAppSettingsRepository {
    /// Wrap a shared client.
    pub fn new(client: Arc<BaasClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AppSettingsRepository for BaasAppSettingsRepository {
    async fn find(
        &self,
        owner: &IdentityId,
    ) -> Result<Option<AppSettings>, AppSettingsRepositoryError> {
        let request = self
            .client
            .table(Method::GET, TABLE)?
            .query(&[("select", "*".to_owned()), ("user_id", format!("eq.{owner}"))]);
        let rows: Vec<AppSettingsRowDto> = send(request).await?.json()?;
        rows.into_iter()
            .next()
            .map(AppSettingsRowDto::into_domain)
            .transpose()
            .map_err(AppSettingsRepositoryError::schema_mismatch)
    }

    async fn upsert(
        &self,
        owner: &IdentityId,
        settings: &AppSettings,
    ) -> Result<(), AppSettingsRepositoryError> {
        let request = self
            .client
            .table(Method::POST, TABLE)?
            .query(&[("on_conflict", "user_id")])
            .header(PREFER_HEADER, "resolution=merge-duplicates,return=minimal")
            .json(&AppSettingsRowDto::new(owner, settings, Utc::now()));
        send(request).await?;
        Ok(())
    }
}

//! Workspace settings: organization profile plus integration settings.

use std::sync::Arc;

use tracing::info;

use crate::domain::access::AdminGrant;
use crate::domain::ports::{AppSettingsRepository, TenantRepository};
use crate::domain::{AppSettings, Error, OrgName, TenantRecord, TenantUpdate};

/// Tenant record together with its integration settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// The admin's tenant record.
    pub tenant: TenantRecord,
    /// Saved settings, or empty defaults.
    pub settings: AppSettings,
}

/// Loads and saves the admin's workspace.
pub struct WorkspaceService<T: ?Sized, S: ?Sized> {
    tenants: Arc<T>,
    settings: Arc<S>,
}

impl<T: ?Sized, S: ?Sized> Clone for WorkspaceService<T, S> {
    fn clone(&self) -> Self {
        Self {
            tenants: Arc::clone(&self.tenants),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<T: ?Sized, S: ?Sized> WorkspaceService<T, S> {
    /// Create the service.
    pub fn new(tenants: Arc<T>, settings: Arc<S>) -> Self {
        Self { tenants, settings }
    }
}

impl<T: ?Sized, S: ?Sized> WorkspaceService<T, S>
where
    T: TenantRepository,
    S: AppSettingsRepository,
{
    /// Load the workspace of the admin holding `grant`.
    pub async fn load(&self, grant: &AdminGrant) -> Result<Workspace, Error> {
        let id = grant.admin_id();
        let tenant = self
            .tenants
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("tenant {id} not found")))?;
        let settings = self.settings.find(id).await?.unwrap_or_default();
        Ok(Workspace { tenant, settings })
    }

    /// Upsert the settings, then rename the organization.
    ///
    /// Settings are written first; a failed rename is still reported even
    /// though the settings were saved.
    pub async fn save(
        &self,
        grant: &AdminGrant,
        org_name: OrgName,
        settings: AppSettings,
    ) -> Result<Workspace, Error> {
        let id = grant.admin_id();
        self.settings.upsert(id, &settings).await?;
        let tenant = self
            .tenants
            .update(id, &TenantUpdate::org_name(org_name))
            .await?;
        info!(tenant_id = %id, "workspace settings saved");
        Ok(Workspace { tenant, settings })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for workspace settings.
    use super::*;
    use crate::domain::ports::{
        MockAppSettingsRepository, MockTenantRepository, TenantRepositoryError,
    };
    use crate::domain::{ErrorCode, IdentityId};
    use mockall::Sequence;
    use rstest::{fixture, rstest};

    #[fixture]
    fn grant() -> AdminGrant {
        AdminGrant::for_tests(IdentityId::random())
    }

    #[rstest]
    #[tokio::test]
    async fn load_defaults_missing_settings(grant: AdminGrant) {
        let mut tenants = MockTenantRepository::new();
        tenants.expect_find_by_id().times(1).return_once(|id| {
            let identity = crate::domain::Identity::new(
                id.clone(),
                crate::domain::Email::new("a@example.com").expect("email"),
                crate::domain::IdentityMetadata::default(),
            );
            Ok(Some(TenantRecord::self_healed(&identity, chrono::Utc::now())))
        });
        let mut settings = MockAppSettingsRepository::new();
        settings.expect_find().times(1).return_once(|_| Ok(None));
        let service = WorkspaceService::new(Arc::new(tenants), Arc::new(settings));

        let workspace = service.load(&grant).await.expect("workspace");

        assert_eq!(workspace.settings, AppSettings::default());
        assert_eq!(&workspace.tenant.id, grant.admin_id());
    }

    #[rstest]
    #[tokio::test]
    async fn save_upserts_settings_before_renaming(grant: AdminGrant) {
        let mut seq = Sequence::new();
        let mut settings = MockAppSettingsRepository::new();
        settings
            .expect_upsert()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_, _| Ok(()));
        let mut tenants = MockTenantRepository::new();
        tenants
            .expect_update()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|id, _| Err(TenantRepositoryError::not_found(id.to_string())));
        let service = WorkspaceService::new(Arc::new(tenants), Arc::new(settings));

        let err = service
            .save(
                &grant,
                OrgName::new("Acme").expect("name"),
                AppSettings::default(),
            )
            .await
            .expect_err("rename failure is reported");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}

//! Tenant administration for admins.

use std::sync::Arc;

use pagination::{ListState, Page};
use tracing::info;

use crate::domain::access::AdminGrant;
use crate::domain::listing::fetch_page;
use crate::domain::ports::TenantRepository;
use crate::domain::{Confirmed, Error, IdentityId, TenantRecord, TenantUpdate};

/// Lists, edits and deletes tenant records on behalf of an admin.
pub struct TenantAdminService<T: ?Sized> {
    tenants: Arc<T>,
}

impl<T: ?Sized> Clone for TenantAdminService<T> {
    fn clone(&self) -> Self {
        Self {
            tenants: Arc::clone(&self.tenants),
        }
    }
}

impl<T: ?Sized> TenantAdminService<T> {
    /// Create the service.
    pub fn new(tenants: Arc<T>) -> Self {
        Self { tenants }
    }
}

impl<T: ?Sized> TenantAdminService<T>
where
    T: TenantRepository,
{
    /// Fetch the page `state` points at, newest tenants first.
    pub async fn list(
        &self,
        _grant: &AdminGrant,
        state: &mut ListState,
    ) -> Result<Page<TenantRecord>, Error> {
        let tenants = &self.tenants;
        let page = fetch_page(state, |query| async move { tenants.list(&query).await }).await?;
        Ok(page)
    }

    /// Change the organization name, role or plan of any tenant.
    pub async fn update(
        &self,
        grant: &AdminGrant,
        id: &IdentityId,
        update: &TenantUpdate,
    ) -> Result<TenantRecord, Error> {
        if update.is_empty() {
            return Err(Error::invalid_request(
                "provide at least one of orgName, role or plan",
            ));
        }
        let record = self.tenants.update(id, update).await?;
        info!(
            admin_id = %grant.admin_id(),
            tenant_id = %id,
            role = %record.role,
            plan = %record.plan,
            "tenant updated"
        );
        Ok(record)
    }

    /// Delete a tenant record.
    pub async fn delete(
        &self,
        grant: &AdminGrant,
        id: &IdentityId,
        _confirmed: Confirmed,
    ) -> Result<(), Error> {
        self.tenants.delete(id).await?;
        info!(admin_id = %grant.admin_id(), tenant_id = %id, "tenant deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for tenant administration.
    use super::*;
    use crate::domain::ports::{MockTenantRepository, TenantRepositoryError};
    use crate::domain::{ErrorCode, OrgName, Plan, Role, TENANT_PAGE_SIZE};
    use rstest::{fixture, rstest};

    #[fixture]
    fn grant() -> AdminGrant {
        AdminGrant::for_tests(IdentityId::random())
    }

    #[rstest]
    #[tokio::test]
    async fn empty_update_is_rejected_before_any_call(grant: AdminGrant) {
        let mut tenants = MockTenantRepository::new();
        tenants.expect_update().never();
        let service = TenantAdminService::new(Arc::new(tenants));

        let err = service
            .update(&grant, &IdentityId::random(), &TenantUpdate::default())
            .await
            .expect_err("empty update");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_tenant_is_not_found(grant: AdminGrant) {
        let mut tenants = MockTenantRepository::new();
        tenants
            .expect_update()
            .times(1)
            .return_once(|id, _| Err(TenantRepositoryError::not_found(id.to_string())));
        let service = TenantAdminService::new(Arc::new(tenants));
        let update = TenantUpdate {
            role: Some(Role::Admin),
            ..TenantUpdate::default()
        };

        let err = service
            .update(&grant, &IdentityId::random(), &update)
            .await
            .expect_err("missing tenant");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn update_forwards_all_fields(grant: AdminGrant) {
        let update = TenantUpdate {
            org_name: Some(OrgName::new("Globex").expect("name")),
            role: Some(Role::Admin),
            plan: Some(Plan::Enterprise),
        };
        let expected = update.clone();
        let mut tenants = MockTenantRepository::new();
        tenants
            .expect_update()
            .withf(move |_, seen| *seen == expected)
            .times(1)
            .return_once(|id, update| {
                let identity = crate::domain::Identity::new(
                    id.clone(),
                    crate::domain::Email::new("t@example.com").expect("email"),
                    crate::domain::IdentityMetadata::default(),
                );
                let mut record = TenantRecord::self_healed(&identity, chrono::Utc::now());
                update.apply_to(&mut record);
                Ok(record)
            });
        let service = TenantAdminService::new(Arc::new(tenants));

        let record = service
            .update(&grant, &IdentityId::random(), &update)
            .await
            .expect("updated");

        assert_eq!(record.role, Role::Admin);
        assert_eq!(record.plan, Plan::Enterprise);
        assert_eq!(record.org_name.as_ref(), "Globex");
    }

    #[rstest]
    #[tokio::test]
    async fn list_records_total_on_state(grant: AdminGrant) {
        let mut tenants = MockTenantRepository::new();
        tenants
            .expect_list()
            .times(1)
            .return_once(|query| Ok(Page::new(Vec::new(), 0, query.request)));
        let service = TenantAdminService::new(Arc::new(tenants));
        let mut state = ListState::new(TENANT_PAGE_SIZE).expect("size");

        let page = service.list(&grant, &mut state).await.expect("page");

        assert_eq!(page.total(), 0);
        assert_eq!(state.total(), Some(0));
    }
}

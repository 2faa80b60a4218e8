//! Per-request authorization.
//!
//! Every request resolves the caller's effective role against the tenant
//! record. Admin-only operations additionally require that the admin role
//! is backed by the record, never by metadata alone.

use std::sync::Arc;

use tracing::warn;

use crate::domain::port_errors::ACCESS_DENIED_MESSAGE;
use crate::domain::ports::TenantRepository;
use crate::domain::role_resolution::{ResolvedRole, RoleCache, TenantRoleLookup, resolve_role};
use crate::domain::{Error, Identity, IdentityId, OrgName, TenantRecord};

/// Caller identity with its resolved role and tenant record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Access {
    /// Signed-in identity.
    pub identity: Identity,
    /// Effective role and its source.
    pub role: ResolvedRole,
    /// Tenant record, when the lookup succeeded and one exists.
    pub tenant: Option<TenantRecord>,
}

impl Access {
    /// Organization name to display: record, then metadata, then default.
    pub fn org_name(&self) -> OrgName {
        self.tenant.as_ref().map_or_else(
            || OrgName::from_metadata_or_default(self.identity.metadata.org_name()),
            |tenant| tenant.org_name.clone(),
        )
    }
}

/// Capability handed to admin-only services.
///
/// Only [`AccessService::require_admin`] constructs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminGrant {
    admin_id: IdentityId,
}

impl AdminGrant {
    /// Identity of the admin the grant was issued to.
    pub fn admin_id(&self) -> &IdentityId {
        &self.admin_id
    }

    #[cfg(test)]
    pub(crate) fn for_tests(admin_id: IdentityId) -> Self {
        Self { admin_id }
    }
}

/// Resolves effective roles from the tenant store and the role cache.
pub struct AccessService<T: ?Sized> {
    tenants: Arc<T>,
    cache: Arc<RoleCache>,
}

impl<T: ?Sized> Clone for AccessService<T> {
    fn clone(&self) -> Self {
        Self {
            tenants: Arc::clone(&self.tenants),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<T: ?Sized> AccessService<T> {
    /// Create the service.
    pub fn new(tenants: Arc<T>, cache: Arc<RoleCache>) -> Self {
        Self { tenants, cache }
    }
}

impl<T: ?Sized> AccessService<T>
where
    T: TenantRepository,
{
    /// Resolve the caller's effective role. Never fails.
    pub async fn resolve(&self, identity: &Identity) -> Access {
        let (lookup, tenant) = match self.tenants.find_by_id(&identity.id).await {
            Ok(Some(record)) => {
                self.cache.remember(&identity.id, record.role);
                (TenantRoleLookup::Fetched(record.role), Some(record))
            }
            Ok(None) => {
                self.cache.forget(&identity.id);
                (TenantRoleLookup::Pending, None)
            }
            Err(err) => {
                warn!(identity_id = %identity.id, error = %err, "tenant role lookup failed");
                (TenantRoleLookup::Failed, None)
            }
        };
        let role = resolve_role(
            identity.metadata.role_claim(),
            lookup,
            self.cache.get(&identity.id),
        );
        Access {
            identity: identity.clone(),
            role,
            tenant,
        }
    }

    /// Resolve the caller and require a tenant-backed admin role.
    pub async fn require_admin(&self, identity: &Identity) -> Result<(Access, AdminGrant), Error> {
        let access = self.resolve(identity).await;
        if !access.role.permits_admin_mutation() {
            warn!(
                identity_id = %identity.id,
                role = %access.role.role,
                source = ?access.role.source,
                "admin action refused"
            );
            return Err(Error::forbidden(ACCESS_DENIED_MESSAGE));
        }
        let grant = AdminGrant {
            admin_id: identity.id.clone(),
        };
        Ok((access, grant))
    }
}

//! Effective role derivation.
//!
//! The durable tenant record is the source of truth. Metadata only fills in
//! while the record is unavailable, and a metadata `admin` over a fetched
//! tenant `user` always resolves to `user`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::domain::identity::IdentityId;
use crate::domain::tenant::Role;

/// State of the tenant role lookup for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantRoleLookup {
    /// The tenant record was read successfully.
    Fetched(Role),
    /// No record exists yet; reconciliation has not caught up.
    Pending,
    /// The lookup failed.
    Failed,
}

/// Which input decided the effective role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RoleSource {
    /// Freshly fetched tenant record.
    TenantRecord,
    /// Last tenant role fetched for the same identity.
    CachedTenantRecord,
    /// Advisory identity metadata.
    Metadata,
    /// No source was available.
    Default,
}

/// Effective role plus the source that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRole {
    /// Effective role.
    pub role: Role,
    /// Winning source.
    pub source: RoleSource,
}

impl ResolvedRole {
    /// Whether the role came from the tenant record, fresh or cached.
    pub fn is_tenant_backed(self) -> bool {
        matches!(
            self.source,
            RoleSource::TenantRecord | RoleSource::CachedTenantRecord
        )
    }

    /// Whether the caller may perform admin-only mutations.
    ///
    /// An admin claim that only metadata supports never qualifies.
    pub fn permits_admin_mutation(self) -> bool {
        self.role.is_admin() && self.is_tenant_backed()
    }
}

/// Resolve the effective role.
///
/// Order: fetched tenant role, cached tenant role, parseable metadata role,
/// then [`Role::User`].
///
/// # Examples
/// ```
/// use moderaflow::domain::{resolve_role, Role, RoleSource, TenantRoleLookup};
///
/// let resolved = resolve_role(Some("admin"), TenantRoleLookup::Fetched(Role::User), None);
/// assert_eq!(resolved.role, Role::User);
/// assert_eq!(resolved.source, RoleSource::TenantRecord);
/// ```
pub fn resolve_role(
    metadata_role: Option<&str>,
    lookup: TenantRoleLookup,
    cached: Option<Role>,
) -> ResolvedRole {
    if let TenantRoleLookup::Fetched(role) = lookup {
        return ResolvedRole {
            role,
            source: RoleSource::TenantRecord,
        };
    }
    if let Some(role) = cached {
        return ResolvedRole {
            role,
            source: RoleSource::CachedTenantRecord,
        };
    }
    if let Some(role) = metadata_role.and_then(|raw| raw.parse::<Role>().ok()) {
        return ResolvedRole {
            role,
            source: RoleSource::Metadata,
        };
    }
    ResolvedRole {
        role: Role::User,
        source: RoleSource::Default,
    }
}

/// How long a cached role outlives its last refresh. Matches the session
/// cookie lifetime, so entries of expired sessions fall out on their own.
pub const ROLE_CACHE_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Last successfully fetched tenant role per identity.
///
/// Entries are written after every successful lookup, cleared on sign-out
/// or when the record is gone, and expire [`ROLE_CACHE_TTL`] after their
/// last write. Expired entries are pruned on every write.
#[derive(Debug)]
pub struct RoleCache {
    ttl: Duration,
    roles: Mutex<HashMap<IdentityId, (Role, Instant)>>,
}

impl Default for RoleCache {
    fn default() -> Self {
        Self::with_ttl(ROLE_CACHE_TTL)
    }
}

impl RoleCache {
    /// Create an empty cache with the default lifetime.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache whose entries live for `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            roles: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<IdentityId, (Role, Instant)>> {
        self.roles.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached role for `id`, if any and not expired.
    pub fn get(&self, id: &IdentityId) -> Option<Role> {
        self.lock()
            .get(id)
            .filter(|(_, written)| written.elapsed() < self.ttl)
            .map(|(role, _)| *role)
    }

    /// Remember the role just fetched for `id`.
    pub fn remember(&self, id: &IdentityId, role: Role) {
        let now = Instant::now();
        let mut roles = self.lock();
        roles.retain(|_, (_, written)| now.duration_since(*written) < self.ttl);
        roles.insert(id.clone(), (role, now));
    }

    /// Drop the cached role for `id`.
    pub fn forget(&self, id: &IdentityId) {
        self.lock().remove(id);
    }

    /// Number of stored entries, expired ones included until the next write.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

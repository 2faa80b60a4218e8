//! Tenant records: the authoritative per-organization profile.
//!
//! ## Invariants
//! - One tenant record per identity, keyed by the identity id.
//! - Records created by the self-healing path always carry [`Role::User`]
//!   and [`Plan::Free`]; only an existing admin can grant [`Role::Admin`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::identity::{Email, Identity, IdentityId};

/// Organization name used when identity metadata carries none.
pub const DEFAULT_ORG_NAME: &str = "My Organization";
/// Maximum organization name length in characters.
pub const ORG_NAME_MAX: usize = 120;

/// Validation errors raised by tenant value objects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TenantValidationError {
    /// Organization name was blank.
    #[error("organization name must not be empty")]
    EmptyOrgName,
    /// Organization name exceeded [`ORG_NAME_MAX`] characters.
    #[error("organization name must be at most {max} characters")]
    OrgNameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Role string was not `admin` or `user`.
    #[error("unknown role: {0}")]
    UnknownRole(String),
    /// Plan string was not `Free`, `Pro` or `Enterprise`.
    #[error("unknown plan: {0}")]
    UnknownPlan(String),
}

/// Authorization role of a tenant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can manage other tenants and workspace integrations.
    Admin,
    /// Non-privileged default.
    #[default]
    User,
}

impl Role {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Whether the role grants admin-only affordances.
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TenantValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(TenantValidationError::UnknownRole(raw.to_owned())),
        }
    }
}

/// Subscription plan of a tenant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Plan {
    /// Lowest tier; the default for self-created records.
    #[default]
    Free,
    /// Paid tier.
    Pro,
    /// Top tier.
    Enterprise,
}

impl Plan {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Pro => "Pro",
            Self::Enterprise => "Enterprise",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = TenantValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            "enterprise" => Ok(Self::Enterprise),
            _ => Err(TenantValidationError::UnknownPlan(raw.to_owned())),
        }
    }
}

/// Trimmed, non-empty organization name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrgName(String);

impl OrgName {
    /// Validate and construct an [`OrgName`].
    pub fn new(name: impl Into<String>) -> Result<Self, TenantValidationError> {
        Self::from_owned(name.into())
    }

    /// Organization name taken from metadata, or [`DEFAULT_ORG_NAME`].
    pub fn from_metadata_or_default(name: Option<&str>) -> Self {
        name.and_then(|raw| Self::new(raw).ok())
            .unwrap_or_else(|| Self(DEFAULT_ORG_NAME.to_owned()))
    }

    fn from_owned(name: String) -> Result<Self, TenantValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(TenantValidationError::EmptyOrgName);
        }
        if trimmed.chars().count() > ORG_NAME_MAX {
            return Err(TenantValidationError::OrgNameTooLong { max: ORG_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for OrgName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for OrgName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<OrgName> for String {
    fn from(value: OrgName) -> Self {
        value.0
    }
}

impl TryFrom<String> for OrgName {
    type Error = TenantValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Durable tenant profile; the system of record for role and plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantRecord {
    /// Identifier, equal to the owning identity's id.
    pub id: IdentityId,
    /// Organization display name.
    pub org_name: OrgName,
    /// Authoritative role.
    pub role: Role,
    /// Subscription plan.
    pub plan: Plan,
    /// Contact email.
    pub email: Email,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl TenantRecord {
    /// Synthesize the record for an orphaned identity.
    ///
    /// The role is always [`Role::User`], whatever the metadata claims.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use moderaflow::domain::{
    ///     Email, Identity, IdentityId, IdentityMetadata, Plan, Role, TenantRecord,
    /// };
    ///
    /// let identity = Identity::new(
    ///     IdentityId::random(),
    ///     Email::new("ada@example.com").expect("email"),
    ///     IdentityMetadata::new(Some("Acme".into()), Some("admin".into())),
    /// );
    /// let record = TenantRecord::self_healed(&identity, Utc::now());
    /// assert_eq!(record.role, Role::User);
    /// assert_eq!(record.plan, Plan::Free);
    /// assert_eq!(record.org_name.as_ref(), "Acme");
    /// ```
    pub fn self_healed(identity: &Identity, now: DateTime<Utc>) -> Self {
        Self {
            id: identity.id.clone(),
            org_name: OrgName::from_metadata_or_default(identity.metadata.org_name()),
            role: Role::User,
            plan: Plan::Free,
            email: identity.email.clone(),
            created_at: now,
        }
    }
}

/// Partial update applied to a tenant record. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantUpdate {
    /// New organization name.
    pub org_name: Option<OrgName>,
    /// New role; only admins may set it.
    pub role: Option<Role>,
    /// New plan; only admins may set it.
    pub plan: Option<Plan>,
}

impl TenantUpdate {
    /// Update touching only the organization name.
    pub fn org_name(org_name: OrgName) -> Self {
        Self {
            org_name: Some(org_name),
            ..Self::default()
        }
    }

    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.org_name.is_none() && self.role.is_none() && self.plan.is_none()
    }

    /// Apply the update to a record in place.
    pub fn apply_to(&self, record: &mut TenantRecord) {
        if let Some(org_name) = &self.org_name {
            record.org_name = org_name.clone();
        }
        if let Some(role) = self.role {
            record.role = role;
        }
        if let Some(plan) = self.plan {
            record.plan = plan;
        }
    }
}

//! Authenticated identities issued by the session service.
//!
//! An [`Identity`] carries client-writable metadata. The metadata role is
//! advisory: authorization always cross-checks the durable tenant record
//! (see [`crate::domain::role_resolution`]).

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors raised while building identity values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityValidationError {
    /// The identifier was empty.
    #[error("identity id must not be empty")]
    EmptyId,
    /// The identifier was not a UUID.
    #[error("identity id must be a valid UUID")]
    InvalidId,
    /// The email was blank.
    #[error("email must not be empty")]
    EmptyEmail,
    /// The email did not look like `local@domain`.
    #[error("email must contain a local part and a domain")]
    InvalidEmail,
}

/// Stable identity identifier stored as a UUID.
///
/// Tenant records share this identifier, so it is also the tenant id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdentityId(Uuid, String);

impl IdentityId {
    /// Validate and construct an [`IdentityId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`IdentityId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, IdentityValidationError> {
        if id.is_empty() {
            return Err(IdentityValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(IdentityValidationError::InvalidId);
        }
        let parsed = Uuid::parse_str(&id).map_err(|_| IdentityValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for IdentityId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<IdentityId> for String {
    fn from(value: IdentityId) -> Self {
        value.1
    }
}

impl TryFrom<String> for IdentityId {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Email address of an identity, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    pub fn new(email: impl Into<String>) -> Result<Self, IdentityValidationError> {
        Self::from_owned(email.into())
    }

    fn from_owned(email: String) -> Result<Self, IdentityValidationError> {
        let trimmed = email.trim();
        if trimmed.is_empty() {
            return Err(IdentityValidationError::EmptyEmail);
        }
        match trimmed.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(IdentityValidationError::InvalidEmail),
        }
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Client-writable metadata attached to an identity.
///
/// Both fields are kept exactly as the session service reported them. Use
/// [`IdentityMetadata::org_name`] and [`IdentityMetadata::role_claim`] to
/// read them with blank values treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    org_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
}

impl IdentityMetadata {
    /// Build metadata from raw values.
    pub fn new(org_name: Option<String>, role: Option<String>) -> Self {
        Self { org_name, role }
    }

    /// Organization name, trimmed, when present and non-blank.
    pub fn org_name(&self) -> Option<&str> {
        non_blank(self.org_name.as_deref())
    }

    /// Role claimed by the metadata, trimmed, when present and non-blank.
    ///
    /// This value is advisory and must not be used on its own for
    /// authorization.
    pub fn role_claim(&self) -> Option<&str> {
        non_blank(self.role.as_deref())
    }

    /// Copy of the metadata with the role claim replaced.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Authenticated principal issued by the session service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable identifier, shared with the tenant record.
    pub id: IdentityId,
    /// Email the identity signed up with.
    pub email: Email,
    /// Client-writable metadata.
    #[serde(default)]
    pub metadata: IdentityMetadata,
}

impl Identity {
    /// Assemble an identity from validated parts.
    pub fn new(id: IdentityId, email: Email, metadata: IdentityMetadata) -> Self {
        Self {
            id,
            email,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for identity value objects.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", IdentityValidationError::EmptyId)]
    #[case("not-a-uuid", IdentityValidationError::InvalidId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", IdentityValidationError::InvalidId)]
    fn identity_id_rejects_invalid_input(
        #[case] raw: &str,
        #[case] expected: IdentityValidationError,
    ) {
        assert_eq!(IdentityId::new(raw).expect_err("invalid id"), expected);
    }

    #[rstest]
    fn identity_id_round_trips_through_serde() {
        let id = IdentityId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        let json = serde_json::to_string(&id).expect("serialise id");
        let back: IdentityId = serde_json::from_str(&json).expect("deserialise id");
        assert_eq!(back, id);
    }

    #[rstest]
    #[case("", IdentityValidationError::EmptyEmail)]
    #[case("   ", IdentityValidationError::EmptyEmail)]
    #[case("nobody", IdentityValidationError::InvalidEmail)]
    #[case("@example.com", IdentityValidationError::InvalidEmail)]
    #[case("ada@", IdentityValidationError::InvalidEmail)]
    fn email_rejects_invalid_input(#[case] raw: &str, #[case] expected: IdentityValidationError) {
        assert_eq!(Email::new(raw).expect_err("invalid email"), expected);
    }

    #[rstest]
    fn email_is_trimmed() {
        let email = Email::new("  ada@example.com ").expect("valid email");
        assert_eq!(email.as_ref(), "ada@example.com");
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("  "), None)]
    #[case(Some(" admin "), Some("admin"))]
    fn role_claim_ignores_blank_values(#[case] raw: Option<&str>, #[case] expected: Option<&str>) {
        let metadata = IdentityMetadata::new(None, raw.map(str::to_owned));
        assert_eq!(metadata.role_claim(), expected);
    }

    #[rstest]
    fn metadata_deserialises_with_missing_fields() {
        let metadata: IdentityMetadata =
            serde_json::from_str(r#"{"org_name":"Acme"}"#).expect("metadata");
        assert_eq!(metadata.org_name(), Some("Acme"));
        assert!(metadata.role_claim().is_none());
    }
}

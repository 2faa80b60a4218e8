//! Authentication primitives: credentials, registrations and sessions.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::identity::{Email, Identity, IdentityValidationError};
use crate::domain::secret::Secret;
use crate::domain::tenant::{OrgName, Role, TenantValidationError};

/// Minimum password length accepted by the session service.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Domain error returned when authentication payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// Email was missing or malformed.
    Email(IdentityValidationError),
    /// Password was blank.
    EmptyPassword,
    /// Password was shorter than [`PASSWORD_MIN_LEN`].
    PasswordTooShort,
    /// Password and confirmation differ.
    PasswordMismatch,
    /// Organization name was blank or too long.
    OrgName(TenantValidationError),
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(err) => write!(f, "{err}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort => write!(
                f,
                "password must be at least {PASSWORD_MIN_LEN} characters"
            ),
            Self::PasswordMismatch => write!(f, "passwords do not match"),
            Self::OrgName(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for AuthValidationError {}

/// Validated sign-in credentials.
///
/// ## Invariants
/// - `email` is trimmed and well formed.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use moderaflow::domain::SignInCredentials;
///
/// let creds = SignInCredentials::try_from_parts("ada@example.com", "password").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl SignInCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = Email::new(email).map_err(AuthValidationError::Email)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the lookup.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated sign-up request.
///
/// The registration always claims [`Role::User`] in the identity metadata;
/// privileged roles are granted only through tenant administration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: Email,
    password: Zeroizing<String>,
    org_name: OrgName,
}

impl Registration {
    /// Construct a registration from raw inputs.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        org_name: &str,
    ) -> Result<Self, AuthValidationError> {
        let org_name = OrgName::new(org_name).map_err(AuthValidationError::OrgName)?;
        let email = Email::new(email).map_err(AuthValidationError::Email)?;
        validate_password(password)?;
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
            org_name,
        })
    }

    /// Email to register.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Chosen password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Organization name written into the identity metadata.
    pub fn org_name(&self) -> &OrgName {
        &self.org_name
    }

    /// Role written into the identity metadata.
    pub fn role(&self) -> Role {
        Role::User
    }
}

/// Validated password change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange(Zeroizing<String>);

impl PasswordChange {
    /// Validate a new password and its confirmation.
    ///
    /// # Examples
    /// ```
    /// use moderaflow::domain::{AuthValidationError, PasswordChange};
    ///
    /// assert!(PasswordChange::try_new("secret1", "secret1").is_ok());
    /// assert_eq!(
    ///     PasswordChange::try_new("secret1", "secret2"),
    ///     Err(AuthValidationError::PasswordMismatch)
    /// );
    /// ```
    pub fn try_new(password: &str, confirmation: &str) -> Result<Self, AuthValidationError> {
        if password != confirmation {
            return Err(AuthValidationError::PasswordMismatch);
        }
        validate_password(password)?;
        Ok(Self(Zeroizing::new(password.to_owned())))
    }

    /// New password value.
    pub fn password(&self) -> &str {
        self.0.as_str()
    }
}

fn validate_password(password: &str) -> Result<(), AuthValidationError> {
    if password.is_empty() {
        return Err(AuthValidationError::EmptyPassword);
    }
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(AuthValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Authenticated session returned by the session service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Principal the session belongs to.
    pub identity: Identity,
    /// Bearer token for calls made on the principal's behalf.
    pub access_token: Secret,
}

/// Result of a sign-up attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The service signed the new identity in immediately.
    SignedIn(AuthSession),
    /// The identity must confirm its email before signing in.
    ConfirmationRequired,
}

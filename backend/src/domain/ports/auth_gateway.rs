//! Port for the external session service.
use async_trait::async_trait;

use crate::domain::{AuthSession, PasswordChange, Registration, Secret, SignInCredentials, SignUpOutcome};

use super::define_port_error;

define_port_error! {
    /// Errors raised by session service adapters.
    pub enum AuthGatewayError {
        /// Credentials were wrong or the token has expired.
        InvalidCredentials { message: String } => "authentication failed: {message}",
        /// The email is already registered.
        UniqueViolation { message: String } => "identity already registered: {message}",
        /// The service rejected the payload.
        Rejected { message: String } => "request rejected: {message}",
        /// A response did not match the expected shape.
        SchemaMismatch { message: String } => "session payload has an unexpected shape: {message}",
        /// The service was temporarily unreachable.
        Transient { message: String } => "session service unavailable: {message}",
        /// Any other failure.
        Query { message: String } => "session service request failed: {message}",
    }
}

/// Sign-in, sign-up, sign-out and password updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for a session.
    async fn sign_in(&self, credentials: &SignInCredentials)
    -> Result<AuthSession, AuthGatewayError>;

    /// Register a new identity with `{org_name, role: user}` metadata.
    async fn sign_up(&self, registration: &Registration)
    -> Result<SignUpOutcome, AuthGatewayError>;

    /// Revoke the session behind `access_token`.
    async fn sign_out(&self, access_token: &Secret) -> Result<(), AuthGatewayError>;

    /// Change the password of the session's identity.
    async fn update_password(
        &self,
        access_token: &Secret,
        change: &PasswordChange,
    ) -> Result<(), AuthGatewayError>;
}

//! Auth API adapter: password sessions and admin metadata writes.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;

use super::client::{BaasClient, BaasFailure, FailureKind, send};
use super::dto::{
    AdminMetadataUpdateDto, AuthSessionDto, MetadataDto, PasswordGrantDto, PasswordUpdateDto,
    SignUpDto,
};
use crate::domain::ports::{
    AuthGateway, AuthGatewayError, IdentityMetadataError, IdentityMetadataWriter,
};
use crate::domain::{
    AuthSession, IdentityId, PasswordChange, Registration, Role, Secret, SignInCredentials,
    SignUpOutcome,
};

impl From<BaasFailure> for AuthGatewayError {
    fn from(failure: BaasFailure) -> Self {
        let BaasFailure { kind, message } = failure;
        match kind {
            FailureKind::AccessDenied | FailureKind::InvalidCredentials => {
                Self::invalid_credentials(message)
            }
            FailureKind::UniqueViolation => Self::unique_violation(message),
            FailureKind::Rejected => Self::rejected(message),
            FailureKind::SchemaMismatch => Self::schema_mismatch(message),
            FailureKind::Transient => Self::transient(message),
            FailureKind::Query => Self::query(message),
        }
    }
}

impl From<BaasFailure> for IdentityMetadataError {
    fn from(failure: BaasFailure) -> Self {
        let BaasFailure { kind, message } = failure;
        match kind {
            FailureKind::AccessDenied | FailureKind::InvalidCredentials => {
                Self::access_denied(message)
            }
            FailureKind::Transient => Self::transient(message),
            _ => Self::query(message),
        }
    }
}

fn into_session(dto: AuthSessionDto) -> Result<Option<AuthSession>, AuthGatewayError> {
    let (Some(token), Some(user)) = (dto.access_token, dto.user) else {
        return Ok(None);
    };
    let identity = user
        .into_domain()
        .map_err(AuthGatewayError::schema_mismatch)?;
    Ok(Some(AuthSession {
        identity,
        access_token: Secret::new(token),
    }))
}

/// Session gateway backed by the hosted auth API.
pub struct BaasAuthGateway {
    client: Arc<BaasClient>,
}

impl BaasAuthGateway {
    /// Wrap a shared client.
    pub fn new(client: Arc<BaasClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthGateway for BaasAuthGateway {
    async fn sign_in(
        &self,
        credentials: &SignInCredentials,
    ) -> Result<AuthSession, AuthGatewayError> {
        let request = self
            .client
            .auth(Method::POST, "token", None)?
            .query(&[("grant_type", "password")])
            .json(&PasswordGrantDto {
                email: credentials.email().as_ref(),
                password: credentials.password(),
            });
        let dto: AuthSessionDto = send(request).await?.json()?;
        into_session(dto)?
            .ok_or_else(|| AuthGatewayError::schema_mismatch("token grant returned no session"))
    }

    async fn sign_up(
        &self,
        registration: &Registration,
    ) -> Result<SignUpOutcome, AuthGatewayError> {
        let request = self
            .client
            .auth(Method::POST, "signup", None)?
            .json(&SignUpDto {
                email: registration.email().as_ref(),
                password: registration.password(),
                data: MetadataDto {
                    org_name: Some(registration.org_name().as_ref()),
                    role: registration.role().as_str(),
                },
            });
        let dto: AuthSessionDto = send(request).await?.json()?;
        Ok(into_session(dto)?.map_or(SignUpOutcome::ConfirmationRequired, SignUpOutcome::SignedIn))
    }

    async fn sign_out(&self, access_token: &Secret) -> Result<(), AuthGatewayError> {
        let request = self
            .client
            .auth(Method::POST, "logout", Some(access_token))?;
        send(request).await?;
        Ok(())
    }

    async fn update_password(
        &self,
        access_token: &Secret,
        change: &PasswordChange,
    ) -> Result<(), AuthGatewayError> {
        let request = self
            .client
            .auth(Method::PUT, "user", Some(access_token))?
            .json(&PasswordUpdateDto {
                password: change.password(),
            });
        send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl IdentityMetadataWriter for BaasAuthGateway {
    async fn update_role(
        &self,
        identity_id: &IdentityId,
        role: Role,
    ) -> Result<(), IdentityMetadataError> {
        let request = self
            .client
            .admin(Method::PUT, &format!("users/{identity_id}"))?
            .json(&AdminMetadataUpdateDto {
                user_metadata: MetadataDto {
                    org_name: None,
                    role: role.as_str(),
                },
            });
        send(request).await?;
        Ok(())
    }
}

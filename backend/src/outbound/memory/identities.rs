//! In-memory session service: credentials, tokens and identity metadata.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    AuthGateway, AuthGatewayError, IdentityMetadataError, IdentityMetadataWriter,
};
use crate::domain::{
    AuthSession, Identity, IdentityId, IdentityMetadata, PasswordChange, Registration, Role,
    Secret, SignInCredentials, SignUpOutcome,
};

#[derive(Debug)]
struct Account {
    identity: Identity,
    password: Secret,
}

#[derive(Debug, Default)]
struct Directory {
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, IdentityId>,
}

impl Directory {
    fn issue_session(&mut self, identity: Identity) -> AuthSession {
        let token = Uuid::new_v4().to_string();
        self.tokens.insert(token.clone(), identity.id.clone());
        AuthSession {
            identity,
            access_token: Secret::new(token),
        }
    }

    fn account_by_id_mut(&mut self, id: &IdentityId) -> Option<&mut Account> {
        self.accounts
            .values_mut()
            .find(|account| &account.identity.id == id)
    }
}

/// Identity provider that signs new registrations in immediately.
///
/// Emails are matched case-insensitively. Tokens are random UUIDs that stay
/// valid until sign-out.
#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    directory: Mutex<Directory>,
}

fn email_key(email: &str) -> String {
    email.to_ascii_lowercase()
}

impl InMemoryIdentityProvider {
    fn directory(&self) -> Result<MutexGuard<'_, Directory>, AuthGatewayError> {
        self.directory
            .lock()
            .map_err(|_| AuthGatewayError::query("identity directory lock poisoned"))
    }

    /// Register an identity directly, bypassing sign-up.
    ///
    /// Seeds accounts whose metadata the sign-up path would never write,
    /// such as an identity claiming `admin`.
    pub fn insert_identity(&self, identity: Identity, password: impl Into<String>) {
        let mut directory = self
            .directory
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        directory.accounts.insert(
            email_key(identity.email.as_ref()),
            Account {
                identity,
                password: Secret::new(password),
            },
        );
    }

    /// Current state of an identity, metadata included.
    pub fn identity(&self, id: &IdentityId) -> Option<Identity> {
        let directory = self
            .directory
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        directory
            .accounts
            .values()
            .find(|account| &account.identity.id == id)
            .map(|account| account.identity.clone())
    }
}

#[async_trait]
impl AuthGateway for InMemoryIdentityProvider {
    async fn sign_in(
        &self,
        credentials: &SignInCredentials,
    ) -> Result<AuthSession, AuthGatewayError> {
        let mut directory = self.directory()?;
        let identity = directory
            .accounts
            .get(&email_key(credentials.email().as_ref()))
            .filter(|account| account.password.expose() == credentials.password())
            .map(|account| account.identity.clone())
            .ok_or_else(|| AuthGatewayError::invalid_credentials("invalid login credentials"))?;
        Ok(directory.issue_session(identity))
    }

    async fn sign_up(
        &self,
        registration: &Registration,
    ) -> Result<SignUpOutcome, AuthGatewayError> {
        let mut directory = self.directory()?;
        let key = email_key(registration.email().as_ref());
        if directory.accounts.contains_key(&key) {
            return Err(AuthGatewayError::unique_violation("user already registered"));
        }
        let identity = Identity::new(
            IdentityId::random(),
            registration.email().clone(),
            IdentityMetadata::new(
                Some(registration.org_name().to_string()),
                Some(registration.role().to_string()),
            ),
        );
        directory.accounts.insert(
            key,
            Account {
                identity: identity.clone(),
                password: Secret::new(registration.password()),
            },
        );
        Ok(SignUpOutcome::SignedIn(directory.issue_session(identity)))
    }

    async fn sign_out(&self, access_token: &Secret) -> Result<(), AuthGatewayError> {
        self.directory()?.tokens.remove(access_token.expose());
        Ok(())
    }

    async fn update_password(
        &self,
        access_token: &Secret,
        change: &PasswordChange,
    ) -> Result<(), AuthGatewayError> {
        let mut directory = self.directory()?;
        let id = directory
            .tokens
            .get(access_token.expose())
            .cloned()
            .ok_or_else(|| AuthGatewayError::invalid_credentials("session expired"))?;
        let account = directory
            .account_by_id_mut(&id)
            .ok_or_else(|| AuthGatewayError::invalid_credentials("identity no longer exists"))?;
        account.password = Secret::new(change.password());
        Ok(())
    }
}

#[async_trait]
impl IdentityMetadataWriter for InMemoryIdentityProvider {
    async fn update_role(
        &self,
        identity_id: &IdentityId,
        role: Role,
    ) -> Result<(), IdentityMetadataError> {
        let mut directory = self
            .directory
            .lock()
            .map_err(|_| IdentityMetadataError::query("identity directory lock poisoned"))?;
        let account = directory.account_by_id_mut(identity_id).ok_or_else(|| {
            IdentityMetadataError::query(format!("unknown identity {identity_id}"))
        })?;
        let metadata = std::mem::take(&mut account.identity.metadata);
        account.identity.metadata = metadata.with_role(role.as_str());
        Ok(())
    }
}

//! Sign-in, sign-up and sign-out, publishing every change to the hub.
//!
//! This service is the hub's only publisher. Observer work such as tenant
//! reconciliation runs before the call returns but never fails it.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::AuthGateway;
use crate::domain::session_hub::{SessionChange, SessionEvent, SessionHub};
use crate::domain::{
    AuthSession, Error, Identity, PasswordChange, Registration, Secret, SignInCredentials,
    SignUpOutcome,
};

/// Session lifecycle service.
pub struct SessionService<A: ?Sized> {
    auth: Arc<A>,
    hub: Arc<SessionHub>,
}

impl<A: ?Sized> Clone for SessionService<A> {
    fn clone(&self) -> Self {
        Self {
            auth: Arc::clone(&self.auth),
            hub: Arc::clone(&self.hub),
        }
    }
}

impl<A: ?Sized> SessionService<A> {
    /// Create the service over a gateway and the shared hub.
    pub fn new(auth: Arc<A>, hub: Arc<SessionHub>) -> Self {
        Self { auth, hub }
    }

    async fn publish(&self, change: SessionChange, identity: &Identity) {
        self.hub
            .publish(&SessionEvent::new(change, identity.clone()))
            .await;
    }

    /// Tell observers an authenticated request saw an existing session.
    pub async fn refresh(&self, identity: &Identity) {
        self.publish(SessionChange::Refreshed, identity).await;
    }

    /// Force observers to re-run for the current identity.
    pub async fn reload(&self, identity: &Identity) {
        self.publish(SessionChange::Reloaded, identity).await;
    }
}

impl<A: ?Sized> SessionService<A>
where
    A: AuthGateway,
{
    /// Authenticate and announce the new session.
    pub async fn sign_in(&self, credentials: &SignInCredentials) -> Result<AuthSession, Error> {
        let session = self.auth.sign_in(credentials).await?;
        info!(identity_id = %session.identity.id, "identity signed in");
        self.publish(SessionChange::SignedIn, &session.identity).await;
        Ok(session)
    }

    /// Register a new identity; announces the session when one is issued.
    pub async fn sign_up(&self, registration: &Registration) -> Result<SignUpOutcome, Error> {
        let outcome = self.auth.sign_up(registration).await?;
        match &outcome {
            SignUpOutcome::SignedIn(session) => {
                info!(identity_id = %session.identity.id, "identity signed up");
                self.publish(SessionChange::SignedIn, &session.identity).await;
            }
            SignUpOutcome::ConfirmationRequired => {
                info!("sign-up awaiting email confirmation");
            }
        }
        Ok(outcome)
    }

    /// End the session locally, revoking it upstream on a best-effort basis.
    pub async fn sign_out(&self, identity: &Identity, access_token: &Secret) {
        if let Err(err) = self.auth.sign_out(access_token).await {
            warn!(identity_id = %identity.id, error = %err, "upstream sign-out failed");
        }
        self.publish(SessionChange::SignedOut, identity).await;
    }

    /// Change the caller's password.
    pub async fn change_password(
        &self,
        access_token: &Secret,
        change: &PasswordChange,
    ) -> Result<(), Error> {
        self.auth.update_password(access_token, change).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for session lifecycle publishing.
    use super::*;
    use crate::domain::ports::{AuthGatewayError, MockAuthGateway};
    use crate::domain::session_hub::SessionObserver;
    use crate::domain::{Email, ErrorCode, IdentityId, IdentityMetadata};
    use async_trait::async_trait;
    use rstest::{fixture, rstest};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Changes(Mutex<Vec<SessionChange>>);

    #[async_trait]
    impl SessionObserver for Changes {
        async fn on_change(&self, event: &SessionEvent) {
            self.0.lock().expect("lock").push(event.change());
        }
    }

    #[fixture]
    fn identity() -> Identity {
        Identity::new(
            IdentityId::random(),
            Email::new("ada@example.com").expect("email"),
            IdentityMetadata::default(),
        )
    }

    fn service_with(auth: MockAuthGateway) -> (SessionService<MockAuthGateway>, Arc<Changes>) {
        let changes = Arc::new(Changes::default());
        let hub = SessionHub::new().subscribe(changes.clone());
        (SessionService::new(Arc::new(auth), Arc::new(hub)), changes)
    }

    #[rstest]
    #[tokio::test]
    async fn sign_in_publishes_signed_in(identity: Identity) {
        let mut auth = MockAuthGateway::new();
        let session = AuthSession {
            identity: identity.clone(),
            access_token: Secret::new("tok"),
        };
        auth.expect_sign_in()
            .times(1)
            .return_once(move |_| Ok(session));
        let (service, changes) = service_with(auth);
        let creds = SignInCredentials::try_from_parts("ada@example.com", "pw").expect("creds");

        let session = service.sign_in(&creds).await.expect("signed in");

        assert_eq!(session.identity, identity);
        assert_eq!(*changes.0.lock().expect("lock"), vec![SessionChange::SignedIn]);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_sign_in_publishes_nothing() {
        let mut auth = MockAuthGateway::new();
        auth.expect_sign_in()
            .times(1)
            .return_once(|_| Err(AuthGatewayError::invalid_credentials("bad password")));
        let (service, changes) = service_with(auth);
        let creds = SignInCredentials::try_from_parts("ada@example.com", "pw").expect("creds");

        let err = service.sign_in(&creds).await.expect_err("rejected");

        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert!(changes.0.lock().expect("lock").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn unconfirmed_sign_up_publishes_nothing() {
        let mut auth = MockAuthGateway::new();
        auth.expect_sign_up()
            .times(1)
            .return_once(|_| Ok(SignUpOutcome::ConfirmationRequired));
        let (service, changes) = service_with(auth);
        let registration =
            Registration::try_from_parts("ada@example.com", "secret1", "Acme").expect("valid");

        let outcome = service.sign_up(&registration).await.expect("accepted");

        assert_eq!(outcome, SignUpOutcome::ConfirmationRequired);
        assert!(changes.0.lock().expect("lock").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn sign_out_publishes_even_when_upstream_fails(identity: Identity) {
        let mut auth = MockAuthGateway::new();
        auth.expect_sign_out()
            .times(1)
            .return_once(|_| Err(AuthGatewayError::transient("timeout")));
        let (service, changes) = service_with(auth);

        service.sign_out(&identity, &Secret::new("tok")).await;

        assert_eq!(
            *changes.0.lock().expect("lock"),
            vec![SessionChange::SignedOut]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn refresh_and_reload_publish(identity: Identity) {
        let (service, changes) = service_with(MockAuthGateway::new());

        service.refresh(&identity).await;
        service.reload(&identity).await;

        assert_eq!(
            *changes.0.lock().expect("lock"),
            vec![SessionChange::Refreshed, SessionChange::Reloaded]
        );
    }
}

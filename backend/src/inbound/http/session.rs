//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations: the signed-in identity, its bearer token and
//! the navigation state of each paginated list.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use pagination::ListState;
use tracing::warn;

use crate::domain::{AuthSession, Error, Identity, Secret};

pub(crate) const IDENTITY_KEY: &str = "identity";
pub(crate) const ACCESS_TOKEN_KEY: &str = "access_token";
const LIST_STATE_PREFIX: &str = "list:";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist a freshly issued session in the cookie.
    ///
    /// The session is cleared and renewed first so a previous identity's
    /// list state never leaks into the new one.
    pub fn persist_session(&self, session: &AuthSession) -> Result<(), Error> {
        self.0.clear();
        self.0.renew();
        self.0
            .insert(IDENTITY_KEY, &session.identity)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))?;
        self.0
            .insert(ACCESS_TOKEN_KEY, session.access_token.expose())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop everything stored in the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Fetch the signed-in identity, if present.
    ///
    /// A cookie that no longer deserialises is treated as signed out.
    pub fn identity(&self) -> Result<Option<Identity>, Error> {
        match self.0.get::<Identity>(IDENTITY_KEY) {
            Ok(identity) => Ok(identity),
            Err(error) => {
                warn!(%error, "unreadable identity in session cookie");
                Ok(None)
            }
        }
    }

    /// Require a signed-in identity or return `401 Unauthorized`.
    pub fn require_identity(&self) -> Result<Identity, Error> {
        self.identity()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Bearer token of the signed-in identity.
    pub fn access_token(&self) -> Result<Option<Secret>, Error> {
        let token = self
            .0
            .get::<String>(ACCESS_TOKEN_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(token.map(Secret::new))
    }

    /// Require the bearer token or return `401 Unauthorized`.
    pub fn require_access_token(&self) -> Result<Secret, Error> {
        self.access_token()?
            .filter(|token| !token.is_blank())
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Navigation state of the list named `key`.
    ///
    /// Starts a fresh state when none is stored or the stored page size no
    /// longer matches `size`.
    pub fn list_state(&self, key: &str, size: u32) -> Result<ListState, Error> {
        let stored = match self.0.get::<ListState>(&list_key(key)) {
            Ok(stored) => stored,
            Err(error) => {
                warn!(list = key, %error, "discarding unreadable list state");
                None
            }
        };
        match stored {
            Some(state) if state.request().size() == size => Ok(state),
            _ => ListState::new(size)
                .map_err(|error| Error::internal(format!("invalid list page size: {error}"))),
        }
    }

    /// Remember the navigation state of the list named `key`.
    pub fn store_list_state(&self, key: &str, state: &ListState) -> Result<(), Error> {
        self.0
            .insert(list_key(key), state)
            .map_err(|error| Error::internal(format!("failed to persist list state: {error}")))
    }
}

fn list_key(key: &str) -> String {
    format!("{LIST_STATE_PREFIX}{key}")
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

//! Session change notifications.
//!
//! The hub is built once during server construction. The session service
//! is its only publisher; observers receive read-only events in
//! registration order, one after another.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{IdentityMetadataWriter, TenantRepository};
use crate::domain::reconciler::{IdentityReconciler, ReconcileOutcome};
use crate::domain::role_resolution::RoleCache;
use crate::domain::Identity;

/// Kind of session transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    /// An identity signed in or signed up with an immediate session.
    SignedIn,
    /// The identity signed out.
    SignedOut,
    /// An authenticated request observed an existing session.
    Refreshed,
    /// The caller explicitly asked to reload session state.
    Reloaded,
}

/// Read-only notification delivered to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEvent {
    change: SessionChange,
    identity: Identity,
}

impl SessionEvent {
    /// Pair a change with the identity it concerns.
    ///
    /// For [`SessionChange::SignedOut`] the identity is the one leaving.
    pub fn new(change: SessionChange, identity: Identity) -> Self {
        Self { change, identity }
    }

    /// Kind of transition.
    pub fn change(&self) -> SessionChange {
        self.change
    }

    /// Identity the change concerns.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The identity that is signed in after this change, if any.
    pub fn current_identity(&self) -> Option<&Identity> {
        match self.change {
            SessionChange::SignedOut => None,
            _ => Some(&self.identity),
        }
    }
}

/// Subscriber notified of every session change.
#[async_trait]
pub trait SessionObserver: Send + Sync {
    /// Handle one event. Observers must not fail the session.
    async fn on_change(&self, event: &SessionEvent);
}

/// Ordered set of session observers.
#[derive(Default, Clone)]
pub struct SessionHub {
    observers: Vec<Arc<dyn SessionObserver>>,
}

impl SessionHub {
    /// Create a hub without observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observer; observers run in registration order.
    #[must_use]
    pub fn subscribe(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no observers are registered.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Deliver `event` to every observer, strictly one after another.
    pub async fn publish(&self, event: &SessionEvent) {
        debug!(
            identity_id = %event.identity().id,
            change = ?event.change(),
            observers = self.observers.len(),
            "publishing session change"
        );
        for observer in &self.observers {
            observer.on_change(event).await;
        }
    }
}

/// Drives the [`IdentityReconciler`] from session changes.
///
/// Every event runs a pass, so a tenant record deleted while its owner is
/// signed in is restored on the owner's next request. A healed identity
/// costs one lookup and no writes.
pub struct ReconcilingObserver<T: ?Sized, M: ?Sized> {
    reconciler: IdentityReconciler<T, M>,
}

impl<T: ?Sized, M: ?Sized> ReconcilingObserver<T, M> {
    /// Wrap a reconciler.
    pub fn new(reconciler: IdentityReconciler<T, M>) -> Self {
        Self { reconciler }
    }
}

impl<T: ?Sized, M: ?Sized> ReconcilingObserver<T, M>
where
    T: TenantRepository,
    M: IdentityMetadataWriter,
{
    /// Handle an event and report what the reconciler did.
    pub async fn handle(&self, event: &SessionEvent) -> ReconcileOutcome {
        let outcome = self.reconciler.reconcile(event.current_identity()).await;
        debug!(
            identity_id = %event.identity().id,
            change = ?event.change(),
            settled = outcome.is_settled(),
            "session change reconciled"
        );
        outcome
    }
}

#[async_trait]
impl<T: ?Sized, M: ?Sized> SessionObserver for ReconcilingObserver<T, M>
where
    T: TenantRepository,
    M: IdentityMetadataWriter,
{
    async fn on_change(&self, event: &SessionEvent) {
        self.handle(event).await;
    }
}

/// Clears cached tenant roles when an identity signs out.
pub struct RoleCacheObserver {
    cache: Arc<RoleCache>,
}

impl RoleCacheObserver {
    /// Observe sign-outs on behalf of `cache`.
    pub fn new(cache: Arc<RoleCache>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl SessionObserver for RoleCacheObserver {
    async fn on_change(&self, event: &SessionEvent) {
        if event.change() == SessionChange::SignedOut {
            self.cache.forget(&event.identity().id);
        }
    }
}

#[cfg(test)]
mod tests;

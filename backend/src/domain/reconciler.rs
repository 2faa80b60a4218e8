//! Self-healing of orphaned identities.
//!
//! An identity can exist in the session service without a tenant record,
//! for example when the sign-up trigger failed. The reconciler creates the
//! missing record with the non-privileged role and then re-syncs the
//! metadata role to match.
//!
//! ## Invariants
//! - Each pass issues at most one record insert and one metadata write.
//! - A repaired record never carries [`Role::Admin`].
//! - Failures never propagate; the outcome is returned and logged.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::ports::{IdentityMetadataWriter, TenantRepository};
use crate::domain::{Identity, Role, TenantRecord};

/// Result of one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// No identity was signed in.
    SignedOut,
    /// The tenant record already existed.
    AlreadyReconciled,
    /// A missing record was created.
    Repaired {
        /// Whether the metadata role write succeeded.
        metadata_synced: bool,
    },
    /// A concurrent pass created the record first.
    LostRace,
    /// The store failed; the next session event retries.
    Deferred,
}

impl ReconcileOutcome {
    /// Whether the identity needs no further passes.
    pub fn is_settled(self) -> bool {
        matches!(
            self,
            Self::AlreadyReconciled | Self::Repaired { .. } | Self::LostRace
        )
    }

    /// Stable label for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SignedOut => "signed_out",
            Self::AlreadyReconciled => "already_reconciled",
            Self::Repaired { .. } => "repaired",
            Self::LostRace => "lost_race",
            Self::Deferred => "deferred",
        }
    }
}

impl fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ensures every signed-in identity has a tenant record.
pub struct IdentityReconciler<T: ?Sized, M: ?Sized> {
    tenants: Arc<T>,
    metadata: Arc<M>,
}

impl<T: ?Sized, M: ?Sized> Clone for IdentityReconciler<T, M> {
    fn clone(&self) -> Self {
        Self {
            tenants: Arc::clone(&self.tenants),
            metadata: Arc::clone(&self.metadata),
        }
    }
}

impl<T: ?Sized, M: ?Sized> IdentityReconciler<T, M> {
    /// Create a reconciler over the given ports.
    pub fn new(tenants: Arc<T>, metadata: Arc<M>) -> Self {
        Self { tenants, metadata }
    }
}

impl<T: ?Sized, M: ?Sized> IdentityReconciler<T, M>
where
    T: TenantRepository,
    M: IdentityMetadataWriter,
{
    /// Run one pass for the current identity (`None` when signed out).
    pub async fn reconcile(&self, identity: Option<&Identity>) -> ReconcileOutcome {
        let Some(identity) = identity else {
            return ReconcileOutcome::SignedOut;
        };
        let outcome = self.reconcile_identity(identity).await;
        if outcome == ReconcileOutcome::AlreadyReconciled {
            debug!(identity_id = %identity.id, "tenant record present");
        } else {
            info!(identity_id = %identity.id, outcome = %outcome, "identity reconciled");
        }
        outcome
    }

    async fn reconcile_identity(&self, identity: &Identity) -> ReconcileOutcome {
        match self.tenants.find_by_id(&identity.id).await {
            Ok(Some(_)) => return ReconcileOutcome::AlreadyReconciled,
            Ok(None) => {}
            Err(err) => {
                warn!(identity_id = %identity.id, error = %err, "tenant lookup failed");
                return ReconcileOutcome::Deferred;
            }
        }

        let record = TenantRecord::self_healed(identity, Utc::now());
        match self.tenants.create(&record).await {
            Ok(()) => {}
            Err(err) if err.is_unique_violation() => return ReconcileOutcome::LostRace,
            Err(err) => {
                warn!(identity_id = %identity.id, error = %err, "tenant repair failed");
                return ReconcileOutcome::Deferred;
            }
        }

        let metadata_synced = match self.metadata.update_role(&identity.id, Role::User).await {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    identity_id = %identity.id,
                    error = %err,
                    "metadata role sync failed after tenant repair"
                );
                false
            }
        };
        ReconcileOutcome::Repaired { metadata_synced }
    }
}

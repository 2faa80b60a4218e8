//! Tests for session change delivery.

use std::sync::Mutex;

use rstest::{fixture, rstest};

use super::*;
use chrono::Utc;

use crate::domain::ports::{
    MockIdentityMetadataWriter, MockTenantRepository, TenantRepository, TenantRepositoryError,
};
use crate::domain::{
    AccessService, Email, ErrorCode, IdentityId, IdentityMetadata, OrgName, Plan, Role,
    TenantRecord,
};
use crate::outbound::memory::InMemoryTenantRepository;

#[fixture]
fn identity() -> Identity {
    Identity::new(
        IdentityId::random(),
        Email::new("owner@example.com").expect("email"),
        IdentityMetadata::new(Some("Acme".into()), Some("user".into())),
    )
}

struct Recorder {
    name: &'static str,
    log: Arc<Mutex<Vec<(&'static str, SessionChange)>>>,
}

#[async_trait]
impl SessionObserver for Recorder {
    async fn on_change(&self, event: &SessionEvent) {
        self.log
            .lock()
            .expect("log lock")
            .push((self.name, event.change()));
    }
}

#[rstest]
#[tokio::test]
async fn observers_run_in_registration_order(identity: Identity) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let hub = SessionHub::new()
        .subscribe(Arc::new(Recorder {
            name: "first",
            log: Arc::clone(&log),
        }))
        .subscribe(Arc::new(Recorder {
            name: "second",
            log: Arc::clone(&log),
        }));

    hub.publish(&SessionEvent::new(SessionChange::SignedIn, identity.clone()))
        .await;
    hub.publish(&SessionEvent::new(SessionChange::SignedOut, identity))
        .await;

    assert_eq!(hub.len(), 2);
    assert_eq!(
        *log.lock().expect("log lock"),
        vec![
            ("first", SessionChange::SignedIn),
            ("second", SessionChange::SignedIn),
            ("first", SessionChange::SignedOut),
            ("second", SessionChange::SignedOut),
        ]
    );
}

#[rstest]
fn signed_out_event_has_no_current_identity(identity: Identity) {
    let event = SessionEvent::new(SessionChange::SignedOut, identity.clone());
    assert!(event.current_identity().is_none());
    assert_eq!(event.identity(), &identity);
}

fn healthy_observer()
-> ReconcilingObserver<InMemoryTenantRepository, MockIdentityMetadataWriter> {
    let mut metadata = MockIdentityMetadataWriter::new();
    metadata.expect_update_role().returning(|_, _| Ok(()));
    ReconcilingObserver::new(IdentityReconciler::new(
        Arc::new(InMemoryTenantRepository::default()),
        Arc::new(metadata),
    ))
}

#[rstest]
#[tokio::test]
async fn every_session_change_runs_a_pass(identity: Identity) {
    let observer = healthy_observer();
    let signed_in = SessionEvent::new(SessionChange::SignedIn, identity.clone());
    let refreshed = SessionEvent::new(SessionChange::Refreshed, identity.clone());
    let reload = SessionEvent::new(SessionChange::Reloaded, identity.clone());
    let signed_out = SessionEvent::new(SessionChange::SignedOut, identity);

    assert_eq!(
        observer.handle(&signed_in).await,
        ReconcileOutcome::Repaired {
            metadata_synced: true
        }
    );
    assert_eq!(
        observer.handle(&refreshed).await,
        ReconcileOutcome::AlreadyReconciled
    );
    assert_eq!(
        observer.handle(&reload).await,
        ReconcileOutcome::AlreadyReconciled
    );
    assert_eq!(
        observer.handle(&signed_out).await,
        ReconcileOutcome::SignedOut
    );
}

#[rstest]
#[tokio::test]
async fn deleted_admin_record_loses_the_grant_on_next_request(identity: Identity) {
    let tenants = Arc::new(InMemoryTenantRepository::default());
    let mut metadata = MockIdentityMetadataWriter::new();
    metadata
        .expect_update_role()
        .withf(|_, role| *role == Role::User)
        .times(1)
        .returning(|_, _| Ok(()));
    let observer =
        ReconcilingObserver::new(IdentityReconciler::new(Arc::clone(&tenants), Arc::new(metadata)));
    let access = AccessService::new(Arc::clone(&tenants), Arc::new(RoleCache::new()));
    tenants
        .create(&TenantRecord {
            id: identity.id.clone(),
            org_name: OrgName::new("Acme").expect("org name"),
            role: Role::Admin,
            plan: Plan::Pro,
            email: identity.email.clone(),
            created_at: Utc::now(),
        })
        .await
        .expect("seed admin");

    observer
        .handle(&SessionEvent::new(SessionChange::SignedIn, identity.clone()))
        .await;
    assert!(access.require_admin(&identity).await.is_ok());

    tenants.delete(&identity.id).await.expect("delete record");
    let outcome = observer
        .handle(&SessionEvent::new(SessionChange::Refreshed, identity.clone()))
        .await;

    assert_eq!(
        outcome,
        ReconcileOutcome::Repaired {
            metadata_synced: true
        }
    );
    let healed = tenants
        .find_by_id(&identity.id)
        .await
        .expect("lookup")
        .expect("record restored");
    assert_eq!(healed.role, Role::User);
    let err = access
        .require_admin(&identity)
        .await
        .expect_err("restored record is not an admin");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn deferred_passes_retry_on_next_event(identity: Identity) {
    let mut tenants = MockTenantRepository::new();
    let mut seq = mockall::Sequence::new();
    tenants
        .expect_find_by_id()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_| Err(TenantRepositoryError::transient("down")));
    tenants
        .expect_find_by_id()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_| Ok(None));
    tenants.expect_create().times(1).return_once(|_| Ok(()));
    let mut metadata = MockIdentityMetadataWriter::new();
    metadata
        .expect_update_role()
        .times(1)
        .return_once(|_, _| Ok(()));
    let observer =
        ReconcilingObserver::new(IdentityReconciler::new(Arc::new(tenants), Arc::new(metadata)));

    let signed_in = SessionEvent::new(SessionChange::SignedIn, identity.clone());
    let refreshed = SessionEvent::new(SessionChange::Refreshed, identity);

    assert_eq!(
        observer.handle(&signed_in).await,
        ReconcileOutcome::Deferred
    );
    assert_eq!(
        observer.handle(&refreshed).await,
        ReconcileOutcome::Repaired {
            metadata_synced: true
        }
    );
}

#[rstest]
#[tokio::test]
async fn role_cache_is_cleared_on_sign_out(identity: Identity) {
    let cache = Arc::new(RoleCache::new());
    cache.remember(&identity.id, Role::Admin);
    let observer = RoleCacheObserver::new(Arc::clone(&cache));

    observer
        .on_change(&SessionEvent::new(SessionChange::Refreshed, identity.clone()))
        .await;
    assert_eq!(cache.get(&identity.id), Some(Role::Admin));

    observer
        .on_change(&SessionEvent::new(SessionChange::SignedOut, identity.clone()))
        .await;
    assert_eq!(cache.get(&identity.id), None);
}

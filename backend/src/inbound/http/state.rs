//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AppSettingsRepository, AuthGateway, IdentityMetadataWriter, ModerationCompletion,
    PageConnectionRepository, ProductRepository, TenantRepository,
};
use crate::domain::{
    AccessService, CatalogService, IdentityReconciler, ModerationService, PageConnectionService,
    ReconcilingObserver, RoleCache, RoleCacheObserver, SessionHub, SessionService,
    TenantAdminService, WorkspaceService,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub auth: Arc<dyn AuthGateway>,
    pub metadata: Arc<dyn IdentityMetadataWriter>,
    pub tenants: Arc<dyn TenantRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub settings: Arc<dyn AppSettingsRepository>,
    pub pages: Arc<dyn PageConnectionRepository>,
    pub completion: Arc<dyn ModerationCompletion>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub sessions: SessionService<dyn AuthGateway>,
    pub access: AccessService<dyn TenantRepository>,
    pub tenant_admin: TenantAdminService<dyn TenantRepository>,
    pub catalog: CatalogService<dyn ProductRepository>,
    pub workspace: WorkspaceService<dyn TenantRepository, dyn AppSettingsRepository>,
    pub pages: PageConnectionService<dyn PageConnectionRepository>,
    pub moderation: ModerationService<dyn ModerationCompletion>,
}

impl HttpState {
    /// Wire the services and the session hub over `ports`.
    ///
    /// The hub runs the reconciler first, so the role cache observer sees
    /// a sign-out only after any repair for the same event finished.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            auth,
            metadata,
            tenants,
            products,
            settings,
            pages,
            completion,
        } = ports;

        let cache = Arc::new(RoleCache::new());
        let reconciler = IdentityReconciler::new(Arc::clone(&tenants), metadata);
        let hub = SessionHub::new()
            .subscribe(Arc::new(ReconcilingObserver::new(reconciler)))
            .subscribe(Arc::new(RoleCacheObserver::new(Arc::clone(&cache))));

        Self {
            sessions: SessionService::new(auth, Arc::new(hub)),
            access: AccessService::new(Arc::clone(&tenants), cache),
            tenant_admin: TenantAdminService::new(Arc::clone(&tenants)),
            catalog: CatalogService::new(products),
            workspace: WorkspaceService::new(tenants, settings),
            pages: PageConnectionService::new(pages),
            moderation: ModerationService::new(completion),
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

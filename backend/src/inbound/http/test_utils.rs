//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use chrono::Utc;
use serde_json::json;

use crate::domain::ports::{MockModerationCompletion, ModerationCompletion, TenantRepository};
use crate::domain::{
    Email, Identity, IdentityId, IdentityMetadata, OrgName, Plan, Role, TenantRecord,
};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::{
    InMemoryAppSettingsRepository, InMemoryIdentityProvider, InMemoryPageConnectionRepository,
    InMemoryProductRepository, InMemoryTenantRepository,
};

/// Password given to every seeded identity.
pub const TEST_PASSWORD: &str = "correct-horse";

const SESSION_COOKIE: &str = "session";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// In-memory adapters behind one [`HttpState`], kept reachable so tests can
/// seed and inspect them.
pub struct TestWorld {
    pub identities: Arc<InMemoryIdentityProvider>,
    pub tenants: Arc<InMemoryTenantRepository>,
    pub products: Arc<InMemoryProductRepository>,
    pub settings: Arc<InMemoryAppSettingsRepository>,
    pub pages: Arc<InMemoryPageConnectionRepository>,
    pub completion: Arc<dyn ModerationCompletion>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::with_completion(MockModerationCompletion::new())
    }
}

impl TestWorld {
    /// Empty world whose moderation previews come from `completion`.
    pub fn with_completion(completion: impl ModerationCompletion + 'static) -> Self {
        Self {
            identities: Arc::new(InMemoryIdentityProvider::default()),
            tenants: Arc::new(InMemoryTenantRepository::default()),
            products: Arc::new(InMemoryProductRepository::default()),
            settings: Arc::new(InMemoryAppSettingsRepository::default()),
            pages: Arc::new(InMemoryPageConnectionRepository::default()),
            completion: Arc::new(completion),
        }
    }

    /// Fresh handler state over the shared adapters.
    pub fn state(&self) -> HttpState {
        HttpState::new(HttpStatePorts {
            auth: self.identities.clone(),
            metadata: self.identities.clone(),
            tenants: self.tenants.clone(),
            products: self.products.clone(),
            settings: self.settings.clone(),
            pages: self.pages.clone(),
            completion: Arc::clone(&self.completion),
        })
    }

    /// Register an identity that signs in with [`TEST_PASSWORD`].
    pub fn seed_identity(&self, email: &str, metadata: IdentityMetadata) -> Identity {
        let identity = Identity::new(
            IdentityId::random(),
            Email::new(email).expect("valid seed email"),
            metadata,
        );
        self.identities
            .insert_identity(identity.clone(), TEST_PASSWORD);
        identity
    }

    /// Store a tenant record for `identity`.
    pub async fn seed_tenant(&self, identity: &Identity, org_name: &str, role: Role) -> TenantRecord {
        let record = TenantRecord {
            id: identity.id.clone(),
            org_name: OrgName::new(org_name).expect("valid seed org name"),
            role,
            plan: Plan::Free,
            email: identity.email.clone(),
            created_at: Utc::now(),
        };
        self.tenants
            .create(&record)
            .await
            .expect("seed tenant record");
        record
    }
}

/// Application with the API routes mounted under `/api/v1`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(web::scope("/api/v1").configure(configure_api))
}

/// `POST /api/v1/login` for a seeded identity.
pub fn login_request(email: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": email, "password": TEST_PASSWORD }))
}

/// Session cookie set by `res`.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
        .expect("response sets the session cookie")
}

//! End-to-end coverage of the HTTP API over the in-memory adapters.
//!
//! Each test builds the same route table the server mounts and drives it
//! through the session cookie, the way the dashboard does.

use std::sync::Arc;

use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use async_trait::async_trait;
use chrono::Utc;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use moderaflow::Trace;
use moderaflow::domain::ports::{
    ModerationCompletion, ModerationCompletionError, TenantRepository,
};
use moderaflow::domain::{
    Email, Identity, IdentityId, IdentityMetadata, ModerationPreview, ModerationRequest, OrgName,
    Plan, Role, Sentiment, TenantRecord,
};
use moderaflow::inbound::http::configure_api;
use moderaflow::inbound::http::state::{HttpState, HttpStatePorts};
use moderaflow::outbound::memory::{
    InMemoryAppSettingsRepository, InMemoryIdentityProvider, InMemoryPageConnectionRepository,
    InMemoryProductRepository, InMemoryTenantRepository,
};

const PASSWORD: &str = "correct-horse";

/// Completion double that echoes the requested tone.
struct EchoCompletion;

#[async_trait]
impl ModerationCompletion for EchoCompletion {
    async fn complete(
        &self,
        request: &ModerationRequest,
    ) -> Result<ModerationPreview, ModerationCompletionError> {
        Ok(ModerationPreview {
            sentiment: Sentiment::Neutral,
            suggested_reply: format!("[{}] Thanks for reaching out.", request.tone()),
            reasoning: "Neutral enquiry.".into(),
        })
    }
}

struct Backend {
    identities: Arc<InMemoryIdentityProvider>,
    tenants: Arc<InMemoryTenantRepository>,
    state: HttpState,
}

#[fixture]
fn backend() -> Backend {
    let identities = Arc::new(InMemoryIdentityProvider::default());
    let tenants = Arc::new(InMemoryTenantRepository::default());
    let state = HttpState::new(HttpStatePorts {
        auth: identities.clone(),
        metadata: identities.clone(),
        tenants: tenants.clone(),
        products: Arc::new(InMemoryProductRepository::default()),
        settings: Arc::new(InMemoryAppSettingsRepository::default()),
        pages: Arc::new(InMemoryPageConnectionRepository::default()),
        completion: Arc::new(EchoCompletion),
    });
    Backend {
        identities,
        tenants,
        state,
    }
}

impl Backend {
    fn seed_identity(&self, email: &str, metadata: IdentityMetadata) -> Identity {
        let identity = Identity::new(
            IdentityId::random(),
            Email::new(email).expect("valid email"),
            metadata,
        );
        self.identities.insert_identity(identity.clone(), PASSWORD);
        identity
    }

    async fn seed_tenant(&self, identity: &Identity, role: Role) {
        let record = TenantRecord {
            id: identity.id.clone(),
            org_name: OrgName::new("Seeded").expect("valid org name"),
            role,
            plan: Plan::Pro,
            email: identity.email.clone(),
            created_at: Utc::now(),
        };
        self.tenants.create(&record).await.expect("seed tenant");
    }
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .wrap(Trace)
                .service(
                    web::scope("/api/v1")
                        .wrap(
                            SessionMiddleware::builder(
                                CookieSessionStore::default(),
                                Key::generate(),
                            )
                            .cookie_name("session".to_owned())
                            .cookie_secure(false)
                            .build(),
                        )
                        .configure(configure_api),
                ),
        )
        .await
    };
}

fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

macro_rules! login {
    ($app:expr, $email:expr) => {{
        let res = test::call_service(
            &$app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(json!({ "email": $email, "password": PASSWORD }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK, "login for {}", $email);
        session_cookie(&res)
    }};
}

#[rstest]
#[actix_web::test]
async fn signup_produces_a_free_user_tenant(backend: Backend) {
    let Backend {
        identities,
        tenants,
        state,
    } = backend;
    let app = init_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/signup")
            .set_json(json!({
                "email": "founder@acme.test",
                "password": PASSWORD,
                "orgName": "Acme",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let cookie = session_cookie(&res);

    let me = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(me).await;
    assert_eq!(body["orgName"], "Acme");
    assert_eq!(body["role"], "user");
    assert_eq!(body["plan"], "Free");

    let records = tenants.snapshot();
    assert_eq!(records.len(), 1);
    let identity = identities.identity(&records[0].id).expect("identity");
    assert_eq!(identity.metadata.role_claim(), Some("user"));
}

#[rstest]
#[case("GET", "/api/v1/tenants")]
#[case("PATCH", "/api/v1/tenants/00000000-0000-0000-0000-000000000001")]
#[case("DELETE", "/api/v1/tenants/00000000-0000-0000-0000-000000000001?confirm=true")]
#[case("GET", "/api/v1/settings/workspace")]
#[actix_web::test]
async fn ghost_admins_resolve_to_user_and_are_refused(
    backend: Backend,
    #[case] method: &str,
    #[case] uri: &str,
) {
    let ghost = backend.seed_identity(
        "ghost@acme.test",
        IdentityMetadata::new(Some("Ghost".into()), Some("admin".into())),
    );
    backend.seed_tenant(&ghost, Role::User).await;
    let app = init_app!(backend.state);
    let cookie = login!(app, "ghost@acme.test");

    let me = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/me")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(me).await;
    assert_eq!(body["role"], "user");
    assert_eq!(body["showAdminNavigation"], false);

    let request = match method {
        "GET" => test::TestRequest::get(),
        "PATCH" => test::TestRequest::patch().set_json(json!({ "role": "admin" })),
        _ => test::TestRequest::delete(),
    };
    let res = test::call_service(&app, request.uri(uri).cookie(cookie).to_request()).await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert!(res.headers().contains_key("trace-id"));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "forbidden");
}

#[rstest]
#[actix_web::test]
async fn promoted_tenants_gain_admin_access(backend: Backend) {
    let root = backend.seed_identity("root@acme.test", IdentityMetadata::default());
    backend.seed_tenant(&root, Role::Admin).await;
    let member = backend.seed_identity("member@acme.test", IdentityMetadata::default());
    backend.seed_tenant(&member, Role::User).await;
    let app = init_app!(backend.state);
    let admin_cookie = login!(app, "root@acme.test");
    let member_cookie = login!(app, "member@acme.test");

    let refused = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/tenants")
            .cookie(member_cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(refused.status(), StatusCode::FORBIDDEN);

    let promoted = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/tenants/{}", member.id))
            .cookie(admin_cookie)
            .set_json(json!({ "role": "admin" }))
            .to_request(),
    )
    .await;
    assert_eq!(promoted.status(), StatusCode::OK);

    let allowed = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/tenants")
            .cookie(member_cookie)
            .to_request(),
    )
    .await;
    assert_eq!(allowed.status(), StatusCode::OK);
    let body: Value = test::read_body_json(allowed).await;
    assert_eq!(body["meta"]["total"], 2);
}

#[rstest]
#[actix_web::test]
async fn deleted_admins_lose_admin_access_mid_session(backend: Backend) {
    let root = backend.seed_identity("root@acme.test", IdentityMetadata::default());
    backend.seed_tenant(&root, Role::Admin).await;
    let deputy = backend.seed_identity("deputy@acme.test", IdentityMetadata::default());
    backend.seed_tenant(&deputy, Role::Admin).await;
    let tenants = Arc::clone(&backend.tenants);
    let app = init_app!(backend.state);
    let root_cookie = login!(app, "root@acme.test");
    let deputy_cookie = login!(app, "deputy@acme.test");

    let before = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/tenants")
            .cookie(deputy_cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(before.status(), StatusCode::OK);

    let deleted = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/tenants/{}?confirm=true", deputy.id))
            .cookie(root_cookie)
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let after = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/tenants")
            .cookie(deputy_cookie)
            .to_request(),
    )
    .await;
    assert_eq!(after.status(), StatusCode::FORBIDDEN);
    let healed = tenants
        .find_by_id(&deputy.id)
        .await
        .expect("lookup")
        .expect("record restored on the next request");
    assert_eq!(healed.role, Role::User);
}

#[rstest]
#[actix_web::test]
async fn members_manage_their_catalog_page_and_previews(backend: Backend) {
    backend.seed_identity("shop@acme.test", IdentityMetadata::default());
    let app = init_app!(backend.state);
    let cookie = login!(app, "shop@acme.test");

    let imported = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/products/import")
            .cookie(cookie.clone())
            .insert_header(("content-type", "text/csv"))
            .set_payload("Name,Description,SKU,Price,Category\nMug,,M-1,4.5,Kitchen\n")
            .to_request(),
    )
    .await;
    assert_eq!(imported.status(), StatusCode::OK);

    let connected = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/pages/connection")
            .cookie(cookie.clone())
            .set_json(json!({ "pageId": "42", "pageName": "Acme", "accessToken": "token" }))
            .to_request(),
    )
    .await;
    assert_eq!(connected.status(), StatusCode::OK);

    let preview_res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/moderation/preview")
            .cookie(cookie)
            .set_json(json!({ "message": "Do you ship abroad?" }))
            .to_request(),
    )
    .await;
    assert_eq!(preview_res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(preview_res).await;
    assert_eq!(body["sentiment"], "Neutral");
    assert_eq!(
        body["suggestedReply"],
        "[Professional and Empathetic] Thanks for reaching out."
    );
}

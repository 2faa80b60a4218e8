//! Current-identity HTTP handlers.
//!
//! ```text
//! GET /api/v1/me
//! PUT /api/v1/me/password {"password":"s3cret!","confirmPassword":"s3cret!"}
//! ```

use actix_web::{HttpResponse, get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Access, PasswordChange, RoleSource};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{authenticate, authorize};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_auth_validation_error;

/// Signed-in identity with its effective role.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: String,
    pub email: String,
    pub org_name: String,
    /// Effective role: `admin` or `user`.
    pub role: String,
    /// Which input decided the role.
    #[schema(value_type = String, example = "tenantRecord")]
    pub role_source: RoleSource,
    /// Plan of the tenant record; absent while reconciliation is pending.
    pub plan: Option<String>,
    /// Whether to show admin navigation.
    pub show_admin_navigation: bool,
    /// Whether admin-only endpoints will accept this caller.
    pub can_administer: bool,
}

impl From<&Access> for MeResponse {
    fn from(access: &Access) -> Self {
        Self {
            id: access.identity.id.to_string(),
            email: access.identity.email.to_string(),
            org_name: access.org_name().to_string(),
            role: access.role.role.to_string(),
            role_source: access.role.source,
            plan: access.tenant.as_ref().map(|tenant| tenant.plan.to_string()),
            show_admin_navigation: access.role.role.is_admin(),
            can_administer: access.role.permits_admin_mutation(),
        }
    }
}

/// Password change payload.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeRequest {
    pub password: String,
    pub confirm_password: String,
}

/// Describe the signed-in identity.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current identity", body = MeResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["session"],
    operation_id = "currentIdentity"
)]
#[get("/me")]
pub async fn current_identity(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<MeResponse>> {
    let access = authorize(&session, &state).await?;
    Ok(web::Json(MeResponse::from(&access)))
}

/// Change the signed-in identity's password.
#[utoipa::path(
    put,
    path = "/api/v1/me/password",
    request_body = PasswordChangeRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Session service unavailable", body = ErrorSchema)
    ),
    tags = ["session"],
    operation_id = "changePassword"
)]
#[put("/me/password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PasswordChangeRequest>,
) -> ApiResult<HttpResponse> {
    authenticate(&session, &state).await?;
    let token = session.require_access_token()?;
    let change = PasswordChange::try_new(&payload.password, &payload.confirm_password)
        .map_err(map_auth_validation_error)?;
    state.sessions.change_password(&token, &change).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IdentityMetadata, Role};
    use crate::inbound::http::test_utils::{
        TEST_PASSWORD, TestWorld, login_request, session_cookie, test_app,
    };
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case(Role::Admin, None, "admin", true)]
    #[case(Role::User, None, "user", false)]
    #[case(Role::User, Some("admin"), "user", false)]
    #[actix_web::test]
    async fn me_reports_the_tenant_role(
        #[case] record_role: Role,
        #[case] claim: Option<&str>,
        #[case] expected_role: &str,
        #[case] admin: bool,
    ) {
        let world = TestWorld::default();
        let identity = world.seed_identity(
            "ada@example.com",
            IdentityMetadata::new(Some("Acme".into()), claim.map(str::to_owned)),
        );
        world.seed_tenant(&identity, "Acme", record_role).await;
        let app = test::init_service(test_app(world.state())).await;
        let login_res = test::call_service(&app, login_request("ada@example.com").to_request()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/me")
                .cookie(session_cookie(&login_res))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["role"], expected_role);
        assert_eq!(body["roleSource"], "tenantRecord");
        assert_eq!(body["showAdminNavigation"], admin);
        assert_eq!(body["canAdminister"], admin);
        assert_eq!(body["plan"], "Free");
    }

    #[rstest]
    #[actix_web::test]
    async fn me_requires_a_session() {
        let world = TestWorld::default();
        let app = test::init_service(test_app(world.state())).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/api/v1/me").to_request())
                .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn changed_password_is_used_on_next_login() {
        let world = TestWorld::default();
        world.seed_identity("ada@example.com", IdentityMetadata::default());
        let app = test::init_service(test_app(world.state())).await;
        let login_res = test::call_service(&app, login_request("ada@example.com").to_request()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/v1/me/password")
                .cookie(session_cookie(&login_res))
                .set_json(json!({ "password": "brand-new-pw", "confirmPassword": "brand-new-pw" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let stale = test::call_service(&app, login_request("ada@example.com").to_request()).await;
        assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);
        let fresh = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(json!({ "email": "ada@example.com", "password": "brand-new-pw" }))
                .to_request(),
        )
        .await;
        assert_eq!(fresh.status(), StatusCode::OK);
    }

    #[rstest]
    #[case("brand-new-pw", "other-new-pw", "confirmPassword")]
    #[case("short", "short", "password")]
    #[actix_web::test]
    async fn invalid_password_changes_are_rejected(
        #[case] password: &str,
        #[case] confirm: &str,
        #[case] field: &str,
    ) {
        let world = TestWorld::default();
        world.seed_identity("ada@example.com", IdentityMetadata::default());
        let app = test::init_service(test_app(world.state())).await;
        let login_res = test::call_service(&app, login_request("ada@example.com").to_request()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/v1/me/password")
                .cookie(session_cookie(&login_res))
                .set_json(json!({ "password": password, "confirmPassword": confirm }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], field);
        let again = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(json!({ "email": "ada@example.com", "password": TEST_PASSWORD }))
                .to_request(),
        )
        .await;
        assert_eq!(again.status(), StatusCode::OK);
    }
}

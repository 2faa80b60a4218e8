//! Workspace settings handlers for tenant admins.
//!
//! ```text
//! GET /api/v1/settings/workspace
//! PUT /api/v1/settings/workspace {"orgName":"Acme","webhookUrl":"https://hooks.example/x",...}
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AppSettings, OrgName, Workspace};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_admin;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    map_settings_validation_error, map_tenant_validation_error,
};

/// Organization name plus integration settings.
///
/// Secrets are returned to the admin who owns them; blank strings mean
/// "not configured".
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceResponse {
    pub org_name: String,
    pub plan: String,
    pub webhook_url: String,
    pub webhook_secret: String,
    pub vector_store_url: String,
    pub vector_store_key: String,
    pub facebook_app_id: String,
}

impl From<Workspace> for WorkspaceResponse {
    fn from(value: Workspace) -> Self {
        let Workspace { tenant, settings } = value;
        Self {
            org_name: tenant.org_name.as_ref().to_owned(),
            plan: tenant.plan.to_string(),
            webhook_url: settings
                .webhook_url
                .map(|url| url.to_string())
                .unwrap_or_default(),
            webhook_secret: settings.webhook_secret.expose().to_owned(),
            vector_store_url: settings
                .vector_store_url
                .map(|url| url.to_string())
                .unwrap_or_default(),
            vector_store_key: settings.vector_store_key.expose().to_owned(),
            facebook_app_id: settings.facebook_app_id,
        }
    }
}

/// Full replacement of the workspace settings.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceRequest {
    pub org_name: String,
    #[serde(default)]
    pub webhook_url: String,
    #[serde(default)]
    pub webhook_secret: String,
    #[serde(default)]
    pub vector_store_url: String,
    #[serde(default)]
    pub vector_store_key: String,
    #[serde(default)]
    pub facebook_app_id: String,
}

impl WorkspaceRequest {
    fn into_parts(self) -> ApiResult<(OrgName, AppSettings)> {
        let org_name = OrgName::new(self.org_name).map_err(map_tenant_validation_error)?;
        let settings = AppSettings::try_from_parts(
            &self.webhook_url,
            &self.webhook_secret,
            &self.vector_store_url,
            &self.vector_store_key,
            &self.facebook_app_id,
        )
        .map_err(map_settings_validation_error)?;
        Ok((org_name, settings))
    }
}

/// Load the admin's workspace settings.
#[utoipa::path(
    get,
    path = "/api/v1/settings/workspace",
    responses(
        (status = 200, description = "Workspace settings", body = WorkspaceResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not an admin", body = ErrorSchema)
    ),
    tags = ["workspace"],
    operation_id = "getWorkspace"
)]
#[get("/settings/workspace")]
pub async fn get_workspace(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<WorkspaceResponse>> {
    let (_, grant) = require_admin(&session, &state).await?;
    let workspace = state.workspace.load(&grant).await?;
    Ok(web::Json(workspace.into()))
}

/// Save the admin's workspace settings and organization name.
#[utoipa::path(
    put,
    path = "/api/v1/settings/workspace",
    request_body = WorkspaceRequest,
    responses(
        (status = 200, description = "Saved workspace", body = WorkspaceResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not an admin", body = ErrorSchema)
    ),
    tags = ["workspace"],
    operation_id = "saveWorkspace"
)]
#[put("/settings/workspace")]
pub async fn save_workspace(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<WorkspaceRequest>,
) -> ApiResult<web::Json<WorkspaceResponse>> {
    let (_, grant) = require_admin(&session, &state).await?;
    let (org_name, settings) = payload.into_inner().into_parts()?;
    let workspace = state.workspace.save(&grant, org_name, settings).await?;
    Ok(web::Json(workspace.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IdentityMetadata, Role};
    use crate::inbound::http::test_utils::{TestWorld, login_request, session_cookie, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn world_with(role: Role) -> TestWorld {
        let world = TestWorld::default();
        let identity = world.seed_identity("root@example.com", IdentityMetadata::default());
        world.seed_tenant(&identity, "Root Org", role).await;
        world
    }

    macro_rules! signed_in_app {
        ($world:expr) => {{
            let app = test::init_service(test_app($world.state())).await;
            let res = test::call_service(&app, login_request("root@example.com").to_request()).await;
            assert_eq!(res.status(), StatusCode::OK);
            (app, session_cookie(&res))
        }};
    }

    #[rstest]
    #[actix_web::test]
    async fn unsaved_settings_load_blank() {
        let world = world_with(Role::Admin).await;
        let (app, cookie) = signed_in_app!(world);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/settings/workspace")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["orgName"], "Root Org");
        assert_eq!(body["webhookUrl"], "");
        assert_eq!(body["facebookAppId"], "");
    }

    #[rstest]
    #[actix_web::test]
    async fn save_renames_the_organization() {
        let world = world_with(Role::Admin).await;
        let (app, cookie) = signed_in_app!(world);

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/v1/settings/workspace")
                .cookie(cookie.clone())
                .set_json(json!({
                    "orgName": "Renamed",
                    "webhookUrl": "https://hooks.example/flow",
                    "webhookSecret": "shh",
                    "facebookAppId": "1234",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);

        let reloaded = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/settings/workspace")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body: Value = test::read_body_json(reloaded).await;
        assert_eq!(body["orgName"], "Renamed");
        assert_eq!(body["webhookUrl"], "https://hooks.example/flow");
        assert_eq!(body["webhookSecret"], "shh");
        assert_eq!(body["vectorStoreUrl"], "");
        assert_eq!(world.tenants.snapshot()[0].org_name.as_ref(), "Renamed");
    }

    #[rstest]
    #[case(json!({ "orgName": " " }), "orgName")]
    #[case(json!({ "orgName": "Acme", "webhookUrl": "ftp://hooks" }), "webhookUrl")]
    #[case(json!({ "orgName": "Acme", "vectorStoreUrl": "not a url" }), "vectorStoreUrl")]
    #[actix_web::test]
    async fn invalid_settings_are_rejected(#[case] payload: Value, #[case] field: &str) {
        let world = world_with(Role::Admin).await;
        let (app, cookie) = signed_in_app!(world);

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/v1/settings/workspace")
                .cookie(cookie)
                .set_json(payload)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], field);
        assert_eq!(world.tenants.snapshot()[0].org_name.as_ref(), "Root Org");
    }

    #[rstest]
    #[actix_web::test]
    async fn regular_users_are_refused() {
        let world = world_with(Role::User).await;
        let (app, cookie) = signed_in_app!(world);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/settings/workspace")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
}

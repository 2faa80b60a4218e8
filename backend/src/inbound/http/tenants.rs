//! Tenant administration handlers. Admin only.
//!
//! ```text
//! GET    /api/v1/tenants?page=0&search=acme
//! PATCH  /api/v1/tenants/{id} {"orgName":"Acme","role":"admin","plan":"Pro"}
//! DELETE /api/v1/tenants/{id}?confirm=true
//! ```

use actix_web::{HttpResponse, delete, get, patch, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Confirmed, ListNavigation, OrgName, Plan, Role, TENANT_PAGE_SIZE, TenantRecord, TenantUpdate,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_admin;
use crate::inbound::http::listing::{ConfirmParams, ListParams, PageMetaResponse};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_tenant_validation_error, parse_identity_id};

const TENANT_LIST_KEY: &str = "tenants";

/// Tenant record as shown to admins.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantResponse {
    pub id: String,
    pub org_name: String,
    #[schema(example = "user")]
    pub role: String,
    #[schema(example = "Free")]
    pub plan: String,
    pub email: String,
    pub created_at: String,
}

impl From<TenantRecord> for TenantResponse {
    fn from(value: TenantRecord) -> Self {
        Self {
            id: value.id.to_string(),
            org_name: value.org_name.to_string(),
            role: value.role.to_string(),
            plan: value.plan.to_string(),
            email: value.email.to_string(),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// One page of tenants.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantPageResponse {
    pub tenants: Vec<TenantResponse>,
    pub meta: PageMetaResponse,
}

/// Partial tenant update. Omitted fields stay unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantUpdateRequest {
    pub org_name: Option<String>,
    #[schema(example = "admin")]
    pub role: Option<String>,
    #[schema(example = "Pro")]
    pub plan: Option<String>,
}

impl TryFrom<TenantUpdateRequest> for TenantUpdate {
    type Error = crate::domain::Error;

    fn try_from(value: TenantUpdateRequest) -> Result<Self, Self::Error> {
        let org_name = value
            .org_name
            .map(OrgName::new)
            .transpose()
            .map_err(map_tenant_validation_error)?;
        let role = value
            .role
            .map(|raw| raw.parse::<Role>())
            .transpose()
            .map_err(map_tenant_validation_error)?;
        let plan = value
            .plan
            .map(|raw| raw.parse::<Plan>())
            .transpose()
            .map_err(map_tenant_validation_error)?;
        Ok(Self {
            org_name,
            role,
            plan,
        })
    }
}

/// List tenants, newest first, five per page.
#[utoipa::path(
    get,
    path = "/api/v1/tenants",
    params(ListParams),
    responses(
        (status = 200, description = "Tenant page", body = TenantPageResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 503, description = "Tenant store unavailable", body = ErrorSchema)
    ),
    tags = ["tenants"],
    operation_id = "listTenants"
)]
#[get("/tenants")]
pub async fn list_tenants(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<ListParams>,
) -> ApiResult<web::Json<TenantPageResponse>> {
    let (_, grant) = require_admin(&session, &state).await?;
    let mut list = session.list_state(TENANT_LIST_KEY, TENANT_PAGE_SIZE)?;
    ListNavigation::from(params.into_inner()).apply(&mut list);
    let page = state.tenant_admin.list(&grant, &mut list).await?;
    session.store_list_state(TENANT_LIST_KEY, &list)?;
    let meta = page.meta().into();
    Ok(web::Json(TenantPageResponse {
        tenants: page.into_rows().into_iter().map(Into::into).collect(),
        meta,
    }))
}

/// Change the organization name, role or plan of a tenant.
#[utoipa::path(
    patch,
    path = "/api/v1/tenants/{id}",
    params(("id" = String, Path, description = "Tenant id")),
    request_body = TenantUpdateRequest,
    responses(
        (status = 200, description = "Updated tenant", body = TenantResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["tenants"],
    operation_id = "updateTenant"
)]
#[patch("/tenants/{id}")]
pub async fn update_tenant(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<TenantUpdateRequest>,
) -> ApiResult<web::Json<TenantResponse>> {
    let (_, grant) = require_admin(&session, &state).await?;
    let id = parse_identity_id(&path)?;
    let update = TenantUpdate::try_from(payload.into_inner())?;
    let record = state.tenant_admin.update(&grant, &id, &update).await?;
    Ok(web::Json(record.into()))
}

/// Delete a tenant record. Requires `confirm=true`.
#[utoipa::path(
    delete,
    path = "/api/v1/tenants/{id}",
    params(("id" = String, Path, description = "Tenant id"), ConfirmParams),
    responses(
        (status = 204, description = "Tenant deleted"),
        (status = 400, description = "Confirmation missing", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["tenants"],
    operation_id = "deleteTenant"
)]
#[delete("/tenants/{id}")]
pub async fn delete_tenant(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    params: web::Query<ConfirmParams>,
) -> ApiResult<HttpResponse> {
    let (_, grant) = require_admin(&session, &state).await?;
    let id = parse_identity_id(&path)?;
    let confirmed = Confirmed::check(params.confirm)?;
    state.tenant_admin.delete(&grant, &id, confirmed).await?;
    Ok(HttpResponse::NoContent().finish())
}

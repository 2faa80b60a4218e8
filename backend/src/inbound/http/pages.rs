//! Facebook Page connection handlers.
//!
//! ```text
//! GET    /api/v1/pages/connection
//! PUT    /api/v1/pages/connection {"pageId":"42","pageName":"Acme","accessToken":"EAAB..."}
//! DELETE /api/v1/pages/connection?confirm=true
//! ```
//!
//! The page access token is write-only; responses never carry it.

use actix_web::{HttpResponse, delete, get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Confirmed, PageBinding, PageConnection};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::authenticate;
use crate::inbound::http::listing::ConfirmParams;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_page_validation_error;

/// Page chosen by the tenant.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageConnectionRequest {
    pub page_id: String,
    pub page_name: String,
    pub access_token: String,
}

/// Stored page connection, without its token.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageConnectionResponse {
    pub page_id: String,
    pub page_name: String,
    pub connected_at: String,
}

impl From<PageConnection> for PageConnectionResponse {
    fn from(value: PageConnection) -> Self {
        Self {
            page_id: value.binding.page_id().to_owned(),
            page_name: value.binding.page_name().to_owned(),
            connected_at: value.connected_at.to_rfc3339(),
        }
    }
}

/// Envelope for the current connection; `connection` is null when none.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConnectionResponse {
    pub connection: Option<PageConnectionResponse>,
}

/// Show the caller's connected page.
#[utoipa::path(
    get,
    path = "/api/v1/pages/connection",
    responses(
        (status = 200, description = "Current connection", body = CurrentConnectionResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["pages"],
    operation_id = "currentPageConnection"
)]
#[get("/pages/connection")]
pub async fn current_connection(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<CurrentConnectionResponse>> {
    let identity = authenticate(&session, &state).await?;
    let connection = state.pages.current(&identity.id).await?;
    Ok(web::Json(CurrentConnectionResponse {
        connection: connection.map(Into::into),
    }))
}

/// Connect a page, replacing any previous one.
#[utoipa::path(
    put,
    path = "/api/v1/pages/connection",
    request_body = PageConnectionRequest,
    responses(
        (status = 200, description = "Connected page", body = PageConnectionResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["pages"],
    operation_id = "connectPage"
)]
#[put("/pages/connection")]
pub async fn connect_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PageConnectionRequest>,
) -> ApiResult<web::Json<PageConnectionResponse>> {
    let identity = authenticate(&session, &state).await?;
    let binding =
        PageBinding::try_from_parts(&payload.page_id, &payload.page_name, &payload.access_token)
            .map_err(map_page_validation_error)?;
    let connection = state.pages.connect(&identity.id, binding).await?;
    Ok(web::Json(connection.into()))
}

/// Disconnect the page. Requires `confirm=true`.
#[utoipa::path(
    delete,
    path = "/api/v1/pages/connection",
    params(ConfirmParams),
    responses(
        (status = 204, description = "Page disconnected"),
        (status = 400, description = "Confirmation missing", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["pages"],
    operation_id = "disconnectPage"
)]
#[delete("/pages/connection")]
pub async fn disconnect_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<ConfirmParams>,
) -> ApiResult<HttpResponse> {
    let identity = authenticate(&session, &state).await?;
    let confirmed = Confirmed::check(params.confirm)?;
    state.pages.disconnect(&identity.id, confirmed).await?;
    Ok(HttpResponse::NoContent().finish())
}

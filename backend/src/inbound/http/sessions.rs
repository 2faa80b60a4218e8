//! Sign-up, sign-in, sign-out and session reload handlers.
//!
//! ```text
//! POST /api/v1/signup {"email":"ada@example.com","password":"s3cret!","orgName":"Acme"}
//! POST /api/v1/login {"email":"ada@example.com","password":"s3cret!"}
//! POST /api/v1/logout
//! POST /api/v1/session/reload
//! ```
//!
//! Each handler is the only writer of its session change; the hub runs the
//! reconciler before the response is built, so the returned profile already
//! reflects any repaired tenant record.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Registration, SignInCredentials, SignUpOutcome};
use crate::inbound::http::ApiResult;
use crate::inbound::http::me::MeResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_auth_validation_error;

/// Sign-up request body for `POST /api/v1/signup`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub org_name: String,
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Register a new organization owner.
///
/// Answers `201` with the new profile when the session service signs the
/// identity in straight away, or `202` when email confirmation is pending.
#[utoipa::path(
    post,
    path = "/api/v1/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Signed up and signed in", body = MeResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 202, description = "Email confirmation required"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Session service unavailable", body = ErrorSchema)
    ),
    tags = ["session"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let registration =
        Registration::try_from_parts(&payload.email, &payload.password, &payload.org_name)
            .map_err(map_auth_validation_error)?;
    match state.sessions.sign_up(&registration).await? {
        SignUpOutcome::SignedIn(auth) => {
            session.persist_session(&auth)?;
            let access = state.access.resolve(&auth.identity).await;
            Ok(HttpResponse::Created().json(MeResponse::from(&access)))
        }
        SignUpOutcome::ConfirmationRequired => {
            Ok(HttpResponse::Accepted().json(json!({ "status": "confirmation_required" })))
        }
    }
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = MeResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Session service unavailable", body = ErrorSchema)
    ),
    tags = ["session"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<MeResponse>> {
    let credentials = SignInCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(map_auth_validation_error)?;
    let auth = state.sessions.sign_in(&credentials).await?;
    session.persist_session(&auth)?;
    let access = state.access.resolve(&auth.identity).await;
    Ok(web::Json(MeResponse::from(&access)))
}

/// End the session. Always succeeds locally.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["session"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    if let Some(identity) = session.identity()? {
        let token = session.access_token()?.unwrap_or_default();
        state.sessions.sign_out(&identity, &token).await;
    }
    session.clear();
    Ok(HttpResponse::NoContent().finish())
}

/// Re-run reconciliation for the signed-in identity and return its profile.
#[utoipa::path(
    post,
    path = "/api/v1/session/reload",
    responses(
        (status = 200, description = "Reloaded profile", body = MeResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["session"],
    operation_id = "reloadSession"
)]
#[post("/session/reload")]
pub async fn reload_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<MeResponse>> {
    let identity = session.require_identity()?;
    state.sessions.reload(&identity).await;
    let access = state.access.resolve(&identity).await;
    Ok(web::Json(MeResponse::from(&access)))
}

//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer
//! - **Schemas**: request and response bodies, plus the domain error
//!   wrappers ([`ErrorSchema`], [`ErrorCodeSchema`]) that keep domain types
//!   free of utoipa derives
//! - **Security**: session cookie authentication scheme
//!
//! The generated document is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::listing::PageMetaResponse;
use crate::inbound::http::me::{MeResponse, PasswordChangeRequest};
use crate::inbound::http::moderation::{ModerationPreviewRequest, ModerationPreviewResponse};
use crate::inbound::http::pages::{
    CurrentConnectionResponse, PageConnectionRequest, PageConnectionResponse,
};
use crate::inbound::http::products::{
    ImportResponse, ProductPageResponse, ProductRequest, ProductResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::sessions::{LoginRequest, SignupRequest};
use crate::inbound::http::tenants::{TenantPageResponse, TenantResponse, TenantUpdateRequest};
use crate::inbound::http::workspace::{WorkspaceRequest, WorkspaceResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login or /api/v1/signup.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "ModeraFlow backend API",
        description = "Tenant identity, role-gated administration, catalog and moderation endpoints."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::sessions::signup,
        crate::inbound::http::sessions::login,
        crate::inbound::http::sessions::logout,
        crate::inbound::http::sessions::reload_session,
        crate::inbound::http::me::current_identity,
        crate::inbound::http::me::change_password,
        crate::inbound::http::tenants::list_tenants,
        crate::inbound::http::tenants::update_tenant,
        crate::inbound::http::tenants::delete_tenant,
        crate::inbound::http::products::list_products,
        crate::inbound::http::products::create_product,
        crate::inbound::http::products::update_product,
        crate::inbound::http::products::delete_product,
        crate::inbound::http::products::import_products,
        crate::inbound::http::workspace::get_workspace,
        crate::inbound::http::workspace::save_workspace,
        crate::inbound::http::pages::current_connection,
        crate::inbound::http::pages::connect_page,
        crate::inbound::http::pages::disconnect_page,
        crate::inbound::http::moderation::preview,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        PageMetaResponse,
        SignupRequest,
        LoginRequest,
        MeResponse,
        PasswordChangeRequest,
        TenantResponse,
        TenantPageResponse,
        TenantUpdateRequest,
        ProductRequest,
        ProductResponse,
        ProductPageResponse,
        ImportResponse,
        WorkspaceRequest,
        WorkspaceResponse,
        PageConnectionRequest,
        PageConnectionResponse,
        CurrentConnectionResponse,
        ModerationPreviewRequest,
        ModerationPreviewResponse,
    )),
    tags(
        (name = "session", description = "Sign-up, sign-in and the current identity"),
        (name = "tenants", description = "Tenant administration for admins"),
        (name = "catalog", description = "Owner-scoped product catalog"),
        (name = "workspace", description = "Organization and integration settings"),
        (name = "pages", description = "Facebook Page connection"),
        (name = "moderation", description = "Reply drafting for customer messages"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

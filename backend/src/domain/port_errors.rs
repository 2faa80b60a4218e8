//! Conversions from port errors into API-facing domain errors.
//!
//! Adapter failures that reveal store internals map to redacted internal
//! errors; the full message is logged here before it is discarded.

use serde_json::json;
use tracing::error;

use crate::domain::Error;
use crate::domain::ports::{
    AppSettingsRepositoryError, AuthGatewayError, IdentityMetadataError,
    ModerationCompletionError, PageConnectionRepositoryError, ProductRepositoryError,
    TenantRepositoryError,
};

/// Message returned whenever the tenant record does not authorize an action.
pub const ACCESS_DENIED_MESSAGE: &str =
    "Access denied: the tenant record does not grant this action";

fn access_denied(message: &str) -> Error {
    error!(error = %message, "store denied access");
    Error::forbidden(ACCESS_DENIED_MESSAGE)
}

fn schema_mismatch(message: &str) -> Error {
    error!(error = %message, "row failed schema validation");
    Error::internal(format!("schema mismatch: {message}"))
        .with_details(json!({ "code": "schema_mismatch" }))
}

fn query_failure(message: &str) -> Error {
    error!(error = %message, "store query failed");
    Error::internal(format!("store query failed: {message}"))
}

impl From<TenantRepositoryError> for Error {
    fn from(err: TenantRepositoryError) -> Self {
        match err {
            TenantRepositoryError::AccessDenied { message } => access_denied(&message),
            TenantRepositoryError::SchemaMismatch { message } => schema_mismatch(&message),
            TenantRepositoryError::UniqueViolation { .. } => {
                Error::conflict("a tenant record already exists for this identity")
            }
            TenantRepositoryError::NotFound { id } => {
                Error::not_found(format!("tenant {id} not found"))
            }
            TenantRepositoryError::Transient { message } => {
                Error::service_unavailable(format!("tenant store unavailable: {message}"))
            }
            TenantRepositoryError::Query { message } => query_failure(&message),
        }
    }
}

impl From<ProductRepositoryError> for Error {
    fn from(err: ProductRepositoryError) -> Self {
        match err {
            ProductRepositoryError::AccessDenied { message } => access_denied(&message),
            ProductRepositoryError::SchemaMismatch { message } => schema_mismatch(&message),
            ProductRepositoryError::NotFound { id } => {
                Error::not_found(format!("product {id} not found"))
            }
            ProductRepositoryError::Transient { message } => {
                Error::service_unavailable(format!("product store unavailable: {message}"))
            }
            ProductRepositoryError::Query { message } => query_failure(&message),
        }
    }
}

impl From<AppSettingsRepositoryError> for Error {
    fn from(err: AppSettingsRepositoryError) -> Self {
        match err {
            AppSettingsRepositoryError::AccessDenied { message } => access_denied(&message),
            AppSettingsRepositoryError::SchemaMismatch { message } => schema_mismatch(&message),
            AppSettingsRepositoryError::Transient { message } => {
                Error::service_unavailable(format!("settings store unavailable: {message}"))
            }
            AppSettingsRepositoryError::Query { message } => query_failure(&message),
        }
    }
}

impl From<PageConnectionRepositoryError> for Error {
    fn from(err: PageConnectionRepositoryError) -> Self {
        match err {
            PageConnectionRepositoryError::AccessDenied { message } => access_denied(&message),
            PageConnectionRepositoryError::SchemaMismatch { message } => schema_mismatch(&message),
            PageConnectionRepositoryError::Transient { message } => {
                Error::service_unavailable(format!("page store unavailable: {message}"))
            }
            PageConnectionRepositoryError::Query { message } => query_failure(&message),
        }
    }
}

impl From<IdentityMetadataError> for Error {
    fn from(err: IdentityMetadataError) -> Self {
        match err {
            IdentityMetadataError::AccessDenied { message } => access_denied(&message),
            IdentityMetadataError::Transient { message } => {
                Error::service_unavailable(format!("session service unavailable: {message}"))
            }
            IdentityMetadataError::Query { message } => query_failure(&message),
        }
    }
}

impl From<AuthGatewayError> for Error {
    fn from(err: AuthGatewayError) -> Self {
        match err {
            AuthGatewayError::InvalidCredentials { message } => Error::unauthorized(message),
            AuthGatewayError::UniqueViolation { .. } => {
                Error::conflict("an account already exists for this email")
            }
            AuthGatewayError::Rejected { message } => Error::invalid_request(message),
            AuthGatewayError::SchemaMismatch { message } => schema_mismatch(&message),
            AuthGatewayError::Transient { message } => {
                Error::service_unavailable(format!("session service unavailable: {message}"))
            }
            AuthGatewayError::Query { message } => query_failure(&message),
        }
    }
}

impl From<ModerationCompletionError> for Error {
    fn from(err: ModerationCompletionError) -> Self {
        match err {
            ModerationCompletionError::Credentials { message } => {
                error!(error = %message, "completion credentials rejected");
                Error::bad_gateway(
                    "The completion provider rejected the request. Check the API key configuration.",
                )
            }
            ModerationCompletionError::RateLimited { message } => {
                error!(error = %message, "completion rate limited");
                Error::bad_gateway(
                    "The completion provider is rate limiting requests. Try again in a minute.",
                )
            }
            ModerationCompletionError::Upstream { message } => {
                error!(error = %message, "completion provider failed");
                Error::bad_gateway("The completion provider returned an unusable response.")
            }
            ModerationCompletionError::Transient { message } => {
                Error::service_unavailable(format!("completion provider unavailable: {message}"))
            }
        }
    }
}

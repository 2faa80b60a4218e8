//! Shared validation helpers for inbound HTTP adapters.
//!
//! Domain validation enums become `invalid_request` errors whose details
//! name the offending field and a stable code.

use serde_json::json;

use crate::domain::{
    AppSettingsValidationError, AuthValidationError, Error, IdentityId, ModerationValidationError,
    PageConnectionValidationError, ProductValidationError, TenantValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidEmail,
    PasswordTooShort,
    PasswordMismatch,
    InvalidOrgName,
    InvalidRole,
    InvalidPlan,
    InvalidPrice,
    InvalidUrl,
    InvalidUuid,
    MessageTooLong,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::PasswordTooShort => "password_too_short",
            ErrorCode::PasswordMismatch => "password_mismatch",
            ErrorCode::InvalidOrgName => "invalid_org_name",
            ErrorCode::InvalidRole => "invalid_role",
            ErrorCode::InvalidPlan => "invalid_plan",
            ErrorCode::InvalidPrice => "invalid_price",
            ErrorCode::InvalidUrl => "invalid_url",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::MessageTooLong => "message_too_long",
        }
    }
}

pub(crate) fn field_error(field: &str, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn map_auth_validation_error(err: AuthValidationError) -> Error {
    let message = err.to_string();
    match err {
        AuthValidationError::Email(_) => field_error("email", ErrorCode::InvalidEmail, message),
        AuthValidationError::EmptyPassword => {
            field_error("password", ErrorCode::MissingField, message)
        }
        AuthValidationError::PasswordTooShort => {
            field_error("password", ErrorCode::PasswordTooShort, message)
        }
        AuthValidationError::PasswordMismatch => {
            field_error("confirmPassword", ErrorCode::PasswordMismatch, message)
        }
        AuthValidationError::OrgName(_) => {
            field_error("orgName", ErrorCode::InvalidOrgName, message)
        }
    }
}

pub(crate) fn map_tenant_validation_error(err: TenantValidationError) -> Error {
    let message = err.to_string();
    match err {
        TenantValidationError::EmptyOrgName | TenantValidationError::OrgNameTooLong { .. } => {
            field_error("orgName", ErrorCode::InvalidOrgName, message)
        }
        TenantValidationError::UnknownRole(_) => {
            field_error("role", ErrorCode::InvalidRole, message)
        }
        TenantValidationError::UnknownPlan(_) => {
            field_error("plan", ErrorCode::InvalidPlan, message)
        }
    }
}

pub(crate) fn map_product_validation_error(err: ProductValidationError) -> Error {
    let message = err.to_string();
    match err {
        ProductValidationError::EmptyName => field_error("name", ErrorCode::MissingField, message),
        ProductValidationError::InvalidPrice => {
            field_error("price", ErrorCode::InvalidPrice, message)
        }
    }
}

pub(crate) fn map_settings_validation_error(err: AppSettingsValidationError) -> Error {
    let message = err.to_string();
    match err {
        AppSettingsValidationError::InvalidUrl { field } => {
            field_error(field, ErrorCode::InvalidUrl, message)
        }
    }
}

pub(crate) fn map_page_validation_error(err: PageConnectionValidationError) -> Error {
    let message = err.to_string();
    match err {
        PageConnectionValidationError::MissingField { field } => {
            field_error(field, ErrorCode::MissingField, message)
        }
    }
}

pub(crate) fn map_moderation_validation_error(err: ModerationValidationError) -> Error {
    let message = err.to_string();
    match err {
        ModerationValidationError::MessageTooLong { .. } => {
            field_error("message", ErrorCode::MessageTooLong, message)
        }
        ModerationValidationError::EmptyMessage | ModerationValidationError::UnknownSentiment(_) => {
            field_error("message", ErrorCode::MissingField, message)
        }
    }
}

/// Parse a tenant id taken from the request path.
pub(crate) fn parse_identity_id(raw: &str) -> Result<IdentityId, Error> {
    IdentityId::new(raw)
        .map_err(|err| field_error("id", ErrorCode::InvalidUuid, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode as ApiErrorCode, IdentityValidationError};
    use rstest::rstest;

    #[rstest]
    #[case(AuthValidationError::Email(IdentityValidationError::InvalidEmail), "email", "invalid_email")]
    #[case(AuthValidationError::PasswordTooShort, "password", "password_too_short")]
    #[case(AuthValidationError::PasswordMismatch, "confirmPassword", "password_mismatch")]
    #[case(AuthValidationError::OrgName(TenantValidationError::EmptyOrgName), "orgName", "invalid_org_name")]
    fn auth_errors_name_their_field(
        #[case] err: AuthValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let error = map_auth_validation_error(err);
        assert_eq!(error.code(), ApiErrorCode::InvalidRequest);
        assert_eq!(
            error.details(),
            Some(&json!({ "field": field, "code": code }))
        );
    }

    #[rstest]
    fn settings_errors_carry_the_url_field() {
        let error = map_settings_validation_error(AppSettingsValidationError::InvalidUrl {
            field: "webhookUrl",
        });
        assert_eq!(
            error.details(),
            Some(&json!({ "field": "webhookUrl", "code": "invalid_url" }))
        );
    }

    #[rstest]
    #[case("not-a-uuid")]
    #[case("")]
    fn path_ids_must_be_uuids(#[case] raw: &str) {
        let error = parse_identity_id(raw).expect_err("invalid id");
        assert_eq!(
            error.details(),
            Some(&json!({ "field": "id", "code": "invalid_uuid" }))
        );
    }
}

//! Row and payload DTOs for the BaaS tables and auth API.
//!
//! Rows decode into these transport shapes first, then convert into domain
//! records in one pass. Any value the domain rejects becomes a schema
//! mismatch message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    AppSettings, Email, Identity, IdentityId, IdentityMetadata, OrgName, PageBinding,
    PageConnection, Product, ProductDraft, ProductId, TenantRecord, TenantUpdate,
};

#[derive(Debug, Deserialize)]
pub(super) struct TenantRowDto {
    pub(super) id: String,
    pub(super) org_name: String,
    pub(super) role: String,
    pub(super) plan: String,
    pub(super) email: String,
    pub(super) created_at: DateTime<Utc>,
}

impl TenantRowDto {
    pub(super) fn into_domain(self) -> Result<TenantRecord, String> {
        let id = IdentityId::new(&self.id).map_err(|err| format!("tenant id {}: {err}", self.id))?;
        Ok(TenantRecord {
            org_name: OrgName::new(self.org_name).map_err(|err| format!("tenant {id}: {err}"))?,
            role: self.role.parse().map_err(|err| format!("tenant {id}: {err}"))?,
            plan: self.plan.parse().map_err(|err| format!("tenant {id}: {err}"))?,
            email: Email::new(self.email).map_err(|err| format!("tenant {id}: {err}"))?,
            created_at: self.created_at,
            id,
        })
    }
}

#[derive(Debug, Serialize)]
pub(super) struct NewTenantDto<'a> {
    id: &'a str,
    org_name: &'a str,
    role: &'static str,
    plan: &'static str,
    email: &'a str,
    created_at: DateTime<Utc>,
}

impl<'a> From<&'a TenantRecord> for NewTenantDto<'a> {
    fn from(record: &'a TenantRecord) -> Self {
        Self {
            id: record.id.as_ref(),
            org_name: record.org_name.as_ref(),
            role: record.role.as_str(),
            plan: record.plan.as_str(),
            email: record.email.as_ref(),
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct TenantPatchDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    org_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<&'static str>,
}

impl<'a> From<&'a TenantUpdate> for TenantPatchDto<'a> {
    fn from(update: &'a TenantUpdate) -> Self {
        Self {
            org_name: update.org_name.as_ref().map(AsRef::as_ref),
            role: update.role.map(|role| role.as_str()),
            plan: update.plan.map(|plan| plan.as_str()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductRowDto {
    pub(super) id: i64,
    pub(super) user_id: String,
    pub(super) name: String,
    #[serde(default)]
    pub(super) description: Option<String>,
    #[serde(default)]
    pub(super) sku: Option<String>,
    #[serde(default)]
    pub(super) price: Option<f64>,
    #[serde(default)]
    pub(super) category: Option<String>,
    pub(super) created_at: DateTime<Utc>,
}

impl ProductRowDto {
    pub(super) fn into_domain(self) -> Result<Product, String> {
        let owner_id =
            IdentityId::new(&self.user_id).map_err(|err| format!("product {}: {err}", self.id))?;
        let draft = ProductDraft::try_new(
            &self.name,
            self.description.as_deref().unwrap_or_default(),
            self.sku.as_deref().unwrap_or_default(),
            self.price.unwrap_or_default(),
            self.category.as_deref().unwrap_or_default(),
        )
        .map_err(|err| format!("product {}: {err}", self.id))?;
        Ok(Product {
            id: ProductId::new(self.id),
            owner_id,
            draft,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ProductWriteDto<'a> {
    user_id: &'a str,
    name: &'a str,
    description: &'a str,
    sku: &'a str,
    price: f64,
    category: &'a str,
}

impl<'a> ProductWriteDto<'a> {
    pub(super) fn new(owner: &'a IdentityId, draft: &'a ProductDraft) -> Self {
        Self {
            user_id: owner.as_ref(),
            name: draft.name(),
            description: draft.description(),
            sku: draft.sku(),
            price: draft.price(),
            category: draft.category(),
        }
    }
}

/// Column names follow the hosted table, which predates the domain names.
#[derive(Debug, Default, Deserialize, Serialize)]
pub(super) struct AppSettingsRowDto {
    #[serde(default)]
    pub(super) user_id: String,
    #[serde(default)]
    pub(super) n8n_webhook_url: Option<String>,
    #[serde(default)]
    pub(super) n8n_webhook_secret: Option<String>,
    #[serde(default)]
    pub(super) supabase_url: Option<String>,
    #[serde(default)]
    pub(super) supabase_key: Option<String>,
    #[serde(default)]
    pub(super) facebook_app_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) updated_at: Option<DateTime<Utc>>,
}

impl AppSettingsRowDto {
    pub(super) fn new(owner: &IdentityId, settings: &AppSettings, now: DateTime<Utc>) -> Self {
        Self {
            user_id: owner.to_string(),
            n8n_webhook_url: Some(
                settings
                    .webhook_url
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            ),
            n8n_webhook_secret: Some(settings.webhook_secret.expose().to_owned()),
            supabase_url: Some(
                settings
                    .vector_store_url
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            ),
            supabase_key: Some(settings.vector_store_key.expose().to_owned()),
            facebook_app_id: Some(settings.facebook_app_id.clone()),
            updated_at: Some(now),
        }
    }

    pub(super) fn into_domain(self) -> Result<AppSettings, String> {
        AppSettings::try_from_parts(
            self.n8n_webhook_url.as_deref().unwrap_or_default(),
            self.n8n_webhook_secret.as_deref().unwrap_or_default(),
            self.supabase_url.as_deref().unwrap_or_default(),
            self.supabase_key.as_deref().unwrap_or_default(),
            self.facebook_app_id.as_deref().unwrap_or_default(),
        )
        .map_err(|err| format!("settings for {}: {err}", self.user_id))
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub(super) struct PageRowDto {
    pub(super) user_id: String,
    pub(super) page_id: String,
    pub(super) page_name: String,
    pub(super) access_token: String,
    pub(super) created_at: DateTime<Utc>,
}

impl PageRowDto {
    pub(super) fn into_domain(self) -> Result<PageConnection, String> {
        let tenant_id =
            IdentityId::new(&self.user_id).map_err(|err| format!("page {}: {err}", self.page_id))?;
        let binding =
            PageBinding::try_from_parts(&self.page_id, &self.page_name, &self.access_token)
                .map_err(|err| format!("page {}: {err}", self.page_id))?;
        Ok(PageConnection {
            tenant_id,
            binding,
            connected_at: self.created_at,
        })
    }
}

impl From<&PageConnection> for PageRowDto {
    fn from(connection: &PageConnection) -> Self {
        Self {
            user_id: connection.tenant_id.to_string(),
            page_id: connection.binding.page_id().to_owned(),
            page_name: connection.binding.page_name().to_owned(),
            access_token: connection.binding.access_token().expose().to_owned(),
            created_at: connection.connected_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthUserDto {
    pub(super) id: String,
    pub(super) email: String,
    #[serde(default)]
    pub(super) user_metadata: IdentityMetadata,
}

impl AuthUserDto {
    pub(super) fn into_domain(self) -> Result<Identity, String> {
        let id = IdentityId::new(&self.id).map_err(|err| format!("user id {}: {err}", self.id))?;
        let email = Email::new(self.email).map_err(|err| format!("user {id}: {err}"))?;
        Ok(Identity::new(id, email, self.user_metadata))
    }
}

/// Token grant and sign-up responses share this shape; a sign-up that
/// awaits email confirmation carries no token.
#[derive(Debug, Deserialize)]
pub(super) struct AuthSessionDto {
    #[serde(default)]
    pub(super) access_token: Option<String>,
    #[serde(default)]
    pub(super) user: Option<AuthUserDto>,
}

#[derive(Debug, Serialize)]
pub(super) struct PasswordGrantDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct SignUpDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    pub(super) data: MetadataDto<'a>,
}

#[derive(Debug, Serialize)]
pub(super) struct MetadataDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) org_name: Option<&'a str>,
    pub(super) role: &'static str,
}

#[derive(Debug, Serialize)]
pub(super) struct PasswordUpdateDto<'a> {
    pub(super) password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct AdminMetadataUpdateDto {
    pub(super) user_metadata: MetadataDto<'static>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row mapping.
    use super::*;
    use crate::domain::{Plan, Role};
    use rstest::rstest;
    use serde_json::json;

    fn tenant_row(role: &str, plan: &str, org_name: &str) -> serde_json::Value {
        json!({
            "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "org_name": org_name,
            "role": role,
            "plan": plan,
            "email": "ada@example.com",
            "created_at": "2024-05-01T10:00:00Z",
        })
    }

    #[rstest]
    fn tenant_rows_map_into_records() {
        let row: TenantRowDto =
            serde_json::from_value(tenant_row("admin", "Pro", "Acme")).expect("row");
        let record = row.into_domain().expect("valid row");
        assert_eq!(record.role, Role::Admin);
        assert_eq!(record.plan, Plan::Pro);
        assert_eq!(record.org_name.as_ref(), "Acme");
    }

    #[rstest]
    #[case::unknown_role("owner", "Free", "Acme")]
    #[case::unknown_plan("user", "Gold", "Acme")]
    #[case::blank_org("user", "Free", "  ")]
    fn unexpected_tenant_rows_are_rejected(
        #[case] role: &str,
        #[case] plan: &str,
        #[case] org_name: &str,
    ) {
        let row: TenantRowDto =
            serde_json::from_value(tenant_row(role, plan, org_name)).expect("row");
        assert!(row.into_domain().is_err());
    }

    #[rstest]
    fn tenant_patch_skips_absent_fields() {
        let update = TenantUpdate {
            role: Some(Role::Admin),
            ..TenantUpdate::default()
        };
        let value = serde_json::to_value(TenantPatchDto::from(&update)).expect("serialise");
        assert_eq!(value, json!({ "role": "admin" }));
    }

    #[rstest]
    fn product_rows_default_missing_columns() {
        let row: ProductRowDto = serde_json::from_value(json!({
            "id": 7,
            "user_id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "name": "Mug",
            "price": null,
            "created_at": "2024-05-01T10:00:00Z",
        }))
        .expect("row");
        let product = row.into_domain().expect("valid row");
        assert_eq!(product.id, ProductId::new(7));
        assert_eq!(product.draft.category(), "Uncategorized");
        assert!(product.draft.price().abs() < f64::EPSILON);
    }

    #[rstest]
    fn settings_rows_round_trip_through_domain() {
        let owner = IdentityId::random();
        let settings = AppSettings::try_from_parts("https://hooks.example/x", "s", "", "k", "42")
            .expect("valid");
        let row = AppSettingsRowDto::new(&owner, &settings, Utc::now());
        assert_eq!(row.supabase_url.as_deref(), Some(""));
        assert_eq!(row.into_domain().expect("valid"), settings);
    }

    #[rstest]
    fn sign_up_payload_nests_metadata() {
        let payload = SignUpDto {
            email: "ada@example.com",
            password: "secret1",
            data: MetadataDto {
                org_name: Some("Acme"),
                role: "user",
            },
        };
        let value = serde_json::to_value(payload).expect("serialise");
        assert_eq!(value["data"], json!({ "org_name": "Acme", "role": "user" }));
    }

    #[rstest]
    fn confirmation_pending_sign_up_has_no_session() {
        let dto: AuthSessionDto = serde_json::from_value(json!({
            "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "email": "ada@example.com",
        }))
        .expect("payload");
        assert!(dto.access_token.is_none());
        assert!(dto.user.is_none());
    }
}

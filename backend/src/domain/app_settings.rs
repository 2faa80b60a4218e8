//! Per-tenant integration settings.

use url::Url;

use crate::domain::secret::Secret;

/// Validation errors for [`AppSettings`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppSettingsValidationError {
    /// A URL field was not an absolute `http`/`https` URL.
    #[error("{field} must be an absolute http(s) URL")]
    InvalidUrl {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// Webhook, vector store and Facebook app configuration for one tenant.
///
/// Saved with upsert semantics: the last full write wins. Blank fields mean
/// "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppSettings {
    /// Automation webhook endpoint.
    pub webhook_url: Option<Url>,
    /// Shared secret sent with webhook calls.
    pub webhook_secret: Secret,
    /// Vector store endpoint.
    pub vector_store_url: Option<Url>,
    /// Vector store API key.
    pub vector_store_key: Secret,
    /// Facebook application identifier.
    pub facebook_app_id: String,
}

impl AppSettings {
    /// Validate raw settings values.
    ///
    /// # Examples
    /// ```
    /// use moderaflow::domain::AppSettings;
    ///
    /// let ok = AppSettings::try_from_parts("https://hooks.example/x", "s", "", "", "123");
    /// assert!(ok.is_ok());
    /// assert!(AppSettings::try_from_parts("ftp://x", "", "", "", "").is_err());
    /// ```
    pub fn try_from_parts(
        webhook_url: &str,
        webhook_secret: &str,
        vector_store_url: &str,
        vector_store_key: &str,
        facebook_app_id: &str,
    ) -> Result<Self, AppSettingsValidationError> {
        Ok(Self {
            webhook_url: parse_optional_url("webhookUrl", webhook_url)?,
            webhook_secret: Secret::new(webhook_secret.trim()),
            vector_store_url: parse_optional_url("vectorStoreUrl", vector_store_url)?,
            vector_store_key: Secret::new(vector_store_key.trim()),
            facebook_app_id: facebook_app_id.trim().to_owned(),
        })
    }
}

fn parse_optional_url(
    field: &'static str,
    raw: &str,
) -> Result<Option<Url>, AppSettingsValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let url = Url::parse(raw).map_err(|_| AppSettingsValidationError::InvalidUrl { field })?;
    match url.scheme() {
        "http" | "https" => Ok(Some(url)),
        _ => Err(AppSettingsValidationError::InvalidUrl { field }),
    }
}

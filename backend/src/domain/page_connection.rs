//! Facebook Page bindings.

use chrono::{DateTime, Utc};

use crate::domain::identity::IdentityId;
use crate::domain::secret::Secret;

/// Validation errors for page connections.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageConnectionValidationError {
    /// A required field was blank.
    #[error("{field} is required")]
    MissingField {
        /// Name of the blank field.
        field: &'static str,
    },
}

/// Page details chosen by the tenant, before they are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBinding {
    page_id: String,
    page_name: String,
    access_token: Secret,
}

impl PageBinding {
    /// Validate the three required page fields.
    pub fn try_from_parts(
        page_id: &str,
        page_name: &str,
        access_token: &str,
    ) -> Result<Self, PageConnectionValidationError> {
        let page_id = required("pageId", page_id)?;
        let page_name = required("pageName", page_name)?;
        let access_token = required("accessToken", access_token)?;
        Ok(Self {
            page_id,
            page_name,
            access_token: Secret::new(access_token),
        })
    }

    /// Facebook page identifier.
    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    /// Page display name.
    pub fn page_name(&self) -> &str {
        &self.page_name
    }

    /// Page access token.
    pub fn access_token(&self) -> &Secret {
        &self.access_token
    }
}

fn required(field: &'static str, raw: &str) -> Result<String, PageConnectionValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PageConnectionValidationError::MissingField { field });
    }
    Ok(trimmed.to_owned())
}

/// Stored page connection; at most one per tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageConnection {
    /// Owning tenant.
    pub tenant_id: IdentityId,
    /// Bound page.
    pub binding: PageBinding,
    /// When the binding was written.
    pub connected_at: DateTime<Utc>,
}

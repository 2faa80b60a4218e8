//! Query parameters and envelope shared by the paginated list endpoints.

use pagination::PageMeta;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ListNavigation;

/// `?page=&search=` parameters of a list endpoint.
///
/// An omitted `page` keeps the page remembered in the session. A changed
/// `search` resets to the first page.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Zero-based page index.
    pub page: Option<u32>,
    /// Case-insensitive substring filter.
    pub search: Option<String>,
}

impl From<ListParams> for ListNavigation {
    fn from(value: ListParams) -> Self {
        Self {
            page: value.page,
            search: value.search,
        }
    }
}

/// Navigation metadata returned with every page.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMetaResponse {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub page_count: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl From<PageMeta> for PageMetaResponse {
    fn from(value: PageMeta) -> Self {
        Self {
            page: value.page,
            page_size: value.page_size,
            total: value.total,
            page_count: value.page_count,
            has_next: value.has_next,
            has_previous: value.has_previous,
        }
    }
}

/// `?confirm=true` guard of destructive endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConfirmParams {
    /// Must be `true` for the action to run.
    pub confirm: Option<bool>,
}

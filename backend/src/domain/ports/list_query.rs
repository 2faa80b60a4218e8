//! Query shape shared by paginated list ports.

use pagination::{PageRequest, SearchFilter};

/// Page request plus an optional case-insensitive filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Page to fetch.
    pub request: PageRequest,
    /// Substring filter; `None` lists everything.
    pub filter: Option<SearchFilter>,
}

impl ListQuery {
    /// Build a query from its parts.
    pub fn new(request: PageRequest, filter: Option<SearchFilter>) -> Self {
        Self { request, filter }
    }

    /// Same filter, different page.
    #[must_use]
    pub fn with_request(&self, request: PageRequest) -> Self {
        Self {
            request,
            filter: self.filter.clone(),
        }
    }
}

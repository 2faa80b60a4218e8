//! Navigation state for one paginated, searchable list.

use serde::{Deserialize, Serialize};

use crate::filter::SearchFilter;
use crate::request::{PageRequest, PaginationError};

/// Tracks the page index, filter and last known total for a list view.
///
/// ## Invariants
/// - Changing the filter resets the index to zero and forgets the total.
/// - [`ListState::next`] only advances while another page exists for the
///   last recorded total, so an out-of-range page is never requested.
/// - Recording a smaller total clamps the index to the last page.
///
/// # Examples
/// ```
/// use pagination::ListState;
///
/// let mut state = ListState::new(5).expect("valid size");
/// state.record_total(12);
/// assert!(state.next());
/// state.set_filter(Some("acme"));
/// assert_eq!(state.request().index(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredListState", into = "StoredListState")]
pub struct ListState {
    request: PageRequest,
    filter: Option<SearchFilter>,
    total: Option<u64>,
}

impl ListState {
    /// Start on the first page with no filter.
    ///
    /// # Errors
    /// Returns [`PaginationError::InvalidPageSize`] for an out-of-range size.
    pub fn new(size: u32) -> Result<Self, PaginationError> {
        Ok(Self {
            request: PageRequest::first(size)?,
            filter: None,
            total: None,
        })
    }

    /// Request for the current page.
    #[must_use]
    pub const fn request(&self) -> PageRequest {
        self.request
    }

    /// Active filter, if any.
    #[must_use]
    pub const fn filter(&self) -> Option<&SearchFilter> {
        self.filter.as_ref()
    }

    /// Replace the filter. Returns `true` when the filter changed.
    ///
    /// Any change resets the page index to zero.
    pub fn set_filter(&mut self, raw: Option<&str>) -> bool {
        let filter = SearchFilter::parse(raw);
        if filter == self.filter {
            return false;
        }
        self.filter = filter;
        self.total = None;
        self.request = self.page_at(0);
        true
    }

    /// Jump to `index`, clamped to the last page of the recorded total.
    ///
    /// Without a recorded total the index is taken as given.
    pub fn seek(&mut self, index: u32) -> PageRequest {
        let request = self.page_at(index);
        self.request = match self.total {
            Some(total) => request.clamp_to(total),
            None => request,
        };
        self.request
    }

    /// Last total recorded for the current filter.
    #[must_use]
    pub const fn total(&self) -> Option<u64> {
        self.total
    }

    /// Record the exact total returned for the current filter.
    pub fn record_total(&mut self, total: u64) {
        self.total = Some(total);
        self.request = self.request.clamp_to(total);
    }

    /// Whether another page exists after the current one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.total.is_some_and(|total| {
            self.request.offset() + u64::from(self.request.size()) < total
        })
    }

    /// Whether a page exists before the current one.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.request.index() > 0
    }

    /// Advance to the next page. Returns `false` when already on the last page.
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.request = self.page_at(self.request.index() + 1);
        true
    }

    /// Step back one page. Returns `false` when already on the first page.
    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.request = self.page_at(self.request.index() - 1);
        true
    }

    fn page_at(&self, index: u32) -> PageRequest {
        // The size was validated on construction, so rebuilding cannot fail.
        PageRequest::new(index, self.request.size()).unwrap_or(self.request)
    }
}

/// Serialised form of [`ListState`], suitable for session storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredListState {
    index: u32,
    size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total: Option<u64>,
}

impl From<ListState> for StoredListState {
    fn from(state: ListState) -> Self {
        Self {
            index: state.request.index(),
            size: state.request.size(),
            filter: state.filter.map(|filter| filter.as_str().to_owned()),
            total: state.total,
        }
    }
}

impl TryFrom<StoredListState> for ListState {
    type Error = PaginationError;

    fn try_from(stored: StoredListState) -> Result<Self, Self::Error> {
        Ok(Self {
            request: PageRequest::new(stored.index, stored.size)?,
            filter: SearchFilter::parse(stored.filter.as_deref()),
            total: stored.total,
        })
    }
}

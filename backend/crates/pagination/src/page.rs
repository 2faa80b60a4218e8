//! A single page of rows plus the exact filtered total.

use serde::Serialize;

use crate::request::{PageRequest, page_count};

/// Rows of one page together with the total number of matching rows.
///
/// # Examples
/// ```
/// use pagination::{Page, PageRequest};
///
/// let request = PageRequest::first(5).expect("valid size");
/// let page = Page::new(vec!["a", "b", "c"], 3, request);
/// assert!(!page.has_next());
/// assert_eq!(page.page_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    rows: Vec<T>,
    total: u64,
    request: PageRequest,
}

impl<T> Page<T> {
    /// Pair rows with the exact total and the request that produced them.
    #[must_use]
    pub const fn new(rows: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            rows,
            total,
            request,
        }
    }

    /// Rows on this page.
    #[must_use]
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Consume the page and return its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<T> {
        self.rows
    }

    /// Exact number of rows matching the filter across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Request that produced this page.
    #[must_use]
    pub const fn request(&self) -> PageRequest {
        self.request
    }

    /// Number of pages available for the total.
    #[must_use]
    pub fn page_count(&self) -> u64 {
        page_count(self.total, self.request.size())
    }

    /// Whether another page follows this one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.request.offset() + u64::from(self.request.size()) < self.total
    }

    /// Whether a page precedes this one.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.request.index() > 0
    }

    /// Clamped request to re-issue when this page lies past the last one.
    ///
    /// Returns `None` when the request was already in range.
    ///
    /// # Examples
    /// ```
    /// use pagination::{Page, PageRequest};
    ///
    /// let request = PageRequest::new(2, 5).expect("valid size");
    /// let page: Page<u32> = Page::new(Vec::new(), 3, request);
    /// assert_eq!(page.overshoot().map(|r| r.index()), Some(0));
    /// ```
    #[must_use]
    pub fn overshoot(&self) -> Option<PageRequest> {
        let clamped = self.request.clamp_to(self.total);
        (clamped != self.request).then_some(clamped)
    }

    /// Navigation metadata for transport envelopes.
    #[must_use]
    pub fn meta(&self) -> PageMeta {
        PageMeta {
            page: self.request.index(),
            page_size: self.request.size(),
            total: self.total,
            page_count: self.page_count(),
            has_next: self.has_next(),
            has_previous: self.has_previous(),
        }
    }

    /// Transform every row while keeping the totals.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            rows: self.rows.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }
}

/// Serialisable navigation metadata for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Zero-based index of the page.
    pub page: u32,
    /// Number of rows per page.
    pub page_size: u32,
    /// Exact number of matching rows.
    pub total: u64,
    /// Number of pages available.
    pub page_count: u64,
    /// Whether a "next" control should be enabled.
    pub has_next: bool,
    /// Whether a "previous" control should be enabled.
    pub has_previous: bool,
}

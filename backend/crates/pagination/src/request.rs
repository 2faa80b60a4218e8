//! Page request validation and offset arithmetic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest page size accepted by [`PageRequest::new`].
pub const MAX_PAGE_SIZE: u32 = 100;

/// Errors raised while building a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// The requested page size was zero or above [`MAX_PAGE_SIZE`].
    #[error("page size must be between 1 and {max}, got {size}")]
    InvalidPageSize {
        /// Size supplied by the caller.
        size: u32,
        /// Upper bound enforced by the crate.
        max: u32,
    },
}

/// Zero-based page index paired with a fixed page size.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(2, 5).expect("valid size");
/// assert_eq!(request.offset(), 10);
/// assert_eq!(request.limit(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    index: u32,
    size: u32,
}

impl PageRequest {
    /// Build a request, rejecting page sizes outside `1..=MAX_PAGE_SIZE`.
    ///
    /// # Errors
    /// Returns [`PaginationError::InvalidPageSize`] for an out-of-range size.
    pub const fn new(index: u32, size: u32) -> Result<Self, PaginationError> {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(PaginationError::InvalidPageSize {
                size,
                max: MAX_PAGE_SIZE,
            });
        }
        Ok(Self { index, size })
    }

    /// First page for the given size.
    ///
    /// # Errors
    /// Returns [`PaginationError::InvalidPageSize`] for an out-of-range size.
    pub const fn first(size: u32) -> Result<Self, PaginationError> {
        Self::new(0, size)
    }

    /// Zero-based page index.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Number of rows per page.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Row offset of the first row on this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.index) * u64::from(self.size)
    }

    /// Maximum number of rows on this page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.size
    }

    /// Clamp the index to the last page that exists for `total` rows.
    ///
    /// An empty result set clamps to the first page.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let request = PageRequest::new(2, 5).expect("valid size");
    /// assert_eq!(request.clamp_to(3).index(), 0);
    /// assert_eq!(request.clamp_to(12).index(), 2);
    /// ```
    #[must_use]
    pub fn clamp_to(self, total: u64) -> Self {
        let last = page_count(total, self.size).saturating_sub(1);
        let index = u64::from(self.index).min(last);
        Self {
            index: u32::try_from(index).unwrap_or(u32::MAX),
            size: self.size,
        }
    }
}

/// Number of pages needed to show `total` rows at `size` rows per page.
///
/// A zero size yields zero pages.
#[must_use]
pub fn page_count(total: u64, size: u32) -> u64 {
    if size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(size))
}

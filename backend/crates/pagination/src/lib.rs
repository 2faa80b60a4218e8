//! Offset pagination primitives shared by ModeraFlow list endpoints.
//!
//! List views page through rows in descending creation order using a
//! zero-based page index and a fixed page size. This crate keeps the
//! arithmetic in one place:
//!
//! - [`PageRequest`] validates the page size and derives `offset`/`limit`.
//! - [`SearchFilter`] normalises an optional case-insensitive substring
//!   filter.
//! - [`Page`] pairs the rows of one page with the exact filtered total and
//!   answers navigation questions (`has_next`, `page_count`).
//! - [`ListState`] tracks navigation for one list so a filter change always
//!   resets the page index and "next" never reaches past the last page.

mod filter;
mod page;
mod request;
mod state;

pub use filter::SearchFilter;
pub use page::{Page, PageMeta};
pub use request::{MAX_PAGE_SIZE, PageRequest, PaginationError, page_count};
pub use state::ListState;

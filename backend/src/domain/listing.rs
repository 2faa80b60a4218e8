//! Shared list/search/paginate flow for tenant and catalog lists.
//!
//! The caller's [`ListState`] survives between requests. A filter change
//! resets the page index; a known total clamps the requested index before
//! the store is queried. Should the total shrink between requests, the page
//! is fetched once more at the clamped index.

use std::future::Future;

use pagination::{ListState, Page};

use crate::domain::ports::ListQuery;

/// Rows per page on the tenant administration list.
pub const TENANT_PAGE_SIZE: u32 = 5;
/// Rows per page on the catalog list.
pub const CATALOG_PAGE_SIZE: u32 = 20;

/// Navigation requested by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListNavigation {
    /// Zero-based page index; `None` keeps the current page.
    pub page: Option<u32>,
    /// Raw search term; blank means no filter.
    pub search: Option<String>,
}

impl ListNavigation {
    /// Apply the navigation to `state`.
    ///
    /// A changed filter wins over the requested page and resets to zero.
    pub fn apply(&self, state: &mut ListState) {
        let filter_changed = state.set_filter(self.search.as_deref());
        if filter_changed {
            return;
        }
        if let Some(page) = self.page {
            state.seek(page);
        }
    }
}

/// Fetch the current page for `state`, clamping when it overshoots.
///
/// Records the exact total on the state before returning.
pub async fn fetch_page<T, E, F, Fut>(state: &mut ListState, mut fetch: F) -> Result<Page<T>, E>
where
    F: FnMut(ListQuery) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    let query = ListQuery::new(state.request(), state.filter().cloned());
    let mut page = fetch(query.clone()).await?;
    if let Some(clamped) = page.overshoot() {
        page = fetch(query.with_request(clamped)).await?;
    }
    state.record_total(page.total());
    Ok(page)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the shared list flow.
    use super::*;
    use pagination::SearchFilter;
    use rstest::{fixture, rstest};
    use std::convert::Infallible;

    fn names() -> Vec<String> {
        let mut names: Vec<String> = (0..9).map(|n| format!("Org {n}")).collect();
        names.extend(["Acme One", "Acme Two", "Acme Three"].map(str::to_owned));
        names
    }

    async fn in_memory(query: ListQuery) -> Result<Page<String>, Infallible> {
        let matching: Vec<String> = names()
            .into_iter()
            .filter(|name| query.filter.as_ref().is_none_or(|f| f.matches(name)))
            .collect();
        let total = matching.len() as u64;
        let rows = matching
            .into_iter()
            .skip(usize::try_from(query.request.offset()).unwrap_or(usize::MAX))
            .take(query.request.limit() as usize)
            .collect();
        Ok(Page::new(rows, total, query.request))
    }

    #[fixture]
    fn state() -> ListState {
        ListState::new(TENANT_PAGE_SIZE).expect("valid size")
    }

    #[rstest]
    #[tokio::test]
    async fn filter_narrowing_disables_next(mut state: ListState) {
        let page = fetch_page(&mut state, in_memory).await.expect("page");
        assert_eq!(page.total(), 12);
        assert!(page.has_next());

        ListNavigation {
            page: Some(2),
            search: Some("acme".into()),
        }
        .apply(&mut state);
        let page = fetch_page(&mut state, in_memory).await.expect("page");

        assert_eq!(page.total(), 3);
        assert_eq!(page.request().index(), 0);
        assert!(!page.has_next());
        assert_eq!(state.filter(), SearchFilter::parse(Some("acme")).as_ref());
    }

    #[rstest]
    #[tokio::test]
    async fn out_of_range_index_clamps_after_filtering(mut state: ListState) {
        ListNavigation {
            page: None,
            search: Some("acme".into()),
        }
        .apply(&mut state);
        fetch_page(&mut state, in_memory).await.expect("page");

        ListNavigation {
            page: Some(2),
            search: Some("acme".into()),
        }
        .apply(&mut state);

        assert_eq!(state.request().index(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_total_overshoot_is_refetched(mut state: ListState) {
        ListNavigation {
            page: Some(9),
            search: None,
        }
        .apply(&mut state);
        let page = fetch_page(&mut state, in_memory).await.expect("page");

        assert_eq!(page.request().index(), 2);
        assert_eq!(page.rows().len(), 2);
        assert_eq!(state.request().index(), 2);
    }
}

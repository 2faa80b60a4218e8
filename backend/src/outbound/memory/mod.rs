//! In-memory adapters for local development and tests.
//!
//! Each table sits behind a mutex and enforces the same uniqueness and
//! ownership rules as the hosted store. Nothing survives a restart.

mod identities;
mod pages;
mod products;
mod settings;
mod tenants;

pub use identities::InMemoryIdentityProvider;
pub use pages::InMemoryPageConnectionRepository;
pub use products::InMemoryProductRepository;
pub use settings::InMemoryAppSettingsRepository;
pub use tenants::InMemoryTenantRepository;

use pagination::{Page, PageRequest};

/// Slice one page out of rows already sorted newest first.
fn paginate<T>(rows: Vec<T>, request: PageRequest) -> Page<T> {
    let total = rows.len() as u64;
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let rows = rows
        .into_iter()
        .skip(offset)
        .take(request.limit() as usize)
        .collect();
    Page::new(rows, total, request)
}

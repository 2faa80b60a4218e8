//! ModeraFlow backend library.
//!
//! Tenant identity reconciliation, role-gated administration and the
//! owner-scoped catalog, settings and moderation features, exposed over
//! actix-web.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;

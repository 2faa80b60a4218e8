//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of domain port traits:
//!
//! - **baas**: hosted PostgREST tables and auth API over reqwest
//! - **completion**: language-model completion endpoint over reqwest
//! - **memory**: mutex-guarded tables for local development and tests
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod baas;
pub mod completion;
pub mod memory;

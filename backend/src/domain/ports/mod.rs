//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod app_settings_repository;
mod auth_gateway;
mod identity_metadata_writer;
mod list_query;
mod moderation_completion;
mod page_connection_repository;
mod product_repository;
mod tenant_repository;

#[cfg(test)]
pub use app_settings_repository::MockAppSettingsRepository;
pub use app_settings_repository::{AppSettingsRepository, AppSettingsRepositoryError};
#[cfg(test)]
pub use auth_gateway::MockAuthGateway;
pub use auth_gateway::{AuthGateway, AuthGatewayError};
#[cfg(test)]
pub use identity_metadata_writer::MockIdentityMetadataWriter;
pub use identity_metadata_writer::{IdentityMetadataError, IdentityMetadataWriter};
pub use list_query::ListQuery;
#[cfg(test)]
pub use moderation_completion::MockModerationCompletion;
pub use moderation_completion::{ModerationCompletion, ModerationCompletionError};
#[cfg(test)]
pub use page_connection_repository::MockPageConnectionRepository;
pub use page_connection_repository::{PageConnectionRepository, PageConnectionRepositoryError};
#[cfg(test)]
pub use product_repository::MockProductRepository;
pub use product_repository::{ProductRepository, ProductRepositoryError};
#[cfg(test)]
pub use tenant_repository::MockTenantRepository;
pub use tenant_repository::{TenantRepository, TenantRepositoryError};

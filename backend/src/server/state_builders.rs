//! Builders for the HTTP state ports.
//!
//! A configured BaaS project backs every store and the session source.
//! Without one, the in-memory adapters stand in so the server still runs
//! locally; nothing they hold survives a restart.

use std::sync::Arc;

use tracing::{info, warn};

use moderaflow::inbound::http::state::HttpStatePorts;
use moderaflow::outbound::baas::{
    BaasAppSettingsRepository, BaasAuthGateway, BaasClient, BaasConfig,
    BaasPageConnectionRepository, BaasProductRepository, BaasTenantRepository,
};
use moderaflow::outbound::completion::{CompletionClientBuildError, GeminiCompletionClient};
use moderaflow::outbound::memory::{
    InMemoryAppSettingsRepository, InMemoryIdentityProvider, InMemoryPageConnectionRepository,
    InMemoryProductRepository, InMemoryTenantRepository,
};

use super::config::{ServiceSettings, SettingsError};

/// Failure to assemble the outbound adapters.
#[derive(Debug, thiserror::Error)]
pub enum StateBuildError {
    /// A setting was malformed.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// The BaaS HTTP client could not be built.
    #[error("failed to build BaaS client: {0}")]
    Baas(#[from] reqwest::Error),
    /// The completion client could not be built.
    #[error(transparent)]
    Completion(#[from] CompletionClientBuildError),
}

/// Build the ports for `settings`.
pub fn build_ports(settings: &ServiceSettings) -> Result<HttpStatePorts, StateBuildError> {
    let completion = Arc::new(GeminiCompletionClient::new(settings.completion_config()?)?);
    let ports = match settings.baas_config()? {
        Some(config) => baas_ports(config, completion)?,
        None => {
            warn!("no BaaS URL configured; using in-memory stores that reset on restart");
            memory_ports(completion)
        }
    };
    Ok(ports)
}

fn baas_ports(
    config: BaasConfig,
    completion: Arc<GeminiCompletionClient>,
) -> Result<HttpStatePorts, StateBuildError> {
    info!(base_url = %config.base_url, "using hosted BaaS stores");
    let client = Arc::new(BaasClient::new(config)?);
    let auth = Arc::new(BaasAuthGateway::new(Arc::clone(&client)));
    Ok(HttpStatePorts {
        auth: auth.clone(),
        metadata: auth,
        tenants: Arc::new(BaasTenantRepository::new(Arc::clone(&client))),
        products: Arc::new(BaasProductRepository::new(Arc::clone(&client))),
        settings: Arc::new(BaasAppSettingsRepository::new(Arc::clone(&client))),
        pages: Arc::new(BaasPageConnectionRepository::new(client)),
        completion,
    })
}

fn memory_ports(completion: Arc<GeminiCompletionClient>) -> HttpStatePorts {
    let identities = Arc::new(InMemoryIdentityProvider::default());
    HttpStatePorts {
        auth: identities.clone(),
        metadata: identities,
        tenants: Arc::new(InMemoryTenantRepository::default()),
        products: Arc::new(InMemoryProductRepository::default()),
        settings: Arc::new(InMemoryAppSettingsRepository::default()),
        pages: Arc::new(InMemoryPageConnectionRepository::default()),
        completion,
    }
}

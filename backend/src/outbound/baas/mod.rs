//! Hosted BaaS outbound adapters.
//!
//! One shared [`BaasClient`] talks to the PostgREST tables and the auth API.
//! Each table gets a thin adapter implementing its repository port.

mod auth;
mod client;
mod dto;
mod pages;
mod products;
mod settings;
mod tenants;
#[cfg(test)]
mod test_server;

pub use auth::BaasAuthGateway;
pub use client::{BaasClient, BaasConfig};
pub use pages::BaasPageConnectionRepository;
pub use products::BaasProductRepository;
pub use settings::BaasAppSettingsRepository;
pub use tenants::BaasTenantRepository;

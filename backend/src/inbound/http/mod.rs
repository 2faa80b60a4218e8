//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod auth;
pub mod error;
pub mod health;
pub mod listing;
pub mod me;
pub mod moderation;
pub mod pages;
pub mod products;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod sessions;
pub mod state;
pub mod tenants;
#[cfg(test)]
pub mod test_utils;
pub mod validation;
pub mod workspace;

pub use error::ApiResult;

/// Register every API handler; mounted by the server under `/api/v1`.
///
/// The handlers expect [`state::HttpState`] as app data and a session
/// middleware wrapping the app.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(sessions::signup)
        .service(sessions::login)
        .service(sessions::logout)
        .service(sessions::reload_session)
        .service(me::current_identity)
        .service(me::change_password)
        .service(tenants::list_tenants)
        .service(tenants::update_tenant)
        .service(tenants::delete_tenant)
        .service(products::list_products)
        .service(products::create_product)
        .service(products::import_products)
        .service(products::update_product)
        .service(products::delete_product)
        .service(workspace::get_workspace)
        .service(workspace::save_workspace)
        .service(pages::current_connection)
        .service(pages::connect_page)
        .service(pages::disconnect_page)
        .service(moderation::preview);
}

//! Service settings loaded via OrthoConfig, and the server configuration
//! derived from them.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use moderaflow::domain::Secret;
use moderaflow::inbound::http::session_config::{SessionSettings, SessionToggles};
use moderaflow::inbound::http::state::HttpStatePorts;
use moderaflow::outbound::baas::BaasConfig;
use moderaflow::outbound::completion::{
    CompletionConfig, DEFAULT_COMPLETION_ENDPOINT, DEFAULT_COMPLETION_MODEL,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Operator-facing settings, layered from CLI flags, `MODERAFLOW_*`
/// environment variables and config files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MODERAFLOW")]
pub struct ServiceSettings {
    /// Listen address, `0.0.0.0:8080` by default.
    pub bind_addr: Option<String>,
    /// BaaS project URL; the in-memory adapters are used when absent.
    pub baas_url: Option<String>,
    /// Public anonymous BaaS key.
    pub baas_anon_key: Option<String>,
    /// Service role key used for table access and admin metadata writes.
    pub baas_service_key: Option<String>,
    /// API key of the completion provider.
    pub completion_api_key: Option<String>,
    /// Completion model name.
    pub completion_model: Option<String>,
    /// Completion API base URL.
    pub completion_endpoint: Option<String>,
    /// Timeout applied to every outbound HTTP call.
    pub http_timeout_secs: Option<u64>,
    /// Path of the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Whether session cookies are marked `Secure`.
    pub session_cookie_secure: Option<bool>,
    /// `Strict`, `Lax` or `None`.
    pub session_same_site: Option<String>,
    /// Permit a generated session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
}

/// Settings that parse but do not describe a usable service.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// An address setting is not `host:port`.
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// A URL setting failed to parse.
    #[error("invalid {field} '{value}': {source}")]
    Url {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
    /// A BaaS URL was given without the anonymous key.
    #[error("baas_anon_key is required when baas_url is set")]
    MissingAnonKey,
    /// A BaaS URL was given without the service role key.
    #[error("baas_service_key is required when baas_url is set")]
    MissingServiceKey,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|source| SettingsError::Url {
        field,
        value: value.to_owned(),
        source,
    })
}

impl ServiceSettings {
    /// Listen address, falling back to the default.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = non_blank(self.bind_addr.as_deref()).unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Outbound HTTP timeout.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS))
    }

    /// Raw session toggles for validation.
    pub fn session_toggles(&self) -> SessionToggles {
        SessionToggles {
            key_file: self.session_key_file.clone(),
            cookie_secure: self.session_cookie_secure,
            same_site: self.session_same_site.clone(),
            allow_ephemeral: self.session_allow_ephemeral,
        }
    }

    /// BaaS connection settings, or `None` when no project URL is set.
    pub fn baas_config(&self) -> Result<Option<BaasConfig>, SettingsError> {
        let Some(raw_url) = non_blank(self.baas_url.as_deref()) else {
            return Ok(None);
        };
        let base_url = parse_url("baas_url", raw_url)?;
        let anon_key =
            non_blank(self.baas_anon_key.as_deref()).ok_or(SettingsError::MissingAnonKey)?;
        let service_key = non_blank(self.baas_service_key.as_deref())
            .ok_or(SettingsError::MissingServiceKey)?;
        Ok(Some(BaasConfig {
            base_url,
            anon_key: Secret::new(anon_key),
            service_key: Secret::new(service_key),
            timeout: self.http_timeout(),
        }))
    }

    /// Completion endpoint settings; the API key may be absent.
    pub fn completion_config(&self) -> Result<CompletionConfig, SettingsError> {
        let endpoint = non_blank(self.completion_endpoint.as_deref())
            .unwrap_or(DEFAULT_COMPLETION_ENDPOINT);
        Ok(CompletionConfig {
            endpoint: parse_url("completion_endpoint", endpoint)?,
            model: non_blank(self.completion_model.as_deref())
                .unwrap_or(DEFAULT_COMPLETION_MODEL)
                .to_owned(),
            api_key: non_blank(self.completion_api_key.as_deref()).map(Secret::new),
            timeout: self.http_timeout(),
        })
    }
}

/// Everything needed to start the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) ports: HttpStatePorts,
}

impl ServerConfig {
    /// Bundle validated session settings, the listen address and the ports.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, ports: HttpStatePorts) -> Self {
        Self {
            session,
            bind_addr,
            ports,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for service settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 6] = [
        "MODERAFLOW_BIND_ADDR",
        "MODERAFLOW_BAAS_URL",
        "MODERAFLOW_BAAS_ANON_KEY",
        "MODERAFLOW_BAAS_SERVICE_KEY",
        "MODERAFLOW_HTTP_TIMEOUT_SECS",
        "MODERAFLOW_SESSION_ALLOW_EPHEMERAL",
    ];

    fn load_with(overrides: &[(&str, &str)]) -> ServiceSettings {
        let vars = VARS.map(|name| {
            let value = overrides
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned());
            (name, value)
        });
        let _guard = lock_env(vars);
        ServiceSettings::load_from_iter([OsString::from("moderaflow")])
            .expect("settings should load")
    }

    #[rstest]
    fn defaults_select_in_memory_adapters() {
        let settings = load_with(&[]);
        assert_eq!(
            settings.bind_addr().expect("default address"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("literal address")
        );
        assert_eq!(settings.http_timeout(), Duration::from_secs(30));
        assert!(settings.baas_config().expect("no baas").is_none());
        assert!(!settings.session_toggles().allow_ephemeral);
    }

    #[rstest]
    fn environment_configures_the_baas() {
        let settings = load_with(&[
            ("MODERAFLOW_BAAS_URL", "https://project.example.co"),
            ("MODERAFLOW_BAAS_ANON_KEY", "anon"),
            ("MODERAFLOW_BAAS_SERVICE_KEY", "service"),
            ("MODERAFLOW_HTTP_TIMEOUT_SECS", "5"),
            ("MODERAFLOW_SESSION_ALLOW_EPHEMERAL", "true"),
        ]);

        let baas = settings
            .baas_config()
            .expect("valid baas settings")
            .expect("baas configured");
        assert_eq!(baas.base_url.as_str(), "https://project.example.co/");
        assert_eq!(baas.anon_key.expose(), "anon");
        assert_eq!(baas.service_key.expose(), "service");
        assert_eq!(baas.timeout, Duration::from_secs(5));
        assert!(settings.session_toggles().allow_ephemeral);
    }

    #[rstest]
    fn baas_url_without_anon_key_is_rejected() {
        let settings = load_with(&[("MODERAFLOW_BAAS_URL", "https://project.example.co")]);
        assert!(matches!(
            settings.baas_config(),
            Err(SettingsError::MissingAnonKey)
        ));
    }

    #[rstest]
    fn baas_url_without_service_key_is_rejected() {
        let settings = load_with(&[
            ("MODERAFLOW_BAAS_URL", "https://project.example.co"),
            ("MODERAFLOW_BAAS_ANON_KEY", "anon"),
        ]);
        assert!(matches!(
            settings.baas_config(),
            Err(SettingsError::MissingServiceKey)
        ));
    }

    #[rstest]
    #[case("not-an-address")]
    #[case("localhost")]
    fn bad_bind_addresses_are_rejected(#[case] value: &str) {
        let settings = load_with(&[("MODERAFLOW_BIND_ADDR", value)]);
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
    }

    #[rstest]
    fn completion_defaults_apply() {
        let settings = load_with(&[]);
        let completion = settings.completion_config().expect("default endpoint");
        assert_eq!(completion.model, DEFAULT_COMPLETION_MODEL);
        assert_eq!(completion.endpoint.as_str(), DEFAULT_COMPLETION_ENDPOINT);
    }
}

//! Shared reqwest client for the hosted BaaS REST and auth APIs.
//!
//! The client owns transport details only: URL building, key headers,
//! timeout and status mapping, and the exact-count header. Each table
//! adapter turns a [`BaasFailure`] into its own port error.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_RANGE, HeaderMap};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::Secret;

const API_KEY_HEADER: &str = "apikey";
pub(super) const PREFER_HEADER: &str = "Prefer";
const UNIQUE_VIOLATION_CODE: &str = "23505";
const INSUFFICIENT_PRIVILEGE_CODE: &str = "42501";

/// Connection settings for the hosted BaaS.
#[derive(Debug, Clone)]
pub struct BaasConfig {
    /// Project URL, for example `https://project.supabase.co`.
    pub base_url: Url,
    /// Public anonymous key sent as `apikey` on every call.
    pub anon_key: Secret,
    /// Service role key for table access and admin metadata writes.
    pub service_key: Secret,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Failure category shared by every BaaS-backed adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FailureKind {
    AccessDenied,
    InvalidCredentials,
    UniqueViolation,
    Rejected,
    SchemaMismatch,
    Transient,
    Query,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct BaasFailure {
    pub(super) kind: FailureKind,
    pub(super) message: String,
}

impl BaasFailure {
    pub(super) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(super) fn schema(message: impl Into<String>) -> Self {
        Self::new(FailureKind::SchemaMismatch, message)
    }
}

/// Successful response body plus the headers the adapters read.
pub(super) struct BaasResponse {
    body: Vec<u8>,
    headers: HeaderMap,
}

impl BaasResponse {
    pub(super) fn json<T: DeserializeOwned>(&self) -> Result<T, BaasFailure> {
        serde_json::from_slice(&self.body)
            .map_err(|err| BaasFailure::schema(format!("invalid JSON payload: {err}")))
    }

    /// Exact row count from `Content-Range: 0-4/12`.
    pub(super) fn exact_total(&self) -> Result<u64, BaasFailure> {
        self.headers
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range)
            .ok_or_else(|| BaasFailure::schema("response carried no exact row count"))
    }
}

/// Reqwest client bound to one BaaS project.
pub struct BaasClient {
    http: Client,
    base_url: Url,
    anon_key: Secret,
    service_key: Secret,
}

impl BaasClient {
    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: BaasConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.timeout).build()?;
        let mut base_url = config.base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http,
            base_url,
            anon_key: config.anon_key,
            service_key: config.service_key,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BaasFailure> {
        self.base_url.join(path).map_err(|err| {
            BaasFailure::new(FailureKind::Query, format!("bad endpoint {path}: {err}"))
        })
    }

    fn request(&self, method: Method, url: Url, bearer: &Secret) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(API_KEY_HEADER, self.anon_key.expose())
            .header(AUTHORIZATION, format!("Bearer {}", bearer.expose()))
    }

    /// Request against a PostgREST table with the service key.
    ///
    /// Row policies are bypassed, so every adapter filters by owner itself.
    pub(super) fn table(&self, method: Method, table: &str) -> Result<RequestBuilder, BaasFailure> {
        let url = self.endpoint(&format!("rest/v1/{table}"))?;
        Ok(self.request(method, url, &self.service_key))
    }

    /// Request against the auth API on behalf of a session, or anonymously.
    pub(super) fn auth(
        &self,
        method: Method,
        path: &str,
        session: Option<&Secret>,
    ) -> Result<RequestBuilder, BaasFailure> {
        let url = self.endpoint(&format!("auth/v1/{path}"))?;
        Ok(self.request(method, url, session.unwrap_or(&self.anon_key)))
    }

    /// Request against the auth admin API.
    pub(super) fn admin(&self, method: Method, path: &str) -> Result<RequestBuilder, BaasFailure> {
        let url = self.endpoint(&format!("auth/v1/admin/{path}"))?;
        Ok(self.request(method, url, &self.service_key))
    }
}

/// Send a request and map non-success statuses.
pub(super) async fn send(request: RequestBuilder) -> Result<BaasResponse, BaasFailure> {
    let response = request.send().await.map_err(map_transport_error)?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(map_status_error(status, body.as_ref()));
    }
    Ok(BaasResponse {
        body: body.to_vec(),
        headers,
    })
}

fn parse_content_range(raw: &str) -> Option<u64> {
    let (_, total) = raw.rsplit_once('/')?;
    total.trim().parse().ok()
}

/// Quote a value for use inside a PostgREST `or=(...)` list.
pub(super) fn quote_filter_value(raw: &str) -> String {
    format!("\"{}\"", raw.replace('\\', r"\\").replace('"', "\\\""))
}

fn map_transport_error(error: reqwest::Error) -> BaasFailure {
    if error.is_timeout() || error.is_connect() {
        BaasFailure::new(FailureKind::Transient, error.to_string())
    } else {
        BaasFailure::new(FailureKind::Query, error.to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBodyDto {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
}

impl ErrorBodyDto {
    fn sql_state(&self) -> Option<&str> {
        self.code.as_ref().and_then(serde_json::Value::as_str)
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> BaasFailure {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };
    let parsed: ErrorBodyDto = serde_json::from_slice(body).unwrap_or_default();

    let kind = match (status, parsed.sql_state(), parsed.error_code.as_deref()) {
        (_, Some(UNIQUE_VIOLATION_CODE), _)
        | (StatusCode::CONFLICT, _, _)
        | (_, _, Some("user_already_exists" | "email_exists")) => FailureKind::UniqueViolation,
        (_, Some(INSUFFICIENT_PRIVILEGE_CODE), _) | (StatusCode::FORBIDDEN, _, _) => {
            FailureKind::AccessDenied
        }
        (StatusCode::UNAUTHORIZED, _, _) | (_, _, Some("invalid_credentials")) => {
            FailureKind::InvalidCredentials
        }
        _ if parsed.error.as_deref() == Some("invalid_grant") => FailureKind::InvalidCredentials,
        (
            StatusCode::TOO_MANY_REQUESTS
            | StatusCode::REQUEST_TIMEOUT
            | StatusCode::GATEWAY_TIMEOUT
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE,
            _,
            _,
        ) => FailureKind::Transient,
        _ if status.is_client_error() => FailureKind::Rejected,
        _ if status.is_server_error() => FailureKind::Transient,
        _ => FailureKind::Query,
    };
    BaasFailure::new(kind, message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

//! Reqwest-backed moderation completion adapter.
//!
//! This adapter owns transport details only: request serialisation, API key
//! handling, timeout and status mapping, and decoding the structured reply.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::{GenerateContentDto, GenerateContentResponseDto};
use crate::domain::ports::{ModerationCompletion, ModerationCompletionError};
use crate::domain::{ModerationPreview, ModerationRequest, Secret};

/// Model used when none is configured.
pub const DEFAULT_COMPLETION_MODEL: &str = "gemini-2.5-flash";
/// Public endpoint used when none is configured.
pub const DEFAULT_COMPLETION_ENDPOINT: &str = "https://generativelanguage.googleapis.com/";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Settings for the completion endpoint.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Base URL of the API.
    pub endpoint: Url,
    /// Model name, for example `gemini-2.5-flash`.
    pub model: String,
    /// API key; calls fail with a credentials error while it is absent.
    pub api_key: Option<Secret>,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Completion adapter posting to `models/{model}:generateContent`.
pub struct GeminiCompletionClient {
    client: Client,
    url: Url,
    api_key: Option<Secret>,
}

impl GeminiCompletionClient {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// endpoint cannot carry the model path.
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionClientBuildError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        let url = config
            .endpoint
            .join(&format!("v1beta/models/{}:generateContent", config.model))?;
        Ok(Self {
            client,
            url,
            api_key: config.api_key.filter(|key| !key.is_blank()),
        })
    }
}

/// Failure to construct the completion adapter.
#[derive(Debug, thiserror::Error)]
pub enum CompletionClientBuildError {
    /// The reqwest client could not be built.
    #[error("failed to build completion HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    /// The endpoint and model did not form a valid URL.
    #[error("invalid completion endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

#[async_trait]
impl ModerationCompletion for GeminiCompletionClient {
    async fn complete(
        &self,
        request: &ModerationRequest,
    ) -> Result<ModerationPreview, ModerationCompletionError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| ModerationCompletionError::credentials("API key not found"))?;
        let prompt = request.prompt();
        let response = self
            .client
            .post(self.url.clone())
            .header(API_KEY_HEADER, api_key.expose())
            .json(&GenerateContentDto::new(&prompt))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_preview(body.as_ref())
    }
}

fn parse_preview(body: &[u8]) -> Result<ModerationPreview, ModerationCompletionError> {
    let decoded: GenerateContentResponseDto = serde_json::from_slice(body).map_err(|err| {
        ModerationCompletionError::upstream(format!("invalid completion payload: {err}"))
    })?;
    decoded
        .into_preview()
        .map_err(ModerationCompletionError::upstream)
}

fn map_transport_error(error: reqwest::Error) -> ModerationCompletionError {
    if error.is_timeout() || error.is_connect() {
        ModerationCompletionError::transient(error.to_string())
    } else {
        ModerationCompletionError::upstream(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ModerationCompletionError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ModerationCompletionError::credentials(message)
        }
        StatusCode::BAD_REQUEST if preview.contains("API_KEY_INVALID") => {
            ModerationCompletionError::credentials(message)
        }
        StatusCode::TOO_MANY_REQUESTS => ModerationCompletionError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT
        | StatusCode::GATEWAY_TIMEOUT
        | StatusCode::SERVICE_UNAVAILABLE => ModerationCompletionError::transient(message),
        _ => ModerationCompletionError::upstream(message),
    }
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

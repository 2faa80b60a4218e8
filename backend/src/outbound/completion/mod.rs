//! Language-model completion adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `ModerationCompletion` port.

mod dto;
mod http_client;

pub use http_client::{
    CompletionClientBuildError, CompletionConfig, DEFAULT_COMPLETION_ENDPOINT,
    DEFAULT_COMPLETION_MODEL, GeminiCompletionClient,
};

// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider capability trait for model backends (OpenAI-style, Anthropic-style, mock).

use async_trait::async_trait;

use crate::error::TokenhubError;
use crate::types::{Request, Response};

/// Capability exposed by a model backend.
///
/// The routing engine never mutates the caller's [`Request`]; the model it
/// resolved is passed alongside it.
#[async_trait]
pub trait ModelProvider: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Sends a chat request to `model` and returns the full response.
    async fn call(&self, model: &str, request: &Request) -> Result<Response, TokenhubError>;

    /// Lists the model identifiers this backend can serve.
    async fn list_available_models(&self) -> Result<Vec<String>, TokenhubError>;

    /// Checks whether the configured credential is usable.
    async fn validate_credential(&self) -> bool;
}

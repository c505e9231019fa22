// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Tokenhub.

use strum::Display;
use thiserror::Error;

/// The primary error type used by the routing and orchestration engines and
/// by every provider adapter.
#[derive(Debug, Error)]
pub enum TokenhubError {
    /// Configuration errors (invalid TOML, inconsistent catalog, bad defaults).
    #[error("configuration error: {0}")]
    Config(String),

    /// A request violated a structural invariant (e.g. no messages).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No catalog entry satisfies the policy's cost/context constraints.
    #[error("no model satisfies routing constraints (required context {required_context} tokens, max cost {})", format_cost(.max_cost))]
    ModelNotFound {
        required_context: u64,
        max_cost: Option<f64>,
    },

    /// The selected model's provider has no registered capability.
    #[error("provider `{provider}` not found")]
    ProviderNotFound { provider: String },

    /// Raised by a provider adapter itself (API failure, bad credential, etc.).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A provider invocation made by the routing engine failed.
    #[error("provider `{provider}` failed for model `{model}`")]
    ProviderCallFailed {
        provider: String,
        model: String,
        #[source]
        source: Box<TokenhubError>,
    },

    /// A provider call failed, escalation was allowed, but no higher-tier
    /// candidate exists. Carries the original failure.
    #[error("no escalation path from model `{model}`: {source}")]
    EscalationExhausted {
        model: String,
        #[source]
        source: Box<TokenhubError>,
    },

    /// An orchestration mode tag is not one of the recognized values.
    #[error("unknown orchestration mode `{0}`")]
    UnknownOrchestrationMode(String),

    /// No factory is registered for a provider type tag.
    #[error("unknown provider type `{provider_type}`")]
    UnknownProviderType { provider_type: String },

    /// A model name was registered twice where uniqueness is required.
    #[error("duplicate model `{name}`")]
    DuplicateModel { name: String },

    /// No credential could be resolved for a provider.
    #[error("no API key provided for provider `{provider}`")]
    MissingCredential { provider: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

fn format_cost(cost: &Option<f64>) -> String {
    match cost {
        Some(c) => format!("{c}/1k tokens"),
        None => "unbounded".to_string(),
    }
}

/// Flat classification of [`TokenhubError`] for callers that map failures to
/// status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Config,
    InvalidRequest,
    ModelNotFound,
    ProviderNotFound,
    Provider,
    ProviderCallFailed,
    EscalationExhausted,
    UnknownOrchestrationMode,
    UnknownProviderType,
    DuplicateModel,
    MissingCredential,
    Internal,
}

impl TokenhubError {
    /// Returns the flat kind of this error, ignoring any wrapped source.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TokenhubError::Config(_) => ErrorKind::Config,
            TokenhubError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            TokenhubError::ModelNotFound { .. } => ErrorKind::ModelNotFound,
            TokenhubError::ProviderNotFound { .. } => ErrorKind::ProviderNotFound,
            TokenhubError::Provider { .. } => ErrorKind::Provider,
            TokenhubError::ProviderCallFailed { .. } => ErrorKind::ProviderCallFailed,
            TokenhubError::EscalationExhausted { .. } => ErrorKind::EscalationExhausted,
            TokenhubError::UnknownOrchestrationMode(_) => ErrorKind::UnknownOrchestrationMode,
            TokenhubError::UnknownProviderType { .. } => ErrorKind::UnknownProviderType,
            TokenhubError::DuplicateModel { .. } => ErrorKind::DuplicateModel,
            TokenhubError::MissingCredential { .. } => ErrorKind::MissingCredential,
            TokenhubError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Convenience constructor for adapter-side failures without a source.
    pub fn provider(message: impl Into<String>) -> Self {
        TokenhubError::Provider {
            message: message.into(),
            source: None,
        }
    }
}

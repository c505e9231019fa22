// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the routing and orchestration engines.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::TokenhubError;

/// Author of a chat message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A single chat message. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// A chat request: a non-empty, chronological message sequence plus
/// optional generation parameters.
///
/// Requests are values. Orchestration steps derive new requests with
/// [`Request::extended`] instead of mutating a shared one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRequest")]
pub struct Request {
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRequest {
    messages: Vec<Message>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    max_tokens: Option<u32>,
    #[serde(default)]
    temperature: Option<f32>,
}

impl TryFrom<RawRequest> for Request {
    type Error = TokenhubError;

    fn try_from(raw: RawRequest) -> Result<Self, Self::Error> {
        Ok(Request::new(raw.messages)?
            .with_model(raw.model)
            .with_max_tokens(raw.max_tokens)
            .with_temperature(raw.temperature))
    }
}

impl Request {
    /// Create a request from a message sequence.
    ///
    /// Fails with [`TokenhubError::InvalidRequest`] when `messages` is empty.
    pub fn new(messages: Vec<Message>) -> Result<Self, TokenhubError> {
        if messages.is_empty() {
            return Err(TokenhubError::InvalidRequest(
                "request must contain at least one message".to_string(),
            ));
        }
        Ok(Self {
            messages,
            model: None,
            max_tokens: None,
            temperature: None,
        })
    }

    /// Shorthand for a single user message.
    pub fn from_user(content: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(content)],
            model: None,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Pin (or unpin, with `None`) the model that should serve this request.
    pub fn with_model(mut self, model: Option<String>) -> Self {
        // An empty pin means "let routing choose".
        self.model = model.filter(|m| !m.is_empty());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Derive a new request whose messages are this request's messages
    /// followed by `extra`. Generation parameters are copied; the model pin
    /// is cleared so the caller can set a fresh one.
    pub fn extended(&self, extra: impl IntoIterator<Item = Message>) -> Self {
        let mut messages = self.messages.clone();
        messages.extend(extra);
        Self {
            messages,
            model: None,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }

    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }
}

/// A provider's reply. Produced exactly once per provider call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub content: String,
    /// Identifier of the model that produced this response.
    pub model: String,
    pub tokens_used: u64,
    pub finish_reason: String,
}

/// Catalog metadata for a callable model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelRecord {
    /// Unique identifier across the catalog.
    pub name: String,
    /// Identifier of the owning provider in the directory.
    pub provider: String,
    pub cost_per_1k_tokens: f64,
    /// Maximum input + output tokens.
    pub context_size: u64,
    /// Priority weight, higher = preferred. Only relative ordering matters.
    pub weight: i64,
}

impl ModelRecord {
    pub fn new(
        name: impl Into<String>,
        provider: impl Into<String>,
        cost_per_1k_tokens: f64,
        context_size: u64,
        weight: i64,
    ) -> Self {
        Self {
            name: name.into(),
            provider: provider.into(),
            cost_per_1k_tokens,
            context_size,
            weight,
        }
    }
}

/// Declarative constraints for model selection. Absent limits mean
/// "unconstrained".
///
/// A ceiling of `Some(0.0)` is enforced and admits only free models; it is
/// not read as "no ceiling". Use `None` to leave cost unconstrained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingPolicy {
    #[serde(default)]
    pub max_cost_per_1k_tokens: Option<f64>,

    #[serde(default)]
    pub min_context_size: Option<u64>,

    /// Sort candidates by weight (descending) instead of cost (ascending).
    #[serde(default = "default_true")]
    pub prefer_higher_weight: bool,

    /// Permit one escalation hop after a provider failure.
    #[serde(default = "default_true")]
    pub allow_escalation: bool,
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        Self {
            max_cost_per_1k_tokens: None,
            min_context_size: None,
            prefer_higher_weight: true,
            allow_escalation: true,
        }
    }
}

impl RoutingPolicy {
    /// Returns true when `model` is within the cost ceiling (or no ceiling is set).
    pub fn within_cost(&self, model: &ModelRecord) -> bool {
        self.max_cost_per_1k_tokens
            .is_none_or(|ceiling| model.cost_per_1k_tokens <= ceiling)
    }
}

fn default_true() -> bool {
    true
}

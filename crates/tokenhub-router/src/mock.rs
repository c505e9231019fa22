// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in `mock` provider type for development and demos.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokenhub_core::{ModelProvider, Request, Response, TokenhubError};

use crate::directory::{ProviderFactory, ProviderSettings};

/// Factory tag of the built-in mock provider.
pub const MOCK_PROVIDER_TYPE: &str = "mock";

/// A provider that answers every request locally with a canned reply.
pub struct MockProvider {
    name: String,
    api_key: SecretString,
    models: Vec<String>,
}

impl MockProvider {
    pub fn new(name: impl Into<String>, api_key: SecretString, models: Vec<String>) -> Self {
        let models = if models.is_empty() {
            vec!["mock-gpt-3.5".to_string(), "mock-gpt-4".to_string()]
        } else {
            models
        };
        Self {
            name: name.into(),
            api_key,
            models,
        }
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, model: &str, _request: &Request) -> Result<Response, TokenhubError> {
        Ok(Response {
            content: format!("Mock response from {model}"),
            model: model.to_string(),
            tokens_used: 50,
            finish_reason: "stop".to_string(),
        })
    }

    async fn list_available_models(&self) -> Result<Vec<String>, TokenhubError> {
        Ok(self.models.clone())
    }

    async fn validate_credential(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }
}

/// Constructs [`MockProvider`]s for the `mock` type tag.
pub struct MockProviderFactory;

impl ProviderFactory for MockProviderFactory {
    fn provider_type(&self) -> &str {
        MOCK_PROVIDER_TYPE
    }

    fn create(
        &self,
        name: &str,
        settings: ProviderSettings,
    ) -> Result<Arc<dyn ModelProvider>, TokenhubError> {
        Ok(Arc::new(MockProvider::new(
            name,
            settings.api_key,
            settings.models,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replies_with_model_name() {
        let provider = MockProvider::new("mock", SecretString::from("k".to_string()), vec![]);
        let response = provider
            .call("mock-gpt-4", &Request::from_user("Hello"))
            .await
            .unwrap();
        assert_eq!(response.content, "Mock response from mock-gpt-4");
        assert_eq!(response.model, "mock-gpt-4");
        assert_eq!(response.tokens_used, 50);
        assert_eq!(response.finish_reason, "stop");
    }

    #[tokio::test]
    async fn default_model_list_and_credential_check() {
        let provider = MockProvider::new("mock", SecretString::from(String::new()), vec![]);
        assert_eq!(
            provider.list_available_models().await.unwrap(),
            ["mock-gpt-3.5", "mock-gpt-4"]
        );
        assert!(!provider.validate_credential().await);
    }
}

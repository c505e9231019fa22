// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end routing and orchestration tests.
//!
//! `TestHarness` assembles a catalog, a provider directory of
//! [`ScriptedProvider`]s, a routing engine and an orchestration engine.
//! Provides `send()` and `orchestrate()` to drive the stack in tests.

use std::collections::HashMap;
use std::sync::Arc;

use tokenhub_core::{ModelProvider, ModelRecord, Request, RoutingPolicy, TokenhubError};
use tokenhub_orchestrator::{OrchestrationConfig, OrchestrationEngine, OrchestrationResult};
use tokenhub_router::{ModelCatalog, ProviderDirectory, RoutedResponse, RoutingEngine};

use crate::scripted_provider::ScriptedProvider;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    models: Vec<ModelRecord>,
    providers: Vec<Arc<ScriptedProvider>>,
    policy: RoutingPolicy,
    config: OrchestrationConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            models: Vec::new(),
            providers: Vec::new(),
            policy: RoutingPolicy::default(),
            config: OrchestrationConfig::default(),
        }
    }

    /// Add a catalog record.
    pub fn with_model(
        mut self,
        name: &str,
        provider: &str,
        cost_per_1k_tokens: f64,
        context_size: u64,
        weight: i64,
    ) -> Self {
        self.models.push(ModelRecord::new(
            name,
            provider,
            cost_per_1k_tokens,
            context_size,
            weight,
        ));
        self
    }

    /// Register a scripted provider under its own name.
    pub fn with_provider(mut self, provider: ScriptedProvider) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Set the routing engine's default policy.
    pub fn with_policy(mut self, policy: RoutingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the orchestration engine's default config.
    pub fn with_orchestration(mut self, config: OrchestrationConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the harness.
    ///
    /// Any provider referenced by a model but not registered explicitly gets
    /// an empty [`ScriptedProvider`].
    pub fn build(self) -> Result<TestHarness, TokenhubError> {
        let catalog = Arc::new(ModelCatalog::with_models(self.models)?);
        let directory = ProviderDirectory::new();

        let mut providers: HashMap<String, Arc<ScriptedProvider>> = HashMap::new();
        for provider in self.providers {
            providers.insert(provider.name().to_string(), provider);
        }
        for record in catalog.list_models(None) {
            providers
                .entry(record.provider.clone())
                .or_insert_with(|| Arc::new(ScriptedProvider::new(record.provider.clone())));
        }
        for (name, provider) in &providers {
            directory.insert(name, provider.clone());
        }

        let directory = Arc::new(directory);
        let routing = Arc::new(RoutingEngine::with_default_policy(
            catalog.clone(),
            directory.clone(),
            self.policy,
        ));
        let orchestrator = Arc::new(OrchestrationEngine::with_default_config(
            routing.clone(),
            self.config,
        ));

        Ok(TestHarness {
            catalog,
            directory,
            routing,
            orchestrator,
            providers,
        })
    }
}

/// A complete routing and orchestration stack over scripted providers.
pub struct TestHarness {
    pub catalog: Arc<ModelCatalog>,
    pub directory: Arc<ProviderDirectory>,
    pub routing: Arc<RoutingEngine>,
    pub orchestrator: Arc<OrchestrationEngine>,
    providers: HashMap<String, Arc<ScriptedProvider>>,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// The two-model catalog used throughout the docs: `mock-a` (cheap,
    /// weight 50) and `mock-b` (larger, weight 100), both on provider `mock`.
    pub fn two_tier() -> TestHarnessBuilder {
        Self::builder()
            .with_model("mock-a", "mock", 0.002, 4096, 50)
            .with_model("mock-b", "mock", 0.03, 8192, 100)
    }

    /// The scripted provider registered under `name`.
    pub fn provider(&self, name: &str) -> Option<Arc<ScriptedProvider>> {
        self.providers.get(name).cloned()
    }

    /// Route a single user message with the default policy.
    pub async fn send(&self, text: &str) -> Result<RoutedResponse, TokenhubError> {
        self.routing
            .execute_with_routing(&Request::from_user(text), None)
            .await
    }

    /// Orchestrate a single user message with `config`.
    pub async fn orchestrate(
        &self,
        text: &str,
        config: &OrchestrationConfig,
    ) -> Result<OrchestrationResult, TokenhubError> {
        self.orchestrator
            .execute(&Request::from_user(text), Some(config), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unregistered_model_providers_are_filled_in() {
        let harness = TestHarness::two_tier().build().unwrap();
        assert_eq!(harness.directory.list_providers(), ["mock"]);

        let routed = harness.send("Hello").await.unwrap();
        assert_eq!(routed.model, "mock-b");
        assert_eq!(routed.response.content, "mock:mock-b#1");

        let provider = harness.provider("mock").unwrap();
        assert_eq!(provider.called_models().await, ["mock-b"]);
    }

    #[test]
    fn duplicate_models_fail_the_build() {
        let result = TestHarness::two_tier()
            .with_model("mock-a", "mock", 0.1, 1, 1)
            .build();
        assert!(matches!(result, Err(TokenhubError::DuplicateModel { .. })));
    }
}

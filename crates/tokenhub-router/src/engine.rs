// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing engine: policy-driven model selection with single-hop escalation.
//!
//! Selection order: context filter > cost filter > weight (or cost) ordering,
//! ties broken by catalog order. A failed provider call is retried at most
//! once, against a strictly higher-tier model.

use std::sync::Arc;

use tokenhub_core::{ModelRecord, Request, Response, RoutingPolicy, TokenhubError};
use tracing::{debug, info, warn};

use crate::catalog::ModelCatalog;
use crate::directory::ProviderDirectory;

/// Characters per token used by the context heuristic.
const CHARS_PER_TOKEN: u64 = 4;

/// A provider response together with the routing outcome that produced it.
///
/// The caller's [`Request`] is never mutated; the model routing resolved is
/// returned here instead.
#[derive(Debug, Clone)]
pub struct RoutedResponse {
    pub response: Response,
    /// Model name the provider was invoked with.
    pub model: String,
    /// Provider id that served the call.
    pub provider: String,
    /// Catalog model whose call failed before escalation, if any.
    pub escalated_from: Option<String>,
}

/// Estimate the context tokens a request needs: message characters / 4,
/// plus `max_tokens` when set.
pub fn estimate_context_tokens(request: &Request) -> u64 {
    let chars: u64 = request
        .messages()
        .iter()
        .map(|m| m.content.chars().count() as u64)
        .sum();
    chars / CHARS_PER_TOKEN + request.max_tokens().map_or(0, u64::from)
}

/// Selects models from a [`ModelCatalog`] and invokes them through a
/// [`ProviderDirectory`].
pub struct RoutingEngine {
    catalog: Arc<ModelCatalog>,
    directory: Arc<ProviderDirectory>,
    default_policy: RoutingPolicy,
}

impl RoutingEngine {
    /// Create an engine using the default (unconstrained) policy.
    pub fn new(catalog: Arc<ModelCatalog>, directory: Arc<ProviderDirectory>) -> Self {
        Self::with_default_policy(catalog, directory, RoutingPolicy::default())
    }

    /// Create an engine whose policy applies when callers pass `None`.
    pub fn with_default_policy(
        catalog: Arc<ModelCatalog>,
        directory: Arc<ProviderDirectory>,
        default_policy: RoutingPolicy,
    ) -> Self {
        Self {
            catalog,
            directory,
            default_policy,
        }
    }

    pub fn catalog(&self) -> &Arc<ModelCatalog> {
        &self.catalog
    }

    pub fn directory(&self) -> &Arc<ProviderDirectory> {
        &self.directory
    }

    pub fn default_policy(&self) -> &RoutingPolicy {
        &self.default_policy
    }

    /// Select the best-fit model for `request`, or `None` if no catalog entry
    /// satisfies the policy.
    pub fn select_model(
        &self,
        request: &Request,
        policy: Option<&RoutingPolicy>,
    ) -> Option<ModelRecord> {
        let policy = policy.unwrap_or(&self.default_policy);
        let snapshot = self.catalog.snapshot();
        select_from(&snapshot, estimate_context_tokens(request), policy).cloned()
    }

    /// Select a model, invoke its provider, and escalate once on failure
    /// when the policy allows it.
    pub async fn execute_with_routing(
        &self,
        request: &Request,
        policy: Option<&RoutingPolicy>,
    ) -> Result<RoutedResponse, TokenhubError> {
        let policy = policy.unwrap_or(&self.default_policy);
        // One snapshot for the whole logical call, escalation included.
        let snapshot = self.catalog.snapshot();
        let estimated = estimate_context_tokens(request);

        let selected = select_from(&snapshot, estimated, policy).ok_or_else(|| {
            TokenhubError::ModelNotFound {
                required_context: required_context(estimated, policy),
                max_cost: policy.max_cost_per_1k_tokens,
            }
        })?;

        let model = request.model().unwrap_or(&selected.name).to_string();
        info!(
            selected = selected.name.as_str(),
            model = model.as_str(),
            provider = selected.provider.as_str(),
            estimated_tokens = estimated,
            "routing request"
        );

        match self.invoke(&selected.provider, &model, request).await {
            Ok(response) => Ok(RoutedResponse {
                response,
                model,
                provider: selected.provider.clone(),
                escalated_from: None,
            }),
            Err(failure @ TokenhubError::ProviderCallFailed { .. }) if policy.allow_escalation => {
                warn!(model = model.as_str(), error = %failure, "provider call failed, escalating");
                self.escalate(&snapshot, request, selected, policy, failure)
                    .await
            }
            Err(failure) => {
                warn!(model = model.as_str(), error = %failure, "routed call failed");
                Err(failure)
            }
        }
    }

    async fn escalate(
        &self,
        snapshot: &[ModelRecord],
        request: &Request,
        failed: &ModelRecord,
        policy: &RoutingPolicy,
        failure: TokenhubError,
    ) -> Result<RoutedResponse, TokenhubError> {
        let Some(target) = escalation_target(snapshot, failed, policy) else {
            return Err(TokenhubError::EscalationExhausted {
                model: failed.name.clone(),
                source: Box::new(failure),
            });
        };

        info!(
            from = failed.name.as_str(),
            to = target.name.as_str(),
            "escalating to higher-tier model"
        );

        // Single hop: a failure here propagates without further retries.
        let response = self.invoke(&target.provider, &target.name, request).await?;
        Ok(RoutedResponse {
            response,
            model: target.name.clone(),
            provider: target.provider.clone(),
            escalated_from: Some(failed.name.clone()),
        })
    }

    async fn invoke(
        &self,
        provider_id: &str,
        model: &str,
        request: &Request,
    ) -> Result<Response, TokenhubError> {
        let provider = self.directory.get_provider(provider_id).ok_or_else(|| {
            TokenhubError::ProviderNotFound {
                provider: provider_id.to_string(),
            }
        })?;

        provider
            .call(model, request)
            .await
            .map_err(|e| TokenhubError::ProviderCallFailed {
                provider: provider_id.to_string(),
                model: model.to_string(),
                source: Box::new(e),
            })
    }
}

fn required_context(estimated: u64, policy: &RoutingPolicy) -> u64 {
    policy.min_context_size.unwrap_or(0).max(estimated)
}

/// Pure selection over a catalog snapshot.
fn select_from<'a>(
    models: &'a [ModelRecord],
    estimated: u64,
    policy: &RoutingPolicy,
) -> Option<&'a ModelRecord> {
    let required = required_context(estimated, policy);

    let mut candidates: Vec<&ModelRecord> = models
        .iter()
        .filter(|m| required == 0 || m.context_size >= required)
        .filter(|m| policy.within_cost(m))
        .collect();

    debug!(
        catalog = models.len(),
        candidates = candidates.len(),
        required_context = required,
        "filtered routing candidates"
    );

    // Stable sorts: equal keys keep catalog order.
    if policy.prefer_higher_weight {
        candidates.sort_by(|a, b| b.weight.cmp(&a.weight));
    } else {
        candidates.sort_by(|a, b| a.cost_per_1k_tokens.total_cmp(&b.cost_per_1k_tokens));
    }

    candidates.first().copied()
}

/// Highest-weight model that beats `failed` on weight or context size and
/// is within the cost ceiling.
fn escalation_target<'a>(
    models: &'a [ModelRecord],
    failed: &ModelRecord,
    policy: &RoutingPolicy,
) -> Option<&'a ModelRecord> {
    let mut candidates: Vec<&ModelRecord> = models
        .iter()
        .filter(|m| m.name != failed.name)
        .filter(|m| m.weight > failed.weight || m.context_size > failed.context_size)
        .filter(|m| policy.within_cost(m))
        .collect();
    candidates.sort_by(|a, b| b.weight.cmp(&a.weight));
    candidates.first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use proptest::prelude::*;
    use tokenhub_core::{Message, ModelProvider};
    use tracing_test::traced_test;

    use crate::mock::MockProvider;

    struct DownProvider;

    #[async_trait]
    impl ModelProvider for DownProvider {
        fn name(&self) -> &str {
            "down"
        }

        async fn call(&self, _model: &str, _request: &Request) -> Result<Response, TokenhubError> {
            Err(TokenhubError::provider("503 service unavailable"))
        }

        async fn list_available_models(&self) -> Result<Vec<String>, TokenhubError> {
            Ok(vec![])
        }

        async fn validate_credential(&self) -> bool {
            true
        }
    }

    fn engine(models: Vec<ModelRecord>) -> RoutingEngine {
        let directory = ProviderDirectory::new();
        directory.insert(
            "mock",
            Arc::new(MockProvider::new("mock", "k".to_string().into(), vec![])),
        );
        directory.insert("down", Arc::new(DownProvider));
        RoutingEngine::new(
            Arc::new(ModelCatalog::with_models(models).unwrap()),
            Arc::new(directory),
        )
    }

    fn two_mocks() -> Vec<ModelRecord> {
        vec![
            ModelRecord::new("mock-a", "mock", 0.002, 4096, 50),
            ModelRecord::new("mock-b", "mock", 0.03, 8192, 100),
        ]
    }

    #[test]
    fn estimate_counts_chars_and_max_tokens() {
        let request = Request::new(vec![Message::system("abcd"), Message::user("abcdefgh")])
            .unwrap()
            .with_max_tokens(Some(100));
        assert_eq!(estimate_context_tokens(&request), 3 + 100);
        assert_eq!(estimate_context_tokens(&Request::from_user("abc")), 0);
    }

    #[test]
    fn default_policy_prefers_weight() {
        let engine = engine(two_mocks());
        let selected = engine.select_model(&Request::from_user("Hello"), None).unwrap();
        assert_eq!(selected.name, "mock-b");
    }

    #[test]
    fn cost_preference_picks_cheapest() {
        let engine = engine(two_mocks());
        let policy = RoutingPolicy {
            prefer_higher_weight: false,
            ..RoutingPolicy::default()
        };
        let selected = engine
            .select_model(&Request::from_user("Hello"), Some(&policy))
            .unwrap();
        assert_eq!(selected.name, "mock-a");
    }

    #[test]
    fn min_context_excludes_small_models() {
        let engine = engine(two_mocks());
        let policy = RoutingPolicy {
            min_context_size: Some(5000),
            prefer_higher_weight: false,
            ..RoutingPolicy::default()
        };
        let selected = engine
            .select_model(&Request::from_user("Hello"), Some(&policy))
            .unwrap();
        assert_eq!(selected.name, "mock-b");
    }

    #[test]
    fn estimated_context_excludes_small_models() {
        let engine = engine(two_mocks());
        let request = Request::from_user("Hello").with_max_tokens(Some(6000));
        let policy = RoutingPolicy {
            prefer_higher_weight: false,
            ..RoutingPolicy::default()
        };
        assert_eq!(
            engine.select_model(&request, Some(&policy)).unwrap().name,
            "mock-b"
        );
    }

    #[test]
    fn equal_weights_keep_catalog_order() {
        let engine = engine(vec![
            ModelRecord::new("first", "mock", 0.01, 4096, 10),
            ModelRecord::new("second", "mock", 0.01, 4096, 10),
        ]);
        let selected = engine.select_model(&Request::from_user("hi"), None).unwrap();
        assert_eq!(selected.name, "first");
    }

    #[tokio::test]
    async fn no_match_is_model_not_found() {
        let engine = engine(vec![ModelRecord::new("a", "mock", 0.05, 4096, 1)]);
        let policy = RoutingPolicy {
            max_cost_per_1k_tokens: Some(0.01),
            ..RoutingPolicy::default()
        };
        let request = Request::from_user("Hello");

        assert!(engine.select_model(&request, Some(&policy)).is_none());
        let err = engine
            .execute_with_routing(&request, Some(&policy))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TokenhubError::ModelNotFound { max_cost: Some(c), .. } if c == 0.01
        ));
    }

    #[tokio::test]
    async fn pinned_model_is_passed_through() {
        let engine = engine(two_mocks());
        let request = Request::from_user("Hello").with_model(Some("mock-a".into()));
        let routed = engine.execute_with_routing(&request, None).await.unwrap();
        assert_eq!(routed.model, "mock-a");
        assert_eq!(routed.response.content, "Mock response from mock-a");
        assert_eq!(request.model(), Some("mock-a"));
    }

    #[tokio::test]
    async fn unpinned_request_uses_selected_model() {
        let engine = engine(two_mocks());
        let request = Request::from_user("Hello");
        let routed = engine.execute_with_routing(&request, None).await.unwrap();
        assert_eq!(routed.model, "mock-b");
        assert_eq!(routed.provider, "mock");
        assert!(routed.escalated_from.is_none());
        assert_eq!(request.model(), None, "caller's request is not mutated");
    }

    #[tokio::test]
    async fn missing_provider_is_provider_not_found() {
        let engine = engine(vec![ModelRecord::new("ghost", "nowhere", 0.01, 4096, 1)]);
        let err = engine
            .execute_with_routing(&Request::from_user("hi"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, TokenhubError::ProviderNotFound { provider } if provider == "nowhere"));
    }

    #[tokio::test]
    #[traced_test]
    async fn failure_escalates_to_higher_weight() {
        let engine = engine(vec![
            ModelRecord::new("flaky", "down", 0.001, 4096, 200),
            ModelRecord::new("backup", "mock", 0.01, 16384, 10),
        ]);
        let routed = engine
            .execute_with_routing(&Request::from_user("hi"), None)
            .await
            .unwrap();
        assert_eq!(routed.model, "backup");
        assert_eq!(routed.escalated_from.as_deref(), Some("flaky"));
        assert!(logs_contain("escalating to higher-tier model"));
    }

    #[tokio::test]
    async fn escalation_disabled_propagates_call_failure() {
        let engine = engine(vec![
            ModelRecord::new("flaky", "down", 0.001, 4096, 200),
            ModelRecord::new("backup", "mock", 0.01, 16384, 10),
        ]);
        let policy = RoutingPolicy {
            allow_escalation: false,
            ..RoutingPolicy::default()
        };
        let err = engine
            .execute_with_routing(&Request::from_user("hi"), Some(&policy))
            .await
            .unwrap_err();
        assert!(matches!(err, TokenhubError::ProviderCallFailed { model, .. } if model == "flaky"));
    }

    #[tokio::test]
    async fn single_model_failure_exhausts_escalation() {
        let engine = engine(vec![ModelRecord::new("only", "down", 0.001, 4096, 1)]);
        let err = engine
            .execute_with_routing(&Request::from_user("hi"), None)
            .await
            .unwrap_err();
        match err {
            TokenhubError::EscalationExhausted { model, source } => {
                assert_eq!(model, "only");
                assert!(matches!(*source, TokenhubError::ProviderCallFailed { .. }));
            }
            other => panic!("expected EscalationExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn escalated_failure_is_not_retried_again() {
        let engine = engine(vec![
            ModelRecord::new("low", "down", 0.001, 4096, 1),
            ModelRecord::new("mid", "down", 0.002, 4096, 5),
            ModelRecord::new("high", "mock", 0.003, 2048, 0),
        ]);
        // low fails -> escalates to mid (weight 5 beats high's 0); mid fails -> stop.
        let policy = RoutingPolicy {
            prefer_higher_weight: false,
            ..RoutingPolicy::default()
        };
        let err = engine
            .execute_with_routing(&Request::from_user("hi"), Some(&policy))
            .await
            .unwrap_err();
        assert!(matches!(err, TokenhubError::ProviderCallFailed { model, .. } if model == "mid"));
    }

    #[test]
    fn escalation_respects_cost_ceiling() {
        let models = vec![
            ModelRecord::new("cheap", "down", 0.001, 4096, 1),
            ModelRecord::new("pricey", "mock", 0.5, 32768, 100),
        ];
        let policy = RoutingPolicy {
            max_cost_per_1k_tokens: Some(0.1),
            ..RoutingPolicy::default()
        };
        assert!(escalation_target(&models, &models[0], &policy).is_none());
        assert_eq!(
            escalation_target(&models, &models[0], &RoutingPolicy::default())
                .unwrap()
                .name,
            "pricey"
        );
    }

    fn arb_catalog() -> impl Strategy<Value = Vec<ModelRecord>> {
        prop::collection::vec((0u32..100, 1u64..20_000, -50i64..50), 1..8).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (cost, ctx, weight))| {
                    ModelRecord::new(format!("m{i}"), "mock", f64::from(cost) / 1000.0, ctx, weight)
                })
                .collect()
        })
    }

    fn arb_policy() -> impl Strategy<Value = RoutingPolicy> {
        (
            prop::option::of(0u32..100),
            prop::option::of(0u64..20_000),
            any::<bool>(),
        )
            .prop_map(|(cost, ctx, weight)| RoutingPolicy {
                max_cost_per_1k_tokens: cost.map(|c| f64::from(c) / 1000.0),
                min_context_size: ctx,
                prefer_higher_weight: weight,
                allow_escalation: true,
            })
    }

    proptest! {
        #[test]
        fn selection_satisfies_filters_and_ordering(
            models in arb_catalog(),
            policy in arb_policy(),
            estimated in 0u64..10_000,
        ) {
            let required = required_context(estimated, &policy);
            let candidates: Vec<&ModelRecord> = models
                .iter()
                .filter(|m| m.context_size >= required && policy.within_cost(m))
                .collect();

            match select_from(&models, estimated, &policy) {
                None => prop_assert!(candidates.is_empty()),
                Some(chosen) => {
                    prop_assert!(chosen.context_size >= required);
                    prop_assert!(policy.within_cost(chosen));
                    if policy.prefer_higher_weight {
                        prop_assert!(candidates.iter().all(|c| c.weight <= chosen.weight));
                    } else {
                        prop_assert!(candidates.iter().all(|c| c.cost_per_1k_tokens >= chosen.cost_per_1k_tokens));
                    }
                    // Deterministic for a fixed catalog and policy.
                    prop_assert_eq!(select_from(&models, estimated, &policy), Some(chosen));
                }
            }
        }

        #[test]
        fn escalation_target_strictly_outranks_failed(
            models in arb_catalog(),
            failed_idx in 0usize..8,
        ) {
            let failed = &models[failed_idx % models.len()];
            if let Some(target) = escalation_target(&models, failed, &RoutingPolicy::default()) {
                prop_assert!(target.name != failed.name);
                prop_assert!(target.weight > failed.weight || target.context_size > failed.context_size);
            }
        }
    }
}

// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Orchestration engine: dispatches a request in simple or adversarial mode.
//!
//! Adversarial mode runs plan, critique, and up to N refinement steps
//! strictly in sequence, each as its own routed call. Any failure aborts the
//! whole call; partial results are dropped.

use std::sync::Arc;

use tokenhub_core::{Message, Request, Response, RoutingPolicy, TokenhubError};
use tokenhub_router::RoutingEngine;
use tracing::{debug, info};

use crate::config::{OrchestrationConfig, OrchestrationMode};
use crate::result::{AdversarialSummary, OrchestrationResult, SummaryValue};

const CRITIQUE_PROMPT: &str = "Please provide a critical analysis of the above response. \
Identify any issues, inaccuracies, or areas for improvement.";

fn refine_prompt(critique: &str) -> String {
    format!("Critique: {critique}\n\nPlease refine your response based on this critique.")
}

/// Stateless dispatcher over [`OrchestrationMode`]s.
pub struct OrchestrationEngine {
    routing: Arc<RoutingEngine>,
    default_config: OrchestrationConfig,
}

impl OrchestrationEngine {
    pub fn new(routing: Arc<RoutingEngine>) -> Self {
        Self::with_default_config(routing, OrchestrationConfig::default())
    }

    /// Create an engine whose config applies when callers pass `None`.
    pub fn with_default_config(
        routing: Arc<RoutingEngine>,
        default_config: OrchestrationConfig,
    ) -> Self {
        Self {
            routing,
            default_config,
        }
    }

    pub fn routing(&self) -> &Arc<RoutingEngine> {
        &self.routing
    }

    pub fn default_config(&self) -> &OrchestrationConfig {
        &self.default_config
    }

    /// Run `request` under `config` (or the engine default), routing every
    /// step with `policy` (or the routing engine's default).
    pub async fn execute(
        &self,
        request: &Request,
        config: Option<&OrchestrationConfig>,
        policy: Option<&RoutingPolicy>,
    ) -> Result<OrchestrationResult, TokenhubError> {
        let config = config.unwrap_or(&self.default_config);
        info!(mode = %config.mode, "orchestrating request");

        match config.mode {
            OrchestrationMode::Simple => {
                let routed = self.routing.execute_with_routing(request, policy).await?;
                Ok(OrchestrationResult::simple(routed.response))
            }
            OrchestrationMode::Adversarial => self.adversarial(request, config, policy).await,
        }
    }

    async fn adversarial(
        &self,
        request: &Request,
        config: &OrchestrationConfig,
        policy: Option<&RoutingPolicy>,
    ) -> Result<OrchestrationResult, TokenhubError> {
        let plan_request = request
            .extended(Vec::<Message>::new())
            .with_model(config.planner_model.clone());
        let plan = self.step("plan", &plan_request, policy).await?;

        let critique_request = request
            .extended([
                Message::assistant(plan.content.clone()),
                Message::user(CRITIQUE_PROMPT),
            ])
            .with_model(config.critic_model.clone());
        let critique = self.step("critique", &critique_request, policy).await?;

        // The critique is computed once and reused for every pass.
        let passes = config.refinement_passes();
        let mut refinements: Vec<Response> = Vec::new();
        for pass in 1..=passes {
            let draft = refinements.last().unwrap_or(&plan).content.clone();
            let refine_request = request
                .extended([
                    Message::assistant(draft),
                    Message::user(refine_prompt(&critique.content)),
                ])
                .with_model(config.planner_model.clone());
            debug!(pass, of = passes, "refinement pass");
            refinements.push(self.step("refine", &refine_request, policy).await?);
        }

        let result = OrchestrationResult::adversarial(plan, critique, refinements);
        info!(iterations = result.iterations, "adversarial orchestration complete");
        Ok(result)
    }

    async fn step(
        &self,
        phase: &'static str,
        request: &Request,
        policy: Option<&RoutingPolicy>,
    ) -> Result<Response, TokenhubError> {
        let routed = self.routing.execute_with_routing(request, policy).await?;
        info!(
            phase,
            model = routed.model.as_str(),
            tokens = routed.response.tokens_used,
            "orchestration step complete"
        );
        Ok(routed.response)
    }

    /// Flatten a result into text fields: `final_response`, `iterations`,
    /// and when present `initial_plan`, `critique`, `refinements`.
    pub fn create_adversarial_summary(&self, result: &OrchestrationResult) -> AdversarialSummary {
        let mut summary = AdversarialSummary::new();
        summary.insert(
            "final_response".to_string(),
            SummaryValue::Text(result.final_response.content.clone()),
        );
        summary.insert(
            "iterations".to_string(),
            SummaryValue::Text(result.iterations.to_string()),
        );
        if let Some(plan) = &result.plan_response {
            summary.insert(
                "initial_plan".to_string(),
                SummaryValue::Text(plan.content.clone()),
            );
        }
        if let Some(critique) = &result.critique_response {
            summary.insert(
                "critique".to_string(),
                SummaryValue::Text(critique.content.clone()),
            );
        }
        if let Some(refinements) = &result.refinement_responses {
            summary.insert(
                "refinements".to_string(),
                SummaryValue::List(refinements.iter().map(|r| r.content.clone()).collect()),
            );
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokenhub_config::ProviderConfig;
    use tokenhub_core::ModelRecord;
    use tokenhub_router::{ModelCatalog, ProviderDirectory};

    fn engine() -> OrchestrationEngine {
        let catalog = ModelCatalog::with_models([
            ModelRecord::new("mock-a", "mock", 0.002, 4096, 50),
            ModelRecord::new("mock-b", "mock", 0.03, 8192, 100),
        ])
        .unwrap();
        let directory = ProviderDirectory::from_config(&[ProviderConfig {
            name: "mock".to_string(),
            provider_type: "mock".to_string(),
            api_key: Some("k".to_string()),
            api_key_env: None,
            models: vec![],
        }])
        .unwrap();
        OrchestrationEngine::new(Arc::new(RoutingEngine::new(
            Arc::new(catalog),
            Arc::new(directory),
        )))
    }

    #[tokio::test]
    async fn simple_mode_is_one_routed_call() {
        let result = engine()
            .execute(&Request::from_user("Hello"), None, None)
            .await
            .unwrap();
        assert_eq!(result.iterations, 1);
        assert_eq!(result.final_response.content, "Mock response from mock-b");
        assert!(result.plan_response.is_none());
        assert!(result.critique_response.is_none());
        assert!(result.refinement_responses.is_none());
    }

    #[tokio::test]
    async fn adversarial_scenario_with_two_refinements() {
        let engine = engine();
        let config = OrchestrationConfig::adversarial(
            Some("mock-b".to_string()),
            Some("mock-a".to_string()),
        )
        .with_refinement(2);

        let result = engine
            .execute(&Request::from_user("Hello"), Some(&config), None)
            .await
            .unwrap();

        assert_eq!(result.iterations, 3);
        assert_eq!(result.refinement_count(), 2);
        assert_eq!(
            result.plan_response.as_ref().unwrap().content,
            "Mock response from mock-b"
        );
        assert_eq!(
            result.critique_response.as_ref().unwrap().content,
            "Mock response from mock-a"
        );
        assert_eq!(result.final_response.content, "Mock response from mock-b");

        let summary = engine.create_adversarial_summary(&result);
        let keys: Vec<&str> = summary.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            ["critique", "final_response", "initial_plan", "iterations", "refinements"]
        );
        assert_eq!(summary["iterations"], SummaryValue::Text("3".to_string()));
        assert_eq!(summary["refinements"].as_list().unwrap().len(), 2);
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn each_step_is_logged_with_its_phase() {
        let config = OrchestrationConfig::adversarial(None, None).with_refinement(1);
        engine()
            .execute(&Request::from_user("Hello"), Some(&config), None)
            .await
            .unwrap();
        assert!(logs_contain("orchestration step complete"));
        assert!(logs_contain("critique"));
        assert!(logs_contain("refine"));
        assert!(logs_contain("adversarial orchestration complete"));
    }

    #[tokio::test]
    async fn adversarial_without_refinement_is_one_iteration() {
        let config = OrchestrationConfig::adversarial(None, None);
        let result = engine()
            .execute(&Request::from_user("Hello"), Some(&config), None)
            .await
            .unwrap();
        assert_eq!(result.iterations, 1);
        assert!(result.plan_response.is_some());
        assert!(result.critique_response.is_some());
        assert!(result.refinement_responses.is_none());
    }

    #[test]
    fn simple_summary_has_only_final_and_iterations() {
        let engine = engine();
        let result = OrchestrationResult::simple(Response {
            content: "done".to_string(),
            model: "m".to_string(),
            tokens_used: 1,
            finish_reason: "stop".to_string(),
        });
        let summary = engine.create_adversarial_summary(&result);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary["final_response"].as_text(), Some("done"));
    }

    #[test]
    fn refine_prompt_embeds_critique() {
        assert_eq!(
            refine_prompt("too vague"),
            "Critique: too vague\n\nPlease refine your response based on this critique."
        );
    }
}

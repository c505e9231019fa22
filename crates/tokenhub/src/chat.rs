// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tokenhub chat` command implementation.
//!
//! Sends one message through the orchestration engine. Flags override the
//! `[routing]` and `[orchestration]` sections for this call only.

use std::io::IsTerminal;

use clap::Args;
use tokenhub_core::{Request, RoutingPolicy, TokenhubError};
use tokenhub_orchestrator::{OrchestrationConfig, OrchestrationMode, SummaryValue};

use crate::hub::Hub;

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Message to send.
    pub message: String,

    /// Orchestration mode: simple or adversarial.
    #[arg(long)]
    pub mode: Option<String>,

    /// Model pinned for plan and refinement steps.
    #[arg(long)]
    pub planner: Option<String>,

    /// Model pinned for the critique step.
    #[arg(long)]
    pub critic: Option<String>,

    /// Enable refinement with up to N passes.
    #[arg(long, value_name = "N")]
    pub refine: Option<u32>,

    /// Maximum cost per 1k tokens.
    #[arg(long)]
    pub max_cost: Option<f64>,

    /// Minimum context window in tokens.
    #[arg(long)]
    pub min_context: Option<u64>,

    /// Maximum output tokens.
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Output the adversarial summary as JSON.
    #[arg(long)]
    pub json: bool,

    /// Disable colored output.
    #[arg(long)]
    pub plain: bool,
}

impl ChatArgs {
    fn orchestration(&self, base: &OrchestrationConfig) -> Result<OrchestrationConfig, TokenhubError> {
        let mut config = base.clone();
        if let Some(mode) = &self.mode {
            config.mode = mode.parse()?;
        }
        if self.planner.is_some() {
            config.planner_model = self.planner.clone();
        }
        if self.critic.is_some() {
            config.critic_model = self.critic.clone();
        }
        if let Some(passes) = self.refine {
            config = config.with_refinement(passes);
        }
        Ok(config)
    }

    fn policy(&self, base: &RoutingPolicy) -> RoutingPolicy {
        RoutingPolicy {
            max_cost_per_1k_tokens: self.max_cost.or(base.max_cost_per_1k_tokens),
            min_context_size: self.min_context.or(base.min_context_size),
            ..base.clone()
        }
    }

    fn request(&self) -> Request {
        Request::from_user(self.message.as_str())
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
    }
}

/// Run the `tokenhub chat` command.
pub async fn run_chat(hub: &Hub, args: &ChatArgs) -> Result<(), TokenhubError> {
    let config = args.orchestration(hub.orchestrator.default_config())?;
    let policy = args.policy(hub.routing.default_policy());

    let result = hub
        .orchestrator
        .execute(&args.request(), Some(&config), Some(&policy))
        .await?;
    let summary = hub.orchestrator.create_adversarial_summary(&result);

    if args.json {
        let rendered = serde_json::to_string_pretty(&summary)
            .map_err(|e| TokenhubError::Internal(format!("failed to render summary: {e}")))?;
        println!("{rendered}");
        return Ok(());
    }

    if config.mode == OrchestrationMode::Simple {
        println!("{}", result.final_response.content);
        return Ok(());
    }

    let use_color = !args.plain && std::io::stdout().is_terminal();
    for key in ["initial_plan", "critique"] {
        if let Some(SummaryValue::Text(text)) = summary.get(key) {
            print_section(key, text, use_color);
        }
    }
    if let Some(SummaryValue::List(refinements)) = summary.get("refinements") {
        for (i, text) in refinements.iter().enumerate() {
            print_section(&format!("refinement {}", i + 1), text, use_color);
        }
    }
    print_section("final", &result.final_response.content, use_color);
    println!("  ({} iterations)", result.iterations);
    Ok(())
}

fn print_section(title: &str, body: &str, use_color: bool) {
    if use_color {
        use colored::Colorize;
        println!("{}", format!("== {title}").bold());
    } else {
        println!("== {title}");
    }
    println!("{body}");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: ChatArgs,
    }

    fn parse(argv: &[&str]) -> ChatArgs {
        let mut full = vec!["chat"];
        full.extend_from_slice(argv);
        Wrapper::parse_from(full).args
    }

    #[test]
    fn flags_override_configured_defaults() {
        let args = parse(&["hi", "--mode", "adversarial", "--critic", "mock-gpt-3.5", "--refine", "2"]);
        let config = args.orchestration(&OrchestrationConfig::default()).unwrap();
        assert_eq!(config.mode, OrchestrationMode::Adversarial);
        assert_eq!(config.critic_model.as_deref(), Some("mock-gpt-3.5"));
        assert!(config.enable_refinement);
        assert_eq!(config.max_refinement_iterations, 2);
    }

    #[test]
    fn bad_mode_flag_is_rejected() {
        let args = parse(&["hi", "--mode", "debate"]);
        assert!(matches!(
            args.orchestration(&OrchestrationConfig::default()),
            Err(TokenhubError::UnknownOrchestrationMode(_))
        ));
    }

    #[test]
    fn policy_flags_keep_unset_fields() {
        let base = RoutingPolicy {
            min_context_size: Some(1024),
            allow_escalation: false,
            ..RoutingPolicy::default()
        };
        let policy = parse(&["hi", "--max-cost", "0.01"]).policy(&base);
        assert_eq!(policy.max_cost_per_1k_tokens, Some(0.01));
        assert_eq!(policy.min_context_size, Some(1024));
        assert!(!policy.allow_escalation);
    }

    #[tokio::test]
    async fn chat_runs_against_default_hub() {
        let hub = Hub::from_config(&tokenhub_config::TokenhubConfig::default()).unwrap();
        let args = parse(&["hello", "--mode", "adversarial", "--refine", "1", "--json"]);
        run_chat(&hub, &args).await.unwrap();
    }
}

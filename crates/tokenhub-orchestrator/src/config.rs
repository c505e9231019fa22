// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Orchestration mode and per-call configuration.

use std::str::FromStr;

use serde::Serialize;
use strum::{Display, EnumIter};
use tokenhub_core::TokenhubError;

pub use tokenhub_config::OrchestrationOptions;

/// How a request is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrchestrationMode {
    /// One routed call.
    Simple,
    /// Plan, critique, then optional bounded refinement.
    Adversarial,
}

impl FromStr for OrchestrationMode {
    type Err = TokenhubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(Self::Simple),
            "adversarial" => Ok(Self::Adversarial),
            other => Err(TokenhubError::UnknownOrchestrationMode(other.to_string())),
        }
    }
}

/// Typed orchestration settings for one `execute` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestrationConfig {
    pub mode: OrchestrationMode,
    /// Pinned for plan and refinement steps. `None` lets routing choose.
    pub planner_model: Option<String>,
    /// Pinned for the critique step. `None` lets routing choose.
    pub critic_model: Option<String>,
    pub enable_refinement: bool,
    pub max_refinement_iterations: u32,
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            mode: OrchestrationMode::Simple,
            planner_model: None,
            critic_model: None,
            enable_refinement: false,
            max_refinement_iterations: 1,
        }
    }
}

impl OrchestrationConfig {
    /// Adversarial config pinned to the given planner and critic.
    pub fn adversarial(planner: Option<String>, critic: Option<String>) -> Self {
        Self {
            mode: OrchestrationMode::Adversarial,
            planner_model: planner,
            critic_model: critic,
            ..Self::default()
        }
    }

    /// Enable refinement with up to `iterations` passes.
    pub fn with_refinement(mut self, iterations: u32) -> Self {
        self.enable_refinement = true;
        self.max_refinement_iterations = iterations;
        self
    }

    /// Number of refinement passes this config will run.
    pub(crate) fn refinement_passes(&self) -> u32 {
        if self.enable_refinement {
            self.max_refinement_iterations
        } else {
            0
        }
    }
}

impl TryFrom<&OrchestrationOptions> for OrchestrationConfig {
    type Error = TokenhubError;

    fn try_from(options: &OrchestrationOptions) -> Result<Self, Self::Error> {
        Ok(Self {
            mode: options.mode.parse()?,
            planner_model: non_empty(&options.planner_model),
            critic_model: non_empty(&options.critic_model),
            enable_refinement: options.enable_refinement,
            max_refinement_iterations: options.max_refinement_iterations,
        })
    }
}

impl TryFrom<OrchestrationOptions> for OrchestrationConfig {
    type Error = TokenhubError;

    fn try_from(options: OrchestrationOptions) -> Result<Self, Self::Error> {
        Self::try_from(&options)
    }
}

impl From<&OrchestrationConfig> for OrchestrationOptions {
    fn from(config: &OrchestrationConfig) -> Self {
        Self {
            mode: config.mode.to_string(),
            planner_model: config.planner_model.clone(),
            critic_model: config.critic_model.clone(),
            enable_refinement: config.enable_refinement,
            max_refinement_iterations: config.max_refinement_iterations,
        }
    }
}

fn non_empty(model: &Option<String>) -> Option<String> {
    model.as_deref().filter(|m| !m.is_empty()).map(str::to_string)
}

// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Tokenhub.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};
use tokenhub_core::{ModelRecord, RoutingPolicy};

/// Top-level Tokenhub configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to a self-contained mock setup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TokenhubConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub hub: HubConfig,

    /// Default routing policy applied when a caller supplies none.
    #[serde(default)]
    pub routing: RoutingPolicy,

    /// Default orchestration settings applied when a caller supplies none.
    #[serde(default)]
    pub orchestration: OrchestrationOptions,

    /// Model catalog seed. Replaces the built-in catalog when present.
    #[serde(default = "default_models")]
    pub models: Vec<ModelRecord>,

    /// Provider directory seed. Replaces the built-in directory when present.
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderConfig>,
}

impl Default for TokenhubConfig {
    fn default() -> Self {
        Self {
            hub: HubConfig::default(),
            routing: RoutingPolicy::default(),
            orchestration: OrchestrationOptions::default(),
            models: default_models(),
            providers: default_providers(),
        }
    }
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HubConfig {
    /// Display name of this hub instance.
    #[serde(default = "default_hub_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            name: default_hub_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_hub_name() -> String {
    "tokenhub".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Orchestration settings in wire form.
///
/// `mode` stays a string here so that an unrecognized tag surfaces as a
/// distinct error when converted into an orchestration config, rather than
/// as a generic deserialization failure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OrchestrationOptions {
    /// `"simple"` or `"adversarial"`.
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Model pinned for plan and refinement steps. `None` lets routing choose.
    #[serde(default)]
    pub planner_model: Option<String>,

    /// Model pinned for the critique step. `None` lets routing choose.
    #[serde(default)]
    pub critic_model: Option<String>,

    #[serde(default)]
    pub enable_refinement: bool,

    #[serde(default = "default_max_refinement_iterations")]
    pub max_refinement_iterations: u32,
}

impl Default for OrchestrationOptions {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            planner_model: None,
            critic_model: None,
            enable_refinement: false,
            max_refinement_iterations: default_max_refinement_iterations(),
        }
    }
}

fn default_mode() -> String {
    "simple".to_string()
}

fn default_max_refinement_iterations() -> u32 {
    1
}

/// A provider instance to construct at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Directory key; catalog records reference this name.
    pub name: String,

    /// Factory tag (e.g. `"mock"`).
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Inline API key. Prefer `api_key_env` outside of development.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Environment variable holding the API key. Defaults to `<NAME>_API_KEY`.
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Models this provider advertises.
    #[serde(default)]
    pub models: Vec<String>,
}

fn default_models() -> Vec<ModelRecord> {
    vec![
        ModelRecord::new("mock-gpt-3.5", "mock", 0.002, 4096, 50),
        ModelRecord::new("mock-gpt-4", "mock", 0.03, 8192, 100),
    ]
}

fn default_providers() -> Vec<ProviderConfig> {
    vec![ProviderConfig {
        name: "mock".to_string(),
        provider_type: "mock".to_string(),
        api_key: Some("mock-key".to_string()),
        api_key_env: None,
        models: vec!["mock-gpt-3.5".to_string(), "mock-gpt-4".to_string()],
    }]
}

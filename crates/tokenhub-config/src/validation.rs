// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as unique model names, non-negative costs, and provider references.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::TokenhubConfig;

/// Orchestration mode tags accepted in `[orchestration] mode`.
pub const KNOWN_MODES: &[&str] = &["simple", "adversarial"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TokenhubConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.hub.name.trim().is_empty() {
        errors.push(validation("hub.name must not be empty"));
    }

    if let Some(ceiling) = config.routing.max_cost_per_1k_tokens
        && ceiling < 0.0
    {
        errors.push(validation(format!(
            "routing.max_cost_per_1k_tokens must be non-negative, got {ceiling}"
        )));
    }

    if !KNOWN_MODES.contains(&config.orchestration.mode.as_str()) {
        errors.push(validation(format!(
            "orchestration.mode `{}` is not one of: {}",
            config.orchestration.mode,
            KNOWN_MODES.join(", ")
        )));
    }

    let mut provider_names = HashSet::new();
    for (i, provider) in config.providers.iter().enumerate() {
        if provider.name.trim().is_empty() {
            errors.push(validation(format!("providers[{i}].name must not be empty")));
        }
        if !provider_names.insert(provider.name.as_str()) {
            errors.push(validation(format!(
                "duplicate provider name `{}` in [[providers]] array",
                provider.name
            )));
        }
    }

    let mut model_names = HashSet::new();
    for (i, model) in config.models.iter().enumerate() {
        if model.name.trim().is_empty() {
            errors.push(validation(format!("models[{i}].name must not be empty")));
        }
        if !model_names.insert(model.name.as_str()) {
            errors.push(validation(format!(
                "duplicate model name `{}` in [[models]] array",
                model.name
            )));
        }
        if model.cost_per_1k_tokens < 0.0 || model.cost_per_1k_tokens.is_nan() {
            errors.push(validation(format!(
                "models[{i}].cost_per_1k_tokens must be non-negative, got {}",
                model.cost_per_1k_tokens
            )));
        }
        if model.context_size == 0 {
            errors.push(validation(format!(
                "models[{i}].context_size must be positive"
            )));
        }
        if !provider_names.contains(model.provider.as_str()) {
            errors.push(validation(format!(
                "model `{}` references undeclared provider `{}`",
                model.name, model.provider
            )));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validation(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokenhub_core::ModelRecord;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&TokenhubConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = TokenhubConfig::default();
        config.orchestration.mode = "debate".to_string();
        config.routing.max_cost_per_1k_tokens = Some(-1.0);
        config
            .models
            .push(ModelRecord::new("mock-gpt-4", "mock", -0.5, 0, 1));

        let errors = validate_config(&config).unwrap_err();
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();

        assert_eq!(errors.len(), 5, "got: {messages:?}");
        assert!(messages.iter().any(|m| m.contains("orchestration.mode")));
        assert!(messages.iter().any(|m| m.contains("duplicate model name")));
        assert!(messages.iter().any(|m| m.contains("context_size")));
    }

    #[test]
    fn model_must_reference_declared_provider() {
        let mut config = TokenhubConfig::default();
        config
            .models
            .push(ModelRecord::new("gpt-x", "openai", 0.01, 16384, 10));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("undeclared provider `openai`"));
    }
}

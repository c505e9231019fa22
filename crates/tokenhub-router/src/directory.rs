// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider directory: maps a provider identifier to its model-call capability.
//!
//! Provider instances are created through a registration table that maps a
//! type tag (e.g. `"mock"`) to a [`ProviderFactory`]. Pre-built adapters can
//! also be inserted directly.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use arc_swap::ArcSwap;
use secrecy::SecretString;
use tokenhub_config::ProviderConfig;
use tokenhub_core::{ModelProvider, TokenhubError};
use tracing::{info, warn};

use crate::mock::MockProviderFactory;

/// Resolved settings handed to a factory.
pub struct ProviderSettings {
    pub api_key: SecretString,
    pub models: Vec<String>,
}

/// Constructs provider instances for one type tag.
pub trait ProviderFactory: Send + Sync {
    /// The type tag this factory is registered under.
    fn provider_type(&self) -> &str;

    /// Create a provider instance named `name`.
    fn create(
        &self,
        name: &str,
        settings: ProviderSettings,
    ) -> Result<Arc<dyn ModelProvider>, TokenhubError>;
}

/// Directory of live provider instances plus the factory table used to build them.
pub struct ProviderDirectory {
    factories: HashMap<String, Box<dyn ProviderFactory>>,
    providers: ArcSwap<HashMap<String, Arc<dyn ModelProvider>>>,
}

impl ProviderDirectory {
    /// Create a directory with the built-in `mock` factory registered.
    pub fn new() -> Self {
        let mut directory = Self {
            factories: HashMap::new(),
            providers: ArcSwap::from_pointee(HashMap::new()),
        };
        directory.register_factory(Box::new(MockProviderFactory));
        directory
    }

    /// Build a directory from `[[providers]]` config entries.
    pub fn from_config(providers: &[ProviderConfig]) -> Result<Self, TokenhubError> {
        let directory = Self::new();
        for provider in providers {
            directory.add_provider(provider)?;
        }
        Ok(directory)
    }

    /// Register (or replace) the factory for a type tag.
    pub fn register_factory(&mut self, factory: Box<dyn ProviderFactory>) {
        self.factories
            .insert(factory.provider_type().to_string(), factory);
    }

    /// Construct a provider from config and add it under `config.name`.
    ///
    /// The credential is taken from `api_key`, then from the environment
    /// variable named by `api_key_env` (default `<NAME>_API_KEY`).
    pub fn add_provider(&self, config: &ProviderConfig) -> Result<(), TokenhubError> {
        let api_key = resolve_api_key(config)?;

        let factory = self.factories.get(&config.provider_type).ok_or_else(|| {
            TokenhubError::UnknownProviderType {
                provider_type: config.provider_type.clone(),
            }
        })?;

        let provider = factory.create(
            &config.name,
            ProviderSettings {
                api_key,
                models: config.models.clone(),
            },
        )?;

        info!(
            provider = config.name.as_str(),
            provider_type = config.provider_type.as_str(),
            "provider added"
        );
        self.insert(&config.name, provider);
        Ok(())
    }

    /// Add a pre-built provider under `name`, replacing any existing entry.
    pub fn insert(&self, name: &str, provider: Arc<dyn ModelProvider>) {
        self.providers.rcu(|current| {
            let mut next = HashMap::clone(current);
            next.insert(name.to_string(), provider.clone());
            next
        });
    }

    /// Look up the capability registered for a provider id.
    pub fn get_provider(&self, name: &str) -> Option<Arc<dyn ModelProvider>> {
        self.providers.load().get(name).cloned()
    }

    /// Remove a provider. Returns `false` if it was not registered.
    pub fn remove_provider(&self, name: &str) -> bool {
        let mut removed = false;
        self.providers.rcu(|current| {
            let mut next = HashMap::clone(current);
            removed = next.remove(name).is_some();
            next
        });
        removed
    }

    /// Registered provider ids, sorted.
    pub fn list_providers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.load().keys().cloned().collect();
        names.sort();
        names
    }

    /// Check every provider's credential.
    pub async fn validate_all(&self) -> BTreeMap<String, bool> {
        let providers = self.providers.load_full();
        let mut results = BTreeMap::new();
        for (name, provider) in providers.iter() {
            let valid = provider.validate_credential().await;
            if !valid {
                warn!(provider = name.as_str(), "provider credential rejected");
            }
            results.insert(name.clone(), valid);
        }
        results
    }
}

impl Default for ProviderDirectory {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_api_key(config: &ProviderConfig) -> Result<SecretString, TokenhubError> {
    if let Some(key) = &config.api_key {
        return Ok(SecretString::from(key.clone()));
    }

    let var = config
        .api_key_env
        .clone()
        .unwrap_or_else(|| default_key_var(&config.name));

    std::env::var(&var)
        .map(SecretString::from)
        .map_err(|_| TokenhubError::MissingCredential {
            provider: config.name.clone(),
        })
}

/// `<NAME>_API_KEY`, with non-alphanumerics folded to `_`.
fn default_key_var(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}_API_KEY")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn mock_config(name: &str, api_key: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            name: name.to_string(),
            provider_type: "mock".to_string(),
            api_key: api_key.map(str::to_string),
            api_key_env: None,
            models: vec![],
        }
    }

    #[test]
    fn builds_mock_provider_from_config() {
        let directory =
            ProviderDirectory::from_config(&[mock_config("mock", Some("key"))]).unwrap();
        assert_eq!(directory.list_providers(), ["mock"]);
        assert_eq!(directory.get_provider("mock").unwrap().name(), "mock");
        assert!(directory.get_provider("openai").is_none());
    }

    #[test]
    fn unknown_type_tag_is_rejected() {
        let directory = ProviderDirectory::new();
        let mut config = mock_config("vllm", Some("key"));
        config.provider_type = "vllm".to_string();

        let err = directory.add_provider(&config).unwrap_err();
        assert!(matches!(err, TokenhubError::UnknownProviderType { provider_type } if provider_type == "vllm"));
    }

    #[test]
    #[serial]
    fn credential_falls_back_to_environment() {
        // SAFETY: serialized with the other env-touching tests.
        unsafe { std::env::set_var("EDGE_MOCK_API_KEY", "from-env") };
        let directory = ProviderDirectory::new();
        directory
            .add_provider(&mock_config("edge-mock", None))
            .unwrap();
        unsafe { std::env::remove_var("EDGE_MOCK_API_KEY") };
        assert!(directory.get_provider("edge-mock").is_some());
    }

    #[test]
    #[serial]
    fn missing_credential_is_an_error() {
        unsafe { std::env::remove_var("KEYLESS_API_KEY") };
        let directory = ProviderDirectory::new();
        let err = directory
            .add_provider(&mock_config("keyless", None))
            .unwrap_err();
        assert!(matches!(err, TokenhubError::MissingCredential { provider } if provider == "keyless"));
    }

    #[test]
    fn remove_reports_presence() {
        let directory =
            ProviderDirectory::from_config(&[mock_config("mock", Some("key"))]).unwrap();
        assert!(directory.remove_provider("mock"));
        assert!(!directory.remove_provider("mock"));
        assert!(directory.list_providers().is_empty());
    }

    #[tokio::test]
    async fn validate_all_reports_each_provider() {
        let directory = ProviderDirectory::from_config(&[
            mock_config("good", Some("key")),
            mock_config("empty", Some("")),
        ])
        .unwrap();
        let results = directory.validate_all().await;
        assert_eq!(results.get("good"), Some(&true));
        assert_eq!(results.get("empty"), Some(&false));
    }

    #[test]
    fn default_key_var_folds_punctuation() {
        assert_eq!(default_key_var("open-ai.eu"), "OPEN_AI_EU_API_KEY");
    }
}

// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring from a loaded [`TokenhubConfig`] to live engines.

use std::sync::Arc;

use tokenhub_config::TokenhubConfig;
use tokenhub_core::TokenhubError;
use tokenhub_orchestrator::{OrchestrationConfig, OrchestrationEngine};
use tokenhub_router::{ModelCatalog, ProviderDirectory, RoutingEngine};
use tracing::info;

/// Catalog, directory and both engines for one process.
pub struct Hub {
    pub catalog: Arc<ModelCatalog>,
    pub directory: Arc<ProviderDirectory>,
    pub routing: Arc<RoutingEngine>,
    pub orchestrator: OrchestrationEngine,
}

impl Hub {
    pub fn from_config(config: &TokenhubConfig) -> Result<Self, TokenhubError> {
        let catalog = Arc::new(ModelCatalog::with_models(config.models.iter().cloned())?);
        let directory = Arc::new(ProviderDirectory::from_config(&config.providers)?);
        let routing = Arc::new(RoutingEngine::with_default_policy(
            catalog.clone(),
            directory.clone(),
            config.routing.clone(),
        ));
        let orchestrator = OrchestrationEngine::with_default_config(
            routing.clone(),
            OrchestrationConfig::try_from(&config.orchestration)?,
        );

        info!(
            hub = config.hub.name.as_str(),
            models = catalog.len(),
            providers = directory.list_providers().len(),
            "hub initialized"
        );

        Ok(Self {
            catalog,
            directory,
            routing,
            orchestrator,
        })
    }
}

// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model catalog: the set of known model records.
//!
//! Records are kept in insertion order, which is the tie-break order used by
//! selection. Readers take an `Arc` snapshot, so a routing call never sees a
//! half-applied registration.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tokenhub_core::{ModelRecord, TokenhubError};
use tracing::debug;

/// Read-mostly catalog of [`ModelRecord`]s keyed by unique name.
pub struct ModelCatalog {
    models: ArcSwap<Vec<ModelRecord>>,
}

impl ModelCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            models: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Create a catalog from seed records, rejecting duplicate names.
    pub fn with_models(
        models: impl IntoIterator<Item = ModelRecord>,
    ) -> Result<Self, TokenhubError> {
        let mut seeded: Vec<ModelRecord> = Vec::new();
        for record in models {
            if seeded.iter().any(|m| m.name == record.name) {
                return Err(TokenhubError::DuplicateModel { name: record.name });
            }
            seeded.push(record);
        }
        Ok(Self {
            models: ArcSwap::from_pointee(seeded),
        })
    }

    /// Register a model. A record with the same name is replaced in place,
    /// keeping its catalog position; new names are appended.
    pub fn register_model(&self, record: ModelRecord) {
        debug!(model = record.name.as_str(), provider = record.provider.as_str(), "registering model");
        self.models.rcu(|current| {
            let mut next = Vec::clone(current);
            match next.iter_mut().find(|m| m.name == record.name) {
                Some(existing) => *existing = record.clone(),
                None => next.push(record.clone()),
            }
            next
        });
    }

    /// Look up a model by name.
    pub fn get_model(&self, name: &str) -> Option<ModelRecord> {
        self.models.load().iter().find(|m| m.name == name).cloned()
    }

    /// Remove a model by name. Returns `false` if it was not registered.
    pub fn remove_model(&self, name: &str) -> bool {
        let mut removed = false;
        self.models.rcu(|current| {
            let next: Vec<ModelRecord> = current.iter().filter(|m| m.name != name).cloned().collect();
            removed = next.len() != current.len();
            next
        });
        removed
    }

    /// List models in catalog order, optionally restricted to one provider.
    pub fn list_models(&self, provider: Option<&str>) -> Vec<ModelRecord> {
        self.models
            .load()
            .iter()
            .filter(|m| provider.is_none_or(|p| m.provider == p))
            .cloned()
            .collect()
    }

    /// A consistent view of the whole catalog.
    pub fn snapshot(&self) -> Arc<Vec<ModelRecord>> {
        self.models.load_full()
    }

    /// Models with at least `min_context` tokens, highest weight first.
    pub fn models_by_context_size(&self, min_context: u64) -> Vec<ModelRecord> {
        let mut models: Vec<ModelRecord> = self
            .models
            .load()
            .iter()
            .filter(|m| m.context_size >= min_context)
            .cloned()
            .collect();
        models.sort_by(|a, b| b.weight.cmp(&a.weight));
        models
    }

    /// Models costing at most `max_cost` per 1k tokens, highest weight first.
    pub fn models_by_max_cost(&self, max_cost: f64) -> Vec<ModelRecord> {
        let mut models: Vec<ModelRecord> = self
            .models
            .load()
            .iter()
            .filter(|m| m.cost_per_1k_tokens <= max_cost)
            .cloned()
            .collect();
        models.sort_by(|a, b| b.weight.cmp(&a.weight));
        models
    }

    /// Export every record in catalog order.
    pub fn export_models(&self) -> Vec<ModelRecord> {
        self.list_models(None)
    }

    /// Import records, replacing same-named entries.
    pub fn import_models(&self, records: impl IntoIterator<Item = ModelRecord>) {
        for record in records {
            self.register_model(record);
        }
    }

    pub fn len(&self) -> usize {
        self.models.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.load().is_empty()
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::new()
    }
}

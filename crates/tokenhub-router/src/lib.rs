// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Policy-driven model routing for Tokenhub.
//!
//! This crate provides:
//! - [`ModelCatalog`]: metadata records for every callable model
//! - [`ProviderDirectory`]: provider id -> capability, built from a type-tag factory table
//! - [`RoutingEngine`]: cost/context/weight selection with single-hop escalation
//!
//! The built-in `mock` provider type ([`MockProvider`]) is always registered.

pub mod catalog;
pub mod directory;
pub mod engine;
pub mod mock;

pub use catalog::ModelCatalog;
pub use directory::{ProviderDirectory, ProviderFactory, ProviderSettings};
pub use engine::{estimate_context_tokens, RoutedResponse, RoutingEngine};
pub use mock::{MockProvider, MockProviderFactory};

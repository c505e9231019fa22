// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request orchestration for Tokenhub.
//!
//! [`OrchestrationEngine`] runs a request either as a single routed call
//! ([`OrchestrationMode::Simple`]) or as a plan, critique, and refine
//! sequence ([`OrchestrationMode::Adversarial`]) on top of
//! [`tokenhub_router::RoutingEngine`].

pub mod config;
pub mod engine;
pub mod result;

pub use config::{OrchestrationConfig, OrchestrationMode, OrchestrationOptions};
pub use engine::OrchestrationEngine;
pub use result::{AdversarialSummary, OrchestrationResult, SummaryValue};

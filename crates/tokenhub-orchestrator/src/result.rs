// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Orchestration outcomes and their flat summary projection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tokenhub_core::Response;

/// Outcome of one orchestration call.
///
/// In simple mode only `final_response` is set and `iterations` is 1. In
/// adversarial mode `plan_response` and `critique_response` are always set,
/// and `iterations` is one more than the number of refinements.
/// `plan_response` is always the first plan, never a later refinement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationResult {
    pub final_response: Response,
    pub iterations: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_response: Option<Response>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critique_response: Option<Response>,
    /// `None` when no refinement ran; never `Some(vec![])`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refinement_responses: Option<Vec<Response>>,
}

impl OrchestrationResult {
    pub(crate) fn simple(response: Response) -> Self {
        Self {
            final_response: response,
            iterations: 1,
            plan_response: None,
            critique_response: None,
            refinement_responses: None,
        }
    }

    pub(crate) fn adversarial(
        plan: Response,
        critique: Response,
        refinements: Vec<Response>,
    ) -> Self {
        let iterations = 1 + refinements.len() as u32;
        let final_response = refinements.last().unwrap_or(&plan).clone();
        Self {
            final_response,
            iterations,
            plan_response: Some(plan),
            critique_response: Some(critique),
            refinement_responses: (!refinements.is_empty()).then_some(refinements),
        }
    }

    /// Number of refinement passes that produced a response.
    pub fn refinement_count(&self) -> usize {
        self.refinement_responses.as_ref().map_or(0, Vec::len)
    }
}

/// A summary field: one text value or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryValue {
    Text(String),
    List(Vec<String>),
}

impl SummaryValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::Text(_) => None,
            Self::List(items) => Some(items),
        }
    }
}

/// Text projection of an [`OrchestrationResult`], keyed by field name.
pub type AdversarialSummary = BTreeMap<String, SummaryValue>;

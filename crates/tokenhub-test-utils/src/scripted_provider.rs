// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted model provider for deterministic testing.
//!
//! `ScriptedProvider` implements `ModelProvider` with a queue of canned
//! outcomes and records every call it receives, so tests can assert on
//! the exact model names and conversations the engines produced.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tokenhub_core::{ModelProvider, Request, Response, TokenhubError};

/// One invocation seen by a [`ScriptedProvider`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub request: Request,
}

enum Outcome {
    Reply(String),
    Fail(String),
}

/// A provider that answers from a FIFO script.
///
/// When the script is empty, replies with `"{name}:{model}#{n}"` where `n`
/// counts calls from 1. Models marked with [`ScriptedProvider::fail_model`]
/// always fail, regardless of the script.
pub struct ScriptedProvider {
    name: String,
    script: Arc<Mutex<VecDeque<Outcome>>>,
    failing_models: Arc<Mutex<HashSet<String>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    credential_valid: bool,
}

impl ScriptedProvider {
    /// Create a provider with an empty script.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            failing_models: Arc::new(Mutex::new(HashSet::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            credential_valid: true,
        }
    }

    /// Create a provider pre-loaded with successful replies.
    pub fn with_replies(name: impl Into<String>, replies: Vec<String>) -> Self {
        Self {
            script: Arc::new(Mutex::new(
                replies.into_iter().map(Outcome::Reply).collect(),
            )),
            ..Self::new(name)
        }
    }

    /// Make `validate_credential` report a rejected key.
    pub fn with_invalid_credential(mut self) -> Self {
        self.credential_valid = false;
        self
    }

    /// Queue a successful reply.
    pub async fn push_reply(&self, content: impl Into<String>) {
        self.script.lock().await.push_back(Outcome::Reply(content.into()));
    }

    /// Queue a failure.
    pub async fn push_failure(&self, message: impl Into<String>) {
        self.script.lock().await.push_back(Outcome::Fail(message.into()));
    }

    /// Make every call for `model` fail.
    pub async fn fail_model(&self, model: impl Into<String>) {
        self.failing_models.lock().await.insert(model.into());
    }

    /// All calls received so far, in order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    /// Model names of all calls received so far, in order.
    pub async fn called_models(&self) -> Vec<String> {
        self.calls
            .lock()
            .await
            .iter()
            .map(|c| c.model.clone())
            .collect()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, model: &str, request: &Request) -> Result<Response, TokenhubError> {
        let n = {
            let mut calls = self.calls.lock().await;
            calls.push(RecordedCall {
                model: model.to_string(),
                request: request.clone(),
            });
            calls.len()
        };

        if self.failing_models.lock().await.contains(model) {
            return Err(TokenhubError::provider(format!(
                "scripted failure for model {model}"
            )));
        }

        let content = match self.script.lock().await.pop_front() {
            Some(Outcome::Reply(text)) => text,
            Some(Outcome::Fail(message)) => return Err(TokenhubError::provider(message)),
            None => format!("{}:{model}#{n}", self.name),
        };

        Ok(Response {
            content,
            model: model.to_string(),
            tokens_used: 10,
            finish_reason: "stop".to_string(),
        })
    }

    async fn list_available_models(&self) -> Result<Vec<String>, TokenhubError> {
        let mut seen: Vec<String> = Vec::new();
        for call in self.calls.lock().await.iter() {
            if !seen.contains(&call.model) {
                seen.push(call.model.clone());
            }
        }
        Ok(seen)
    }

    async fn validate_credential(&self) -> bool {
        self.credential_valid
    }
}

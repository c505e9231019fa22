// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Tokenhub integration tests.
//!
//! Provides scripted providers and a harness that wires a catalog,
//! provider directory, and both engines together without external services.
//!
//! # Components
//!
//! - [`ScriptedProvider`] - Provider with queued replies and failures that records every call
//! - [`TestHarness`] - Pre-assembled routing and orchestration stack

pub mod harness;
pub mod scripted_provider;

pub use harness::TestHarness;
pub use scripted_provider::{RecordedCall, ScriptedProvider};

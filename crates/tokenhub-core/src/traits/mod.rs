// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits implemented by backend adapters.
//!
//! Adapters use `#[async_trait]` for dynamic dispatch compatibility, so the
//! engines can hold them as `Arc<dyn ModelProvider>`.

pub mod provider;

pub use provider::ModelProvider;

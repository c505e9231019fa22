// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Tokenhub.
//!
//! This crate provides the data model shared by the routing and orchestration
//! engines, the [`ModelProvider`] capability every backend adapter implements,
//! and the [`TokenhubError`] type used across the workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ErrorKind, TokenhubError};
pub use traits::ModelProvider;
pub use types::{Message, ModelRecord, Request, Response, Role, RoutingPolicy};

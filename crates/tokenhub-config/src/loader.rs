// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tokenhub.toml` > `~/.config/tokenhub/tokenhub.toml` > `/etc/tokenhub/tokenhub.toml`
//! with environment variable overrides via `TOKENHUB_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TokenhubConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tokenhub/tokenhub.toml`
/// 3. `~/.config/tokenhub/tokenhub.toml`
/// 4. `./tokenhub.toml`
/// 5. `TOKENHUB_*` environment variables
pub fn load_config() -> Result<TokenhubConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<TokenhubConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TokenhubConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TokenhubConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TokenhubConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for XDG loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TokenhubConfig::default()))
        .merge(Toml::file("/etc/tokenhub/tokenhub.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("tokenhub/tokenhub.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("tokenhub.toml"))
        .merge(env_provider())
}

/// Environment provider mapping `TOKENHUB_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")`: keys such as
/// `TOKENHUB_ROUTING_MAX_COST_PER_1K_TOKENS` contain underscores and must map
/// to `routing.max_cost_per_1k_tokens`.
pub fn env_provider() -> Env {
    Env::prefixed("TOKENHUB_").map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        for section in ENV_SECTIONS {
            if let Some(rest) = key_str
                .strip_prefix(section)
                .and_then(|r| r.strip_prefix('_'))
            {
                return format!("{section}.{rest}").into();
            }
        }
        key_str.into()
    })
}

/// Config sections addressable from the environment.
const ENV_SECTIONS: &[&str] = &["hub", "routing", "orchestration"];

// SPDX-FileCopyrightText: 2026 Tokenhub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tokenhub models` and `tokenhub providers` command implementations.

use std::io::IsTerminal;

use tokenhub_core::{ModelRecord, TokenhubError};

use crate::hub::Hub;

/// Run the `tokenhub models` command.
pub fn run_models(hub: &Hub, provider: Option<&str>, json: bool) -> Result<(), TokenhubError> {
    let models = hub.catalog.list_models(provider);

    if json {
        let rendered = serde_json::to_string_pretty(&models)
            .map_err(|e| TokenhubError::Internal(format!("failed to render models: {e}")))?;
        println!("{rendered}");
        return Ok(());
    }

    println!();
    println!(
        "  {:<24} {:<12} {:>10} {:>9} {:>7}",
        "model", "provider", "$/1k", "context", "weight"
    );
    println!("  {}", "-".repeat(66));
    for model in &models {
        println!("{}", model_row(model));
    }
    println!();
    Ok(())
}

fn model_row(model: &ModelRecord) -> String {
    format!(
        "  {:<24} {:<12} {:>10.4} {:>9} {:>7}",
        model.name, model.provider, model.cost_per_1k_tokens, model.context_size, model.weight
    )
}

/// Run the `tokenhub providers` command.
///
/// Validates every provider credential. Returns an error if any is rejected.
pub async fn run_providers(hub: &Hub, plain: bool) -> Result<(), TokenhubError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let results = hub.directory.validate_all().await;

    println!();
    println!("  tokenhub providers");
    println!("  {}", "-".repeat(50));

    let mut rejected = 0;
    for (name, valid) in &results {
        let line = match (valid, use_color) {
            (true, true) => {
                use colored::Colorize;
                format!("    {} {name}", "✓".green())
            }
            (true, false) => format!("    [OK]   {name}"),
            (false, true) => {
                use colored::Colorize;
                format!("    {} {}", "✗".red(), name.red())
            }
            (false, false) => format!("    [FAIL] {name}"),
        };
        if !valid {
            rejected += 1;
        }
        println!("{line}");
    }
    println!();

    if rejected > 0 {
        return Err(TokenhubError::Config(format!(
            "{rejected} provider credential(s) rejected"
        )));
    }
    Ok(())
}

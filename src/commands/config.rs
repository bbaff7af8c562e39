// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Effective configuration display

use super::CommandContext;
use anyhow::{Context, Result};

/// Print the effective configuration
pub fn run(ctx: &CommandContext) -> Result<()> {
    tracing::info!("Printing effective configuration");
    let rendered = if ctx.json {
        serde_json::to_string_pretty(&ctx.config)?
    } else {
        toml::to_string_pretty(&ctx.config).context("Failed to render configuration")?
    };
    println!("{rendered}");
    Ok(())
}

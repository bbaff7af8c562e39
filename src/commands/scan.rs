// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Scan command - discovers git checkouts and registers them

use super::CommandContext;
use crate::git::GixRemotes;
use crate::scanner::{ScanConfig, Scanner};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Run the scan command
pub async fn run(
    ctx: &CommandContext,
    path: PathBuf,
    depth: Option<usize>,
    dry_run: bool,
) -> Result<()> {
    let out = &ctx.output;
    info!("Scanning: {:?}", path);

    if dry_run {
        out.warn("Dry run mode - no changes will be made");
    }

    // Build scan config from flags, falling back to the config file
    let config = ScanConfig {
        max_depth: depth.unwrap_or(ctx.config.scan.depth),
        dry_run,
        ignore: ctx.config.scan.ignore.clone(),
    };

    out.info(format!("Scanning directory: {}", path.display()));
    out.info(format!("Maximum depth: {}", config.max_depth));

    let scanner = Scanner::new(config, ctx.config.hosts().cloned().collect(), Arc::new(GixRemotes))
        .context("Invalid scan configuration")?;
    let registry = ctx.registry()?;

    // Perform the scan
    let report = scanner
        .scan(&path, &registry)
        .await
        .with_context(|| format!("Failed to scan {}", path.display()))?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&report.registered)?);
    } else {
        for record in &report.registered {
            out.info(format!("Found: {}", out.record(record)));
        }
    }

    if !report.skipped.is_empty() {
        out.warn(format!(
            "Skipped {} git checkouts without a resolvable origin remote",
            report.skipped.len()
        ));
    }

    if report.dry_run {
        out.success(format!(
            "Dry run completed successfully! Would register {} repositories under {}.",
            report.found(),
            report.root.display()
        ));
    } else {
        out.success(format!(
            "Scan completed successfully! Found {} repositories under {}.",
            report.found(),
            report.root.display()
        ));
    }

    Ok(())
}

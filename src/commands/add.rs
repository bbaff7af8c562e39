// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Add command - clone a repository into its canonical location and register it

use super::CommandContext;
use crate::git;
use crate::identity;
use crate::types::ProjectRecord;
use anyhow::{bail, Context, Result};
use tokio::process::Command;
use tracing::debug;

const STEPS: usize = 4;

/// Run the add command
pub async fn run(ctx: &CommandContext, repo: &str, dry_run: bool) -> Result<()> {
    let out = &ctx.output;

    if dry_run {
        out.warn("Dry run mode - no changes will be made");
    }
    out.info(format!("Initializing repository clone from {repo}"));

    out.step(1, STEPS, "Parsing repository URL...");
    let parsed = identity::parse(repo, ctx.config.hosts())?;
    let target = identity::target_dir(&ctx.config, &parsed);
    let url = identity::source_url(repo, &parsed);

    out.step(2, STEPS, format!("Creating directory: {}", target.display()));
    let already_cloned = git::is_working_tree(&target);
    if !dry_run && !already_cloned {
        tokio::fs::create_dir_all(&target)
            .await
            .with_context(|| format!("Failed to create {}", target.display()))?;
    }

    out.step(3, STEPS, "Cloning repository...");
    if dry_run {
        out.info(format!("Would clone {url} to {}", target.display()));
        out.success("Dry run completed successfully!");
        out.info(format!("Location: {}", target.display()));
        return Ok(());
    }

    if already_cloned {
        out.warn(format!(
            "{} is already a git checkout; registering it without cloning",
            target.display()
        ));
    } else {
        debug!("git clone {url} {}", target.display());
        let status = Command::new("git")
            .arg("clone")
            .arg(&url)
            .arg(&target)
            .status()
            .await
            .context("Failed to run git")?;
        if !status.success() {
            bail!("git clone {url} failed ({status})");
        }
    }

    out.step(4, STEPS, "Saving project information...");
    let registry = ctx.registry()?;
    registry
        .upsert(ProjectRecord::new(parsed.identity, target.clone()))
        .context("Failed to save project information")?;

    out.success("Repository cloned successfully!");
    out.info(format!("Location: {}", target.display()));
    Ok(())
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Go command - resolve a keyword to a registered checkout
//!
//! On a unique match the `cd` line is the only thing written to stdout, so a
//! shell function can `eval "$(vpm go foo)"`.

use super::CommandContext;
use crate::matcher::{self, Lookup};
use crate::types::ProjectRecord;
use anyhow::{bail, Result};
use std::path::Path;

/// Run the go command
pub fn run(ctx: &CommandContext, keyword: &str, first: bool) -> Result<()> {
    let out = &ctx.output;
    let projects = ctx.registry()?.get_all()?;

    if projects.is_empty() {
        out.warn("No projects found. Please add some projects first using \"vpm add\" or \"vpm scan\"");
        bail!("No projects registered");
    }

    match matcher::lookup(&projects, keyword) {
        Lookup::None => {
            out.warn(format!("No projects found matching \"{keyword}\""));
            out.info("Available projects:");
            for project in &projects {
                out.info(format!("  {}", out.record(project)));
            }
            bail!("No projects match \"{keyword}\"");
        }
        Lookup::One(project) => navigate(ctx, project),
        Lookup::Many(found) if first => navigate(ctx, found[0]),
        Lookup::Many(found) => {
            out.info(format!("Found {} projects matching \"{keyword}\":", found.len()));
            for (i, project) in found.iter().enumerate() {
                out.info(format!(
                    "  {}. {} ({})",
                    i + 1,
                    out.record(project),
                    project.path.display()
                ));
            }
            bail!(
                "{} projects match \"{keyword}\"; use a more specific keyword or pass --first",
                found.len()
            );
        }
    }
}

fn navigate(ctx: &CommandContext, project: &ProjectRecord) -> Result<()> {
    let out = &ctx.output;
    out.info(format!("Navigating to {}", out.record(project)));
    out.info(format!("Path: {}", project.path.display()));

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(project)?);
    } else {
        println!("{}", cd_command(&project.path));
    }
    Ok(())
}

/// Shell line that changes into `path`
#[must_use]
pub fn cd_command(path: &Path) -> String {
    format!("cd \"{}\"", path.display())
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! List command - show registered projects as a table or a host/owner tree

use super::CommandContext;
use crate::output::{Output, Tone};
use crate::types::ProjectRecord;
use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};

/// Listing layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ListFormat {
    /// One row per project
    #[default]
    Table,
    /// Grouped by host, then owner
    Tree,
}

/// Run the list command
pub fn run(
    ctx: &CommandContext,
    host: Option<&str>,
    dir: Option<PathBuf>,
    format: ListFormat,
) -> Result<()> {
    let out = &ctx.output;
    let mut projects = ctx.registry()?.get_all()?;

    if let Some(host) = host {
        projects.retain(|p| p.hostname == host);
    }
    if let Some(dir) = dir {
        let dir = if dir.is_absolute() {
            dir
        } else {
            std::env::current_dir()
                .context("Failed to resolve current directory")?
                .join(dir)
        };
        projects.retain(|p| p.path.starts_with(&dir));
    }

    if projects.is_empty() {
        out.warn("No projects found matching the criteria");
        return Ok(());
    }

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }

    out.info(format!("Found {} projects", projects.len()));
    let lines = match format {
        ListFormat::Table => render_table(&projects, &ctx.config.base_dir),
        ListFormat::Tree => render_tree(&projects, &ctx.config.base_dir, out),
    };
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

/// Aligned table with a header row and a rule
#[must_use]
pub fn render_table(projects: &[ProjectRecord], base_dir: &Path) -> Vec<String> {
    let rows: Vec<[String; 5]> = projects
        .iter()
        .map(|p| {
            [
                p.hostname.clone(),
                p.owner.clone(),
                p.repo.clone(),
                display_path(&p.path, base_dir),
                format_date(p),
            ]
        })
        .collect();

    let header = ["Host", "Owner", "Repository", "Path", "Added At"];
    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[&str]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header_line = format_row(&header);
    let rule = "─".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1));
    let mut lines = vec![header_line, rule];
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(format_row(&cells));
    }
    lines
}

/// Projects grouped by host, then owner, each group in registry order
#[must_use]
pub fn render_tree(projects: &[ProjectRecord], base_dir: &Path, out: &Output) -> Vec<String> {
    let mut grouped: Vec<(&str, Vec<(&str, Vec<&ProjectRecord>)>)> = Vec::new();
    for project in projects {
        let owners = group(&mut grouped, project.hostname.as_str());
        group(owners, project.owner.as_str()).push(project);
    }

    let mut lines = Vec::new();
    for (host, owners) in grouped {
        lines.push(out.paint(host, Tone::Host));
        for (owner, repos) in owners {
            lines.push(format!("  {}", out.paint(owner, Tone::Owner)));
            for project in repos {
                lines.push(format!("    {}", out.paint(&project.repo, Tone::Repo)));
                lines.push(format!(
                    "      {} {}",
                    out.paint("Path:", Tone::Dim),
                    display_path(&project.path, base_dir)
                ));
                lines.push(format!("      {} {}", out.paint("Added:", Tone::Dim), format_date(project)));
            }
        }
    }
    lines
}

/// Group for `key`, appended on first sight
fn group<'a, K: PartialEq, V: Default>(groups: &'a mut Vec<(K, V)>, key: K) -> &'a mut V {
    let index = match groups.iter().position(|(k, _)| *k == key) {
        Some(index) => index,
        None => {
            groups.push((key, V::default()));
            groups.len() - 1
        }
    };
    &mut groups[index].1
}

/// Paths under the base directory are shown relative to it
fn display_path(path: &Path, base_dir: &Path) -> String {
    path.strip_prefix(base_dir)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn format_date(project: &ProjectRecord) -> String {
    project
        .added_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod add;
pub mod completions;
pub mod config;
pub mod go;
pub mod list;
pub mod scan;

use crate::config::Config;
use crate::output::Output;
use crate::registry::Registry;
use anyhow::{Context, Result};

/// Everything a command needs from the invocation
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Effective configuration
    pub config: Config,
    /// Terminal reporter
    pub output: Output,
    /// Print machine-readable JSON instead of text
    pub json: bool,
}

impl CommandContext {
    /// Open the registry under the configured cache directory
    pub fn registry(&self) -> Result<Registry> {
        Registry::open(&self.config.cache_dir).with_context(|| {
            format!("Failed to open registry at {}", self.config.cache_dir.display())
        })
    }
}

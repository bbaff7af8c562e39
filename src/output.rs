// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! User-facing terminal messages
//!
//! Messages go to stderr so stdout carries only command results
//! (`cd` lines, listings, JSON).

use crate::types::{Identity, ProjectRecord};
use owo_colors::OwoColorize;
use std::fmt::Display;

/// Terminal reporter handed to every command
#[derive(Debug, Clone, Copy)]
pub struct Output {
    color: bool,
    quiet: bool,
}

impl Output {
    /// Create a reporter
    #[must_use]
    pub fn new(color: bool, quiet: bool) -> Self {
        Self { color, quiet }
    }

    /// No colors, nothing suppressed
    #[must_use]
    pub fn plain() -> Self {
        Self::new(false, false)
    }

    /// Informational message
    pub fn info(&self, message: impl Display) {
        if !self.quiet {
            eprintln!("{} {message}", self.paint("ℹ", Tone::Info));
        }
    }

    /// Completion message
    pub fn success(&self, message: impl Display) {
        if !self.quiet {
            eprintln!("{} {message}", self.paint("✔", Tone::Success));
        }
    }

    /// Something was skipped or looks off; never suppressed
    pub fn warn(&self, message: impl Display) {
        eprintln!("{} {message}", self.paint("⚠", Tone::Warn));
    }

    /// Failure; never suppressed
    pub fn error(&self, message: impl Display) {
        eprintln!("{} {message}", self.paint("✖", Tone::Error));
    }

    /// Numbered step of a multi-step operation
    pub fn step(&self, step: usize, total: usize, message: impl Display) {
        if !self.quiet {
            let counter = format!("[{step}/{total}]");
            eprintln!("{} {message}", self.paint(&counter, Tone::Step));
        }
    }

    /// `hostname/owner/repo` with each part colored
    #[must_use]
    pub fn identity(&self, identity: &Identity) -> String {
        format!(
            "{}/{}/{}",
            self.paint(&identity.hostname, Tone::Host),
            self.paint(&identity.owner, Tone::Owner),
            self.paint(&identity.repo, Tone::Repo),
        )
    }

    /// Colored identity of a record
    #[must_use]
    pub fn record(&self, record: &ProjectRecord) -> String {
        self.identity(&record.identity())
    }

    /// Apply a tone when colors are enabled
    #[must_use]
    pub fn paint(&self, text: &str, tone: Tone) -> String {
        if !self.color {
            return text.to_string();
        }
        match tone {
            Tone::Info => text.blue().to_string(),
            Tone::Success | Tone::Repo => text.green().to_string(),
            Tone::Warn | Tone::Owner => text.yellow().to_string(),
            Tone::Error => text.red().to_string(),
            Tone::Step | Tone::Host => text.cyan().to_string(),
            Tone::Dim => text.dimmed().to_string(),
        }
    }
}

/// Color roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Informational prefix
    Info,
    /// Success prefix
    Success,
    /// Warning prefix
    Warn,
    /// Error prefix
    Error,
    /// Step counter
    Step,
    /// Hostname part
    Host,
    /// Owner part
    Owner,
    /// Repository part
    Repo,
    /// Labels and secondary text
    Dim,
}

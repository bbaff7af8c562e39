// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! vpm library - find, register and jump between local git checkouts
//!
//! This crate provides the repository discovery and project registry:
//! a bounded filesystem scanner that resolves each checkout's identity from
//! its `origin` remote, and a per-host registry that persists it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod commands;
pub mod config;
pub mod error;
pub mod git;
pub mod identity;
pub mod matcher;
pub mod output;
pub mod registry;
pub mod scanner;

/// Core data types shared by the scanner, registry and commands
pub mod types {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use std::path::PathBuf;

    // =========================================================================
    // Identity
    // =========================================================================

    /// Canonical name of a remote repository, independent of where it is
    /// checked out locally
    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Identity {
        /// Remote host, e.g. `github.com`
        pub hostname: String,
        /// Owner or namespace path segment
        pub owner: String,
        /// Repository name, never carrying a `.git` suffix
        pub repo: String,
    }

    impl Identity {
        /// Build an identity from its three parts
        pub fn new(
            hostname: impl Into<String>,
            owner: impl Into<String>,
            repo: impl Into<String>,
        ) -> Self {
            Self {
                hostname: hostname.into(),
                owner: owner.into(),
                repo: repo.into(),
            }
        }
    }

    impl fmt::Display for Identity {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}/{}/{}", self.hostname, self.owner, self.repo)
        }
    }

    // =========================================================================
    // Project Record
    // =========================================================================

    /// A registered checkout: identity plus where it lives on disk
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProjectRecord {
        /// Remote host
        pub hostname: String,
        /// Owner or namespace
        pub owner: String,
        /// Repository name
        pub repo: String,
        /// Absolute path of the working tree root
        pub path: PathBuf,
        /// Last time this record was written
        pub added_at: DateTime<Utc>,
    }

    impl ProjectRecord {
        /// Create a record for `identity` at `path`, stamped with the current time
        #[must_use]
        pub fn new(identity: Identity, path: PathBuf) -> Self {
            Self {
                hostname: identity.hostname,
                owner: identity.owner,
                repo: identity.repo,
                path,
                added_at: Utc::now(),
            }
        }

        /// The identity triple of this record
        #[must_use]
        pub fn identity(&self) -> Identity {
            Identity::new(&self.hostname, &self.owner, &self.repo)
        }

        /// Whether this record names the given owner/repo (within its host)
        #[must_use]
        pub fn is(&self, owner: &str, repo: &str) -> bool {
            self.owner == owner && self.repo == repo
        }
    }

    // =========================================================================
    // Host Configuration
    // =========================================================================

    /// A configured remote host reachable through a short alias
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct HostConfig {
        /// Short token used in `alias:owner/repo`
        pub alias: String,
        /// Canonical remote host
        pub hostname: String,
        /// Clone root for this host, overriding `<base_dir>/<hostname>`
        #[serde(default, alias = "baseDir", alias = "basedir", skip_serializing_if = "Option::is_none")]
        pub base_dir: Option<PathBuf>,
        /// Clone over SSH when the input was an alias
        #[serde(default, alias = "preferSSH", alias = "preferssh", skip_serializing_if = "Option::is_none")]
        pub prefer_ssh: Option<bool>,
    }

    impl HostConfig {
        /// Create a host entry without overrides
        pub fn new(alias: impl Into<String>, hostname: impl Into<String>) -> Self {
            Self {
                alias: alias.into(),
                hostname: hostname.into(),
                base_dir: None,
                prefer_ssh: None,
            }
        }
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::{Error, IdentityError};
    pub use crate::types::*;
    pub use anyhow::{Context, Result};
}

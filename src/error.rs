// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for discovery and the registry

use std::path::PathBuf;
use thiserror::Error;

/// Why an input could not be turned into an identity
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// Neither the alias nor the URL grammar matched
    #[error("Invalid repository URL: {0}")]
    InvalidUrl(String),

    /// `alias:owner/repo` named an alias with no configured host
    #[error("Unknown alias: {0}")]
    UnknownAlias(String),

    /// The hostname cannot name a registry partition
    #[error("Invalid hostname: {0}")]
    InvalidHostname(String),
}

/// Library error taxonomy
#[derive(Error, Debug)]
pub enum Error {
    /// Unparseable input or unknown alias
    #[error(transparent)]
    InvalidIdentity(#[from] IdentityError),

    /// No git repository could be opened at the path
    #[error("No git working tree at {path}: {reason}")]
    NoWorkingTree {
        /// Path that was probed
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// A working tree without a usable `origin` remote
    #[error("Cannot read origin remote of {path}: {reason}")]
    UnreadableRemote {
        /// Working tree root
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// A registry partition that does not hold a record array
    #[error("Corrupt registry partition {path}")]
    CorruptPartition {
        /// Partition file
        path: PathBuf,
        /// Decoder failure
        #[source]
        source: serde_json::Error,
    },

    /// The scan root cannot be listed
    #[error("Cannot read scan root {path}")]
    RootUnreadable {
        /// Requested root
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Filesystem failure outside the scan root
    #[error("I/O error at {path}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// An ignore glob does not compile
    #[error("Invalid ignore pattern: {0}")]
    Pattern(#[from] globset::Error),
}

impl Error {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Errors that skip a single tree during a scan instead of aborting it
    #[must_use]
    pub fn is_per_item(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdentity(_) | Self::NoWorkingTree { .. } | Self::UnreadableRemote { .. }
        )
    }
}

/// Result alias for library operations
pub type Result<T> = std::result::Result<T, Error>;

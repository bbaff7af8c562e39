// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Reading `origin` remotes from working trees

use crate::error::{Error, Result};
use std::path::Path;

/// Name of the only remote inspected
pub const ORIGIN: &str = "origin";

/// Name of the metadata directory marking a working tree
pub const GIT_DIR: &str = ".git";

/// Source of `origin` URLs for working trees
pub trait RemoteSource: Send + Sync {
    /// Fetch URL of the `origin` remote configured in `worktree`.
    ///
    /// Fails with [`Error::NoWorkingTree`] when no repository lives at the
    /// path and [`Error::UnreadableRemote`] when it has no usable `origin`.
    fn origin_url(&self, worktree: &Path) -> Result<String>;
}

/// Whether `dir` holds a `.git` directory
#[must_use]
pub fn is_working_tree(dir: &Path) -> bool {
    dir.join(GIT_DIR).is_dir()
}

/// Reads remotes from the repository configuration with gix
#[derive(Debug, Default, Clone, Copy)]
pub struct GixRemotes;

impl RemoteSource for GixRemotes {
    fn origin_url(&self, worktree: &Path) -> Result<String> {
        let repo = gix::open(worktree).map_err(|e| Error::NoWorkingTree {
            path: worktree.to_path_buf(),
            reason: e.to_string(),
        })?;

        let remote = repo.find_remote(ORIGIN).map_err(|e| Error::UnreadableRemote {
            path: worktree.to_path_buf(),
            reason: e.to_string(),
        })?;

        let url = remote
            .url(gix::remote::Direction::Fetch)
            .ok_or_else(|| Error::UnreadableRemote {
                path: worktree.to_path_buf(),
                reason: "origin has no fetch URL".into(),
            })?;

        Ok(url.to_bstring().to_string())
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Repository scanning
//!
//! The walk is depth-first from the scan root. The root's children sit at
//! depth 0; a directory that is not a working tree is descended into only
//! while `depth + 1 <= max_depth`. Working trees are never descended into,
//! so checkouts nested inside another checkout are not reported. Symlinked
//! directories are not followed.
//!
//! The walk and the remote probes run on the blocking pool, one probe task
//! per working tree, and the results are registered in discovery order.

use crate::error::{Error, Result};
use crate::git::{self, RemoteSource};
use crate::identity;
use crate::registry::Registry;
use crate::types::{HostConfig, Identity, ProjectRecord};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

/// Directory names never descended into
pub const IGNORED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    ".DS_Store",
    "dist",
    "build",
    ".next",
    ".cache",
    "coverage",
    ".idea",
    ".vscode",
];

/// Scan configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Maximum depth, inclusive, counted from the root's children at 0
    pub max_depth: usize,
    /// Discover and report, but never write to the registry
    pub dry_run: bool,
    /// Extra directory-name globs to skip, on top of [`IGNORED_DIRS`]
    pub ignore: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: crate::config::DEFAULT_SCAN_DEPTH,
            dry_run: false,
            ignore: Vec::new(),
        }
    }
}

/// A working tree that could not be registered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// Working tree root
    pub path: PathBuf,
    /// Why it was skipped
    pub reason: String,
}

/// Outcome of a scan
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Canonical scan root
    pub root: PathBuf,
    /// Records written (or, in dry-run mode, that would have been written)
    pub registered: Vec<ProjectRecord>,
    /// Working trees without a resolvable identity
    pub skipped: Vec<Skipped>,
    /// Whether the registry was left untouched
    pub dry_run: bool,
}

impl ScanReport {
    /// Number of repositories found with a resolvable identity
    #[must_use]
    pub fn found(&self) -> usize {
        self.registered.len()
    }
}

/// Finds working trees under a root and registers them
pub struct Scanner {
    config: ScanConfig,
    ignore: Arc<GlobSet>,
    hosts: Arc<[HostConfig]>,
    remotes: Arc<dyn RemoteSource>,
}

impl Scanner {
    /// Build a scanner; fails if an ignore glob does not compile
    pub fn new(
        config: ScanConfig,
        hosts: Vec<HostConfig>,
        remotes: Arc<dyn RemoteSource>,
    ) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in IGNORED_DIRS
            .iter()
            .copied()
            .chain(config.ignore.iter().map(String::as_str))
        {
            builder.add(Glob::new(pattern)?);
        }

        Ok(Self {
            ignore: Arc::new(builder.build()?),
            config,
            hosts: hosts.into(),
            remotes,
        })
    }

    /// Walk `root` and return every working tree found, in walk order.
    ///
    /// Only a failure to read the root itself is an error; unreadable
    /// subdirectories are logged and skipped.
    pub fn discover(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let (_, trees) = walk(root, self.config.max_depth, &self.ignore)?;
        Ok(trees)
    }

    /// Discover working trees under `root`, resolve their identities and
    /// upsert them into `registry` (unless running dry).
    #[instrument(skip_all, fields(root = %root.display(), depth = self.config.max_depth))]
    pub async fn scan(&self, root: &Path, registry: &Registry) -> Result<ScanReport> {
        let (root, trees) = {
            let root = root.to_path_buf();
            let ignore = Arc::clone(&self.ignore);
            let max_depth = self.config.max_depth;
            let walking = root.clone();
            match tokio::task::spawn_blocking(move || walk(&walking, max_depth, &ignore)).await {
                Ok(walked) => walked?,
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(e) => return Err(Error::io(root, std::io::Error::other(e))),
            }
        };
        info!("{} working trees to probe", trees.len());

        let mut probes = JoinSet::new();
        for (index, path) in trees.into_iter().enumerate() {
            let remotes = Arc::clone(&self.remotes);
            let hosts = Arc::clone(&self.hosts);
            probes.spawn_blocking(move || {
                let resolved = resolve(remotes.as_ref(), &hosts, &path);
                (index, path, resolved)
            });
        }

        let mut probed = Vec::with_capacity(probes.len());
        while let Some(joined) = probes.join_next().await {
            match joined {
                Ok(result) => probed.push(result),
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(e) => warn!("Remote probe did not complete: {e}"),
            }
        }
        probed.sort_by_key(|(index, ..)| *index);

        let mut report = ScanReport {
            root,
            dry_run: self.config.dry_run,
            ..ScanReport::default()
        };

        for (_, path, resolved) in probed {
            let outcome = resolved.and_then(|identity| {
                let record = ProjectRecord::new(identity, path.clone());
                if !self.config.dry_run {
                    registry.upsert(record.clone())?;
                }
                Ok(record)
            });

            match outcome {
                Ok(record) => {
                    info!("Found: {}/{}", record.owner, record.repo);
                    report.registered.push(record);
                }
                Err(e) if e.is_per_item() => {
                    warn!("Skipping {}: {e}", path.display());
                    report.skipped.push(Skipped {
                        path,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }
}

/// Canonicalize `root` and collect the working trees below it
fn walk(root: &Path, max_depth: usize, ignore: &GlobSet) -> Result<(PathBuf, Vec<PathBuf>)> {
    let root = fs::canonicalize(root).map_err(|source| Error::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;
    fs::read_dir(&root).map_err(|source| Error::RootUnreadable {
        path: root.clone(),
        source,
    })?;

    let mut trees = Vec::new();
    let mut walker = WalkDir::new(&root)
        .min_depth(1)
        .max_depth(max_depth.saturating_add(1))
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable directory: {e}");
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        if ignore.is_match(entry.file_name()) {
            debug!("Ignoring {}", entry.path().display());
            walker.skip_current_dir();
            continue;
        }

        if git::is_working_tree(entry.path()) {
            debug!("Working tree at {}", entry.path().display());
            walker.skip_current_dir();
            trees.push(entry.into_path());
        }
    }

    Ok((root, trees))
}

fn resolve(remotes: &dyn RemoteSource, hosts: &[HostConfig], path: &Path) -> Result<Identity> {
    let url = remotes.origin_url(path)?;
    let parsed = identity::parse(&url, hosts)?;
    Ok(parsed.identity)
}

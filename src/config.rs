// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Layers, lowest first: built-in defaults, `~/.vpm.toml` (or an explicit
//! path), then `VPM_*` environment variables (`VPM_BASE_DIR`,
//! `VPM_SCAN__DEPTH`, ...).

use crate::error::Result;
use crate::types::HostConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default scan depth when neither the CLI nor the config file sets one
pub const DEFAULT_SCAN_DEPTH: usize = 5;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory under which `add` clones, as `<base_dir>/<hostname>/<owner>/<repo>`
    #[serde(default = "default_base_dir", alias = "baseDir", alias = "basedir")]
    pub base_dir: PathBuf,
    /// Directory holding the registry partitions
    #[serde(default = "default_cache_dir", alias = "cacheDir", alias = "cachedir")]
    pub cache_dir: PathBuf,
    /// Known hosts keyed by a free-form name
    #[serde(default)]
    pub host: BTreeMap<String, HostConfig>,
    /// Scanner settings
    #[serde(default)]
    pub scan: ScanSettings,
}

/// Settings for the `scan` command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Maximum traversal depth
    #[serde(default = "default_depth")]
    pub depth: usize,
    /// Extra directory-name globs never descended into
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            depth: DEFAULT_SCAN_DEPTH,
            ignore: Vec::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            cache_dir: default_cache_dir(),
            host: default_hosts(),
            scan: ScanSettings::default(),
        }
    }
}

impl Config {
    /// All configured hosts, in key order
    pub fn hosts(&self) -> impl Iterator<Item = &HostConfig> {
        self.host.values()
    }

    /// Merge default hosts under user hosts and resolve every path
    fn resolve(mut self) -> Self {
        for (name, host) in default_hosts() {
            self.host.entry(name).or_insert(host);
        }

        self.base_dir = expand_home(&self.base_dir);
        self.cache_dir = expand_home(&self.cache_dir);

        let root = self.base_dir.clone();
        for host in self.host.values_mut() {
            if let Some(dir) = host.base_dir.take() {
                host.base_dir = Some(resolve_base_dir(&dir, &root));
            }
        }
        self
    }
}

/// Load configuration from `path`, or from `~/.vpm.toml` when `None`.
///
/// A missing file yields the defaults.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let path = path.map(Path::to_path_buf).or_else(default_config_path);

    let mut builder = config::Config::builder();
    if let Some(path) = &path {
        debug!("Loading configuration from {}", path.display());
        builder = builder.add_source(
            config::File::from(path.as_path())
                .format(config::FileFormat::Toml)
                .required(false),
        );
    }
    builder = builder.add_source(
        config::Environment::with_prefix("VPM")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("scan.ignore"),
    );

    let config: Config = builder.build()?.try_deserialize()?;
    Ok(config.resolve())
}

/// Path of the user configuration file
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().join(".vpm.toml"))
}

fn default_base_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().join("workspace"))
        .unwrap_or_else(|| PathBuf::from("workspace"))
}

fn default_cache_dir() -> PathBuf {
    directories::ProjectDirs::from("org", "hyperpolymath", "vpm")
        .map(|d| d.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("vpm"))
}

fn default_depth() -> usize {
    DEFAULT_SCAN_DEPTH
}

fn default_hosts() -> BTreeMap<String, HostConfig> {
    let mut hosts = BTreeMap::new();
    for (name, alias, hostname) in [("github", "gh", "github.com"), ("gitlab", "gl", "gitlab.com")] {
        let mut host = HostConfig::new(alias, hostname);
        host.prefer_ssh = Some(true);
        hosts.insert(name.to_string(), host);
    }
    hosts
}

/// Relative host directories hang off the root base directory
fn resolve_base_dir(dir: &Path, root: &Path) -> PathBuf {
    let dir = expand_home(dir);
    if dir.is_absolute() {
        dir
    } else {
        root.join(dir)
    }
}

fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match directories::BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Hostname an alias resolves to through the identity parser
    fn alias_host(config: &Config, alias: &str) -> Option<String> {
        crate::identity::parse(&format!("{alias}:o/r"), config.hosts())
            .ok()
            .map(|parsed| parsed.identity.hostname)
    }

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("vpm.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load(Some(&dir.path().join("absent.toml"))).unwrap();

        assert_eq!(config.scan.depth, DEFAULT_SCAN_DEPTH);
        assert_eq!(alias_host(&config, "gh").as_deref(), Some("github.com"));
        assert_eq!(alias_host(&config, "gl").as_deref(), Some("gitlab.com"));
    }

    #[test]
    fn test_user_hosts_merge_over_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
base_dir = "/srv/code"

[host.github]
alias = "hub"
hostname = "github.com"

[host.work]
alias = "w"
hostname = "git.example.com"
base_dir = "work"
prefer_ssh = false

[scan]
depth = 2
ignore = ["target", "*.egg-info"]
"#,
        );

        let config = load(Some(&path)).unwrap();

        assert_eq!(config.base_dir, PathBuf::from("/srv/code"));
        assert_eq!(alias_host(&config, "gh"), None);
        assert_eq!(alias_host(&config, "hub").as_deref(), Some("github.com"));
        assert_eq!(alias_host(&config, "gl").as_deref(), Some("gitlab.com"));

        let work = config.hosts().find(|h| h.hostname == "git.example.com").unwrap();
        assert_eq!(work.base_dir.as_deref(), Some(Path::new("/srv/code/work")));
        assert_eq!(work.prefer_ssh, Some(false));

        assert_eq!(config.scan.depth, 2);
        assert_eq!(config.scan.ignore, vec!["target", "*.egg-info"]);
    }

    #[test]
    fn test_absolute_host_dir_is_kept() {
        let resolved = resolve_base_dir(Path::new("/abs/dir"), Path::new("/root"));
        assert_eq!(resolved, PathBuf::from("/abs/dir"));

        let resolved = resolve_base_dir(Path::new("rel/"), Path::new("/root"));
        assert_eq!(resolved, PathBuf::from("/root/rel/"));
    }
}

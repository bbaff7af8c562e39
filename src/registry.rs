// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Project registry - per-host JSON partitions mapping identity to checkout
//!
//! Each hostname owns one file, `<hostname>.json`, holding an array of
//! [`ProjectRecord`]s. A partition is always rewritten as a whole through a
//! temporary file and a rename. Within one process, writes to the same
//! partition are serialized; different partitions never contend.

use crate::error::{Error, IdentityError, Result};
use crate::types::ProjectRecord;
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

const PARTITION_EXT: &str = "json";

/// What an upsert did to its partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// No record with this identity existed; it was appended
    Inserted,
    /// An existing record was overwritten in place
    Updated,
}

/// Durable identity-to-path registry
#[derive(Debug)]
pub struct Registry {
    dir: PathBuf,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Registry {
    /// Open (creating if needed) the registry stored in `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        debug!("Registry at {}", dir.display());
        Ok(Self {
            dir,
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// Insert `record`, or overwrite the record with the same identity in
    /// place, keeping its position in the partition.
    pub fn upsert(&self, record: ProjectRecord) -> Result<Upsert> {
        let path = self.partition_path(&record.hostname)?;
        let lock = self.partition_lock(&record.hostname);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut records = self.load_partition(&path);
        let outcome = match records.iter_mut().find(|r| r.is(&record.owner, &record.repo)) {
            Some(existing) => {
                *existing = record;
                Upsert::Updated
            }
            None => {
                records.push(record);
                Upsert::Inserted
            }
        };

        self.write_partition(&path, &records)?;
        Ok(outcome)
    }

    /// Point lookup; `None` when the identity was never registered
    pub fn get(&self, hostname: &str, owner: &str, repo: &str) -> Result<Option<ProjectRecord>> {
        let path = self.partition_path(hostname)?;
        Ok(self
            .load_partition(&path)
            .into_iter()
            .find(|r| r.is(owner, repo)))
    }

    /// Every record of every partition, partitions in file-name order.
    ///
    /// Partitions that cannot be read or decoded are skipped.
    pub fn get_all(&self) -> Result<Vec<ProjectRecord>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::io(&self.dir, e)),
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == PARTITION_EXT) && p.is_file())
            .collect();
        files.sort();

        let mut all = Vec::new();
        for file in files {
            match read_partition(&file) {
                Ok(records) => all.extend(records),
                Err(e) => warn!("Skipping registry partition: {e}"),
            }
        }
        Ok(all)
    }

    fn partition_path(&self, hostname: &str) -> Result<PathBuf> {
        let invalid = hostname.is_empty()
            || hostname == "."
            || hostname == ".."
            || hostname.contains(['/', '\\']);
        if invalid {
            return Err(IdentityError::InvalidHostname(hostname.to_string()).into());
        }
        Ok(self.dir.join(format!("{hostname}.{PARTITION_EXT}")))
    }

    fn partition_lock(&self, hostname: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(hostname.to_string()).or_default())
    }

    /// Absent, unreadable and corrupt partitions all read as empty
    fn load_partition(&self, path: &Path) -> Vec<ProjectRecord> {
        match read_partition(path) {
            Ok(records) => records,
            Err(Error::Io { source, .. }) if source.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!("{e}; treating it as empty");
                Vec::new()
            }
        }
    }

    fn write_partition(&self, path: &Path, records: &[ProjectRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(|e| Error::io(&self.dir, e))?;
        tmp.write_all(json.as_bytes()).map_err(|e| Error::io(tmp.path(), e))?;
        tmp.as_file().sync_all().map_err(|e| Error::io(tmp.path(), e))?;
        tmp.persist(path).map_err(|e| Error::io(path, e.error))?;
        Ok(())
    }
}

/// Strict partition read: missing file and bad content are errors
fn read_partition(path: &Path) -> Result<Vec<ProjectRecord>> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&content).map_err(|source| Error::CorruptPartition {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Identity;
    use chrono::{Duration, Utc};
    use std::thread;
    use tempfile::TempDir;

    fn record(host: &str, owner: &str, repo: &str, path: &str) -> ProjectRecord {
        ProjectRecord::new(Identity::new(host, owner, repo), PathBuf::from(path))
    }

    #[test]
    fn test_upsert_then_get() {
        let dir = TempDir::new().unwrap();
        let registry = Registry::open(dir.path()).unwrap();

        let outcome = registry.upsert(record("github.com", "o", "r", "/w/r")).unwrap();
        assert_eq!(outcome, Upsert::Inserted);

        let found = registry.get("github.com", "o", "r").unwrap().unwrap();
        assert_eq!(found.path, PathBuf::from("/w/r"));
        assert!(dir.path().join("github.com.json").is_file());

        assert!(registry.get("github.com", "o", "other").unwrap().is_none());
        assert!(registry.get("gitlab.com", "o", "r").unwrap().is_none());
    }

    #[test]
    fn test_reupsert_overwrites_in_place() {
        let dir = TempDir::new().unwrap();
        let registry = Registry::open(dir.path()).unwrap();

        let mut first = record("github.com", "o", "a", "/old/a");
        first.added_at = Utc::now() - Duration::days(1);
        registry.upsert(first.clone()).unwrap();
        registry.upsert(record("github.com", "o", "b", "/w/b")).unwrap();

        let outcome = registry.upsert(record("github.com", "o", "a", "/new/a")).unwrap();
        assert_eq!(outcome, Upsert::Updated);

        let all = registry.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].repo, "a");
        assert_eq!(all[0].path, PathBuf::from("/new/a"));
        assert!(all[0].added_at > first.added_at);
        assert_eq!(all[1].repo, "b");
    }

    #[test]
    fn test_partitions_per_host() {
        let dir = TempDir::new().unwrap();
        let registry = Registry::open(dir.path()).unwrap();

        registry.upsert(record("gitlab.com", "o2", "r2", "/w/b/c")).unwrap();
        registry.upsert(record("github.com", "o1", "r1", "/w/a")).unwrap();

        let all = registry.get_all().unwrap();
        let hosts: Vec<_> = all.iter().map(|r| r.hostname.as_str()).collect();
        assert_eq!(hosts, vec!["github.com", "gitlab.com"]);
    }

    #[test]
    fn test_corrupt_partition_reads_empty_and_heals() {
        let dir = TempDir::new().unwrap();
        let registry = Registry::open(dir.path()).unwrap();
        fs::write(dir.path().join("github.com.json"), "{ not json").unwrap();
        registry.upsert(record("gitlab.com", "o", "ok", "/w/ok")).unwrap();

        assert!(registry.get("github.com", "o", "r").unwrap().is_none());
        assert_eq!(registry.get_all().unwrap().len(), 1);

        registry.upsert(record("github.com", "o", "r", "/w/r")).unwrap();
        assert_eq!(registry.get_all().unwrap().len(), 2);
    }

    #[test]
    fn test_extra_fields_are_tolerated() {
        let dir = TempDir::new().unwrap();
        let registry = Registry::open(dir.path()).unwrap();
        fs::write(
            dir.path().join("github.com.json"),
            r#"[{"hostname":"github.com","owner":"o","repo":"r","path":"/w/r",
                "addedAt":"2024-01-01T00:00:00Z","starred":true}]"#,
        )
        .unwrap();

        let found = registry.get("github.com", "o", "r").unwrap().unwrap();
        assert_eq!(found.path, PathBuf::from("/w/r"));
    }

    #[test]
    fn test_rejects_path_like_hostnames() {
        let dir = TempDir::new().unwrap();
        let registry = Registry::open(dir.path()).unwrap();

        let err = registry.upsert(record("../etc", "o", "r", "/w")).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidIdentity(IdentityError::InvalidHostname(_))
        ));
    }

    #[test]
    fn test_concurrent_upserts_on_one_host_lose_nothing() {
        let dir = TempDir::new().unwrap();
        let registry = Arc::new(Registry::open(dir.path()).unwrap());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    let repo = format!("r{i}");
                    registry
                        .upsert(record("github.com", "o", &repo, "/w"))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.get_all().unwrap().len(), 16);
    }
}

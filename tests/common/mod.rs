// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Create `root/rel` as a minimal git checkout with an optional origin remote
pub fn checkout(root: &Path, rel: &str, origin: Option<&str>) -> PathBuf {
    let dir = root.join(rel);
    let git = dir.join(".git");
    fs::create_dir_all(git.join("objects")).unwrap();
    fs::create_dir_all(git.join("refs").join("heads")).unwrap();
    fs::write(git.join("HEAD"), "ref: refs/heads/main\n").unwrap();

    let mut config = String::from("[core]\n\trepositoryformatversion = 0\n\tbare = false\n");
    if let Some(url) = origin {
        config.push_str(&format!(
            "[remote \"origin\"]\n\turl = {url}\n\tfetch = +refs/heads/*:refs/remotes/origin/*\n"
        ));
    }
    fs::write(git.join("config"), config).unwrap();
    dir
}

/// Build the two-host workspace used by the end-to-end tests:
/// `w/a` on GitHub over SSH and `w/b/c` on GitLab over HTTPS
pub fn two_host_workspace(root: &Path) -> PathBuf {
    let w = root.join("w");
    checkout(&w, "a", Some("git@github.com:o1/r1.git"));
    checkout(&w, "b/c", Some("https://gitlab.com/o2/r2"));
    w
}

// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Identity parsing - turns remote URLs and `alias:owner/repo` shorthands
//! into a canonical `(hostname, owner, repo)` triple
//!
//! Two grammars are tried in order:
//!
//! 1. `alias:owner/repo`, where the alias must name a configured host
//! 2. `https://host/owner/repo[.git]`, `http://...` or `git@host:owner/repo[.git]`
//!
//! Parsing never touches the filesystem or the network.

use crate::config::Config;
use crate::error::{IdentityError, Result};
use crate::types::{HostConfig, Identity};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

static ALIAS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^:@]+):([^/]+)/([^/]+)$").expect("alias pattern compiles"));

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:https?://|git@)([^/:]+)[/:]([^/]+)/([^/]+?)(?:\.git)?$")
        .expect("url pattern compiles")
});

/// Result of parsing a repository reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRepo {
    /// Canonical identity
    pub identity: Identity,
    /// Matching host entry; `None` for URLs on hosts nobody configured
    pub host: Option<HostConfig>,
    /// Whether the input used the `alias:owner/repo` form
    pub is_alias: bool,
}

/// Parse `input` against the known hosts.
///
/// An alias-shaped input with an unknown alias is an error; it is not
/// retried as a URL.
pub fn parse<'a>(
    input: &str,
    hosts: impl IntoIterator<Item = &'a HostConfig>,
) -> Result<ParsedRepo> {
    let input = input.trim();

    if let Some(caps) = ALIAS_PATTERN.captures(input) {
        let alias = &caps[1];
        let host = hosts
            .into_iter()
            .find(|h| h.alias == alias)
            .ok_or_else(|| IdentityError::UnknownAlias(alias.to_string()))?;

        return Ok(ParsedRepo {
            identity: Identity::new(&host.hostname, &caps[2], &caps[3]),
            host: Some(host.clone()),
            is_alias: true,
        });
    }

    let caps = URL_PATTERN
        .captures(input)
        .ok_or_else(|| IdentityError::InvalidUrl(input.to_string()))?;
    let hostname = &caps[1];
    let host = hosts.into_iter().find(|h| h.hostname == hostname).cloned();

    Ok(ParsedRepo {
        identity: Identity::new(hostname, &caps[2], &caps[3]),
        host,
        is_alias: false,
    })
}

/// Clone URL for an identity
#[must_use]
pub fn clone_url(identity: &Identity, use_ssh: bool) -> String {
    if use_ssh {
        format!("git@{}:{}/{}.git", identity.hostname, identity.owner, identity.repo)
    } else {
        format!("https://{}/{}/{}.git", identity.hostname, identity.owner, identity.repo)
    }
}

/// URL to hand to `git clone`: the input itself unless it was an alias
#[must_use]
pub fn source_url(input: &str, parsed: &ParsedRepo) -> String {
    if parsed.is_alias {
        let use_ssh = parsed.host.as_ref().and_then(|h| h.prefer_ssh).unwrap_or(false);
        clone_url(&parsed.identity, use_ssh)
    } else {
        input.trim().to_string()
    }
}

/// Checkout directory for a parsed reference.
///
/// The host's own base directory wins; otherwise `<base_dir>/<hostname>`.
/// Paths are joined as given, without case or separator normalization.
#[must_use]
pub fn target_dir(config: &Config, parsed: &ParsedRepo) -> PathBuf {
    let base = parsed
        .host
        .as_ref()
        .and_then(|h| h.base_dir.clone())
        .unwrap_or_else(|| config.base_dir.join(&parsed.identity.hostname));
    base.join(&parsed.identity.owner).join(&parsed.identity.repo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use proptest::prelude::*;

    fn hosts() -> Vec<HostConfig> {
        let mut gh = HostConfig::new("gh", "github.com");
        gh.prefer_ssh = Some(true);
        let mut gl = HostConfig::new("gl", "gitlab.com");
        gl.prefer_ssh = Some(false);
        vec![gh, gl]
    }

    #[test]
    fn test_alias_form() {
        let parsed = parse("gh:owner/repo", &hosts()).unwrap();
        assert_eq!(parsed.identity, Identity::new("github.com", "owner", "repo"));
        assert!(parsed.is_alias);
        assert_eq!(parsed.host.unwrap().alias, "gh");
    }

    #[test]
    fn test_https_and_ssh_forms() {
        let parsed = parse("https://github.com/owner/repo", &hosts()).unwrap();
        assert_eq!(parsed.identity, Identity::new("github.com", "owner", "repo"));
        assert!(!parsed.is_alias);
        assert!(parsed.host.is_some());

        let parsed = parse("git@gitlab.com:group/project.git", &hosts()).unwrap();
        assert_eq!(parsed.identity, Identity::new("gitlab.com", "group", "project"));

        let parsed = parse("http://example.org/a/b.git\n", &hosts()).unwrap();
        assert_eq!(parsed.identity, Identity::new("example.org", "a", "b"));
        assert!(parsed.host.is_none());
    }

    #[test]
    fn test_invalid_input() {
        let err = parse("not-a-url", &hosts()).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidIdentity(IdentityError::InvalidUrl(ref s)) if s == "not-a-url"
        ));
    }

    #[test]
    fn test_unknown_alias_does_not_fall_back() {
        let err = parse("unknownalias:owner/repo", &hosts()).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidIdentity(IdentityError::UnknownAlias(ref a)) if a == "unknownalias"
        ));
        assert!(err.to_string().contains("unknownalias"));
    }

    #[test]
    fn test_clone_and_source_urls() {
        let id = Identity::new("github.com", "o", "r");
        assert_eq!(clone_url(&id, true), "git@github.com:o/r.git");
        assert_eq!(clone_url(&id, false), "https://github.com/o/r.git");

        let parsed = parse("gh:o/r", &hosts()).unwrap();
        assert_eq!(source_url("gh:o/r", &parsed), "git@github.com:o/r.git");

        let parsed = parse("gl:o/r", &hosts()).unwrap();
        assert_eq!(source_url("gl:o/r", &parsed), "https://gitlab.com/o/r.git");

        let url = "https://github.com/o/r";
        let parsed = parse(url, &hosts()).unwrap();
        assert_eq!(source_url(url, &parsed), url);
    }

    #[test]
    fn test_target_dir() {
        let mut config = Config {
            base_dir: PathBuf::from("/home/user/workspace"),
            ..Config::default()
        };
        let parsed = parse("https://github.com/owner/repo", &hosts()).unwrap();
        assert_eq!(
            target_dir(&config, &parsed),
            PathBuf::from("/home/user/workspace/github.com/owner/repo")
        );

        let mut host = HostConfig::new("w", "git.example.com");
        host.base_dir = Some(PathBuf::from("/srv/work"));
        config.host.insert("work".into(), host.clone());
        let parsed = parse("w:team/app", [&host]).unwrap();
        assert_eq!(target_dir(&config, &parsed), PathBuf::from("/srv/work/team/app"));
    }

    fn segment() -> impl Strategy<Value = String> {
        "[A-Za-z0-9_-][A-Za-z0-9_.-]{0,15}".prop_filter("no .git suffix", |s| !s.ends_with(".git"))
    }

    fn hostname() -> impl Strategy<Value = String> {
        "[a-z0-9-]{1,12}(\\.[a-z]{2,6}){1,2}"
    }

    proptest! {
        #[test]
        fn prop_alias_keeps_owner_and_repo(owner in segment(), repo in segment()) {
            let parsed = parse(&format!("gh:{owner}/{repo}"), &hosts()).unwrap();
            prop_assert_eq!(parsed.identity, Identity::new("github.com", owner, repo));
        }

        #[test]
        fn prop_urls_strip_git_suffix(
            host in hostname(),
            owner in segment(),
            repo in segment(),
            suffix in proptest::bool::ANY,
            ssh in proptest::bool::ANY,
        ) {
            let tail = if suffix { ".git" } else { "" };
            let url = if ssh {
                format!("git@{host}:{owner}/{repo}{tail}")
            } else {
                format!("https://{host}/{owner}/{repo}{tail}")
            };
            let parsed = parse(&url, &hosts()).unwrap();
            prop_assert_eq!(parsed.identity, Identity::new(host, owner, repo));
        }
    }
}

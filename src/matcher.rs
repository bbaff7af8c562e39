// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Keyword lookup over registered projects

use crate::types::ProjectRecord;

/// Outcome of looking a keyword up
#[derive(Debug, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// Nothing matched
    None,
    /// Exactly one project matched
    One(&'a ProjectRecord),
    /// Several projects matched, in registry order
    Many(Vec<&'a ProjectRecord>),
}

/// Case-insensitive substring test against `"hostname owner repo"`
#[must_use]
pub fn matches(record: &ProjectRecord, keyword: &str) -> bool {
    let haystack = format!("{} {} {}", record.hostname, record.owner, record.repo).to_lowercase();
    haystack.contains(&keyword.to_lowercase())
}

/// Matching records, preserving their relative order
#[must_use]
pub fn filter<'a>(records: &'a [ProjectRecord], keyword: &str) -> Vec<&'a ProjectRecord> {
    records.iter().filter(|r| matches(r, keyword)).collect()
}

/// Filter and classify by match count
#[must_use]
pub fn lookup<'a>(records: &'a [ProjectRecord], keyword: &str) -> Lookup<'a> {
    let mut found = filter(records, keyword);
    match found.len() {
        0 => Lookup::None,
        1 => Lookup::One(found.remove(0)),
        _ => Lookup::Many(found),
    }
}

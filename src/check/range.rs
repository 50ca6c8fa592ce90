//! npm version and range syntax on top of the `semver` crate
//!
//! The `semver` crate implements Cargo's requirement grammar. npm differs in a
//! few places that matter for package.json ranges:
//! - a bare version (`1.2.3`) is an exact match, not a caret requirement
//! - comparators are separated by whitespace instead of commas
//! - `||` joins alternative comparator sets
//! - hyphen ranges (`1.2.3 - 2.0.0`) are inclusive on both ends
//! - x-ranges (`1.x`, `^1.2.x`, `<=2.*`) may follow any operator
//!
//! Cargo already gives partial versions npm's meaning (`^1` is `>=1.0.0 <2.0.0`,
//! `<=2` is `<3.0.0`, `>1` is `>=2.0.0`), so an x-range is cut at its first
//! wildcard and handed over as a partial version. Pre-release matching lines up.

use regex::Regex;
use semver::{Version, VersionReq};
use std::sync::LazyLock;

/// A parsed npm range: a union of comparator sets
#[derive(Debug, Clone)]
pub struct NpmRange {
    alternatives: Vec<VersionReq>,
}

impl NpmRange {
    /// Parse an npm range, returning None for anything that is not a semver range
    /// (git URLs, file paths, dist-tag names, ...)
    pub fn parse(input: &str) -> Option<Self> {
        let alternatives = input
            .split("||")
            .map(parse_comparator_set)
            .collect::<Option<Vec<_>>>()?;

        Some(Self { alternatives })
    }

    /// Returns true if the version satisfies any comparator set
    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }
}

/// Parse a version the way npm's `semver.valid` does: surrounding whitespace and
/// a leading `v` or `=` are tolerated
pub fn parse_version(input: &str) -> Option<Version> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('=').unwrap_or(trimmed).trim_start();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(trimmed).ok()
}

/// Returns true if the string is a valid npm range
pub fn valid_range(range: &str) -> bool {
    NpmRange::parse(range).is_some()
}

/// Returns true if `version` is valid and satisfies `range`
pub fn satisfies(version: &str, range: &str) -> bool {
    match (parse_version(version), NpmRange::parse(range)) {
        (Some(version), Some(range)) => range.matches(&version),
        _ => false,
    }
}

/// Highest version in `versions` satisfying `range`; invalid entries are ignored
pub fn max_satisfying<'a>(versions: &'a [String], range: &str) -> Option<&'a str> {
    let range = NpmRange::parse(range)?;
    versions
        .iter()
        .filter_map(|raw| parse_version(raw).map(|v| (v, raw.as_str())))
        .filter(|(v, _)| range.matches(v))
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, raw)| raw)
}

static HYPHEN_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+-\s+(\S+)$").unwrap());

static COMPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(<=|>=|<|>|=|~>|~|\^)?v?(.+)$").unwrap());

fn is_operator(token: &str) -> bool {
    matches!(token, "<" | "<=" | ">" | ">=" | "=" | "~" | "~>" | "^")
}

fn is_wildcard(part: &str) -> bool {
    matches!(part, "*" | "x" | "X")
}

/// Translate one whitespace-separated comparator set into a `VersionReq`
fn parse_comparator_set(set: &str) -> Option<VersionReq> {
    let set = set.trim();
    if set.is_empty() {
        return Some(VersionReq::STAR);
    }

    if let Some(caps) = HYPHEN_RANGE.captures(set) {
        let low = hyphen_bound(&caps[1]);
        let high = hyphen_bound(&caps[2]);
        let mut bounds = Vec::with_capacity(2);
        if !low.is_empty() {
            bounds.push(format!(">={}", low));
        }
        // A partial upper bound is exclusive at the next component: "1 - 2.x" is "<3.0.0"
        if !high.is_empty() {
            bounds.push(format!("<={}", high));
        }
        if bounds.is_empty() {
            return Some(VersionReq::STAR);
        }
        return VersionReq::parse(&bounds.join(", ")).ok();
    }

    // "> 1.2.3" is the same comparator as ">1.2.3"
    let mut tokens: Vec<String> = Vec::new();
    let mut pending_op: Option<&str> = None;
    for token in set.split_whitespace() {
        if is_operator(token) {
            if pending_op.is_some() {
                return None;
            }
            pending_op = Some(token);
            continue;
        }
        match pending_op.take() {
            Some(op) => tokens.push(format!("{}{}", op, token)),
            None => tokens.push(token.to_string()),
        }
    }
    if pending_op.is_some() {
        return None;
    }

    let mut comparators = Vec::with_capacity(tokens.len());
    for token in &tokens {
        if let Some(comparator) = normalize_comparator(token)? {
            comparators.push(comparator);
        }
    }

    if comparators.is_empty() {
        return Some(VersionReq::STAR);
    }
    VersionReq::parse(&comparators.join(", ")).ok()
}

/// Rewrite an npm comparator into Cargo syntax.
///
/// Returns None for an invalid comparator and `Some(None)` for one that
/// accepts everything and can be dropped.
fn normalize_comparator(token: &str) -> Option<Option<String>> {
    let caps = COMPARATOR.captures(token)?;
    let op = match caps.get(1).map(|m| m.as_str()) {
        Some("~>") => "~",
        Some(op) => op,
        None => "",
    };
    let version = x_range_prefix(caps.get(2)?.as_str());

    if version.is_empty() {
        return match op {
            // Nothing is below or above "any version"
            "<" | ">" => Some(Some("<0.0.0-0".to_string())),
            _ => Some(None),
        };
    }

    // A bare npm version is exact and a bare partial is an x-range; Cargo's
    // "=" spells both the same way
    let op = if op.is_empty() { "=" } else { op };
    Some(Some(format!("{}{}", op, version)))
}

/// Cut an x-range at its first wildcard component: "1.2.x" becomes "1.2" and
/// "*" becomes ""
fn x_range_prefix(version: &str) -> &str {
    let mut kept: usize = 0;
    for part in version.split('.') {
        if is_wildcard(part) {
            return &version[..kept.saturating_sub(1)];
        }
        kept += part.len() + 1;
    }
    version
}

fn hyphen_bound(raw: &str) -> &str {
    x_range_prefix(raw.strip_prefix('v').unwrap_or(raw))
}

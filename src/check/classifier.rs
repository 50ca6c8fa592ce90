//! Version relationship between the version in use and the latest release

use super::range::parse_version;
use crate::domain::BumpClass;
use semver::{Prerelease, Version};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Lowest version that counts as a stable 1.0 release; any 0.x.y sorts below it
fn first_stable() -> Version {
    Version {
        major: 1,
        minor: 0,
        patch: 0,
        pre: Prerelease::new("pre").unwrap_or(Prerelease::EMPTY),
        build: semver::BuildMetadata::EMPTY,
    }
}

/// Pick the version to report as "latest".
///
/// When the installed version is already newer than the `latest` dist-tag
/// (someone is on `next` or `beta`), the highest dist-tag that is still newer
/// than the installed version is reported instead. Only dist-tags are
/// considered, not every published version.
pub fn resolve_latest(
    installed: Option<&str>,
    latest: Option<&str>,
    tags: &BTreeMap<String, String>,
) -> Option<String> {
    let latest_raw = latest?;
    let (Some(installed_version), Some(latest_version)) =
        (installed.and_then(parse_version), parse_version(latest_raw))
    else {
        return Some(latest_raw.to_string());
    };

    if installed_version <= latest_version {
        return Some(latest_raw.to_string());
    }

    tags.values()
        .filter_map(|raw| parse_version(raw).map(|v| (v, raw)))
        .filter(|(v, _)| *v > installed_version)
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, raw)| raw.clone())
        .or_else(|| Some(latest_raw.to_string()))
}

/// Compare by semver precedence, ignoring build metadata
fn precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

/// Category of the change from `from` to `to`, or None unless `to` is newer
pub fn version_diff(from: &Version, to: &Version) -> Option<BumpClass> {
    if precedence(from, to) != Ordering::Less {
        return None;
    }

    let from_pre = !from.pre.is_empty();
    let to_pre = !to.pre.is_empty();

    // Leaving a pre-release for its own stable release
    if from_pre && !to_pre {
        if from.minor == 0 && from.patch == 0 {
            return Some(BumpClass::Major);
        }
        if (from.major, from.minor, from.patch) == (to.major, to.minor, to.patch) {
            if from.minor != 0 && from.patch == 0 {
                return Some(BumpClass::Minor);
            }
            return Some(BumpClass::Patch);
        }
    }

    let bump = if from.major != to.major {
        if to_pre {
            BumpClass::Premajor
        } else {
            BumpClass::Major
        }
    } else if from.minor != to.minor {
        if to_pre {
            BumpClass::Preminor
        } else {
            BumpClass::Minor
        }
    } else if from.patch != to.patch {
        if to_pre {
            BumpClass::Prepatch
        } else {
            BumpClass::Patch
        }
    } else {
        BumpClass::Prerelease
    };
    Some(bump)
}

/// Classify the update from `in_use` to `latest`.
///
/// Below 1.0.0 there is no compatibility promise, so any difference is
/// reported as [`BumpClass::NonSemver`].
pub fn classify(in_use: Option<&str>, latest: Option<&str>) -> Option<BumpClass> {
    let in_use = parse_version(in_use?)?;
    let latest = parse_version(latest?)?;

    let bump = version_diff(&in_use, &latest)?;
    if latest < first_stable() {
        return Some(BumpClass::NonSemver);
    }
    Some(bump)
}

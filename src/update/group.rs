//! Grouping of updatable records into ordered categories

use crate::domain::{BumpClass, PackageRecord};

/// Update categories in display priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// Installed version does not satisfy package.json
    Mismatch,
    /// Declared but not installed
    Missing,
    /// Patch release available
    Patch,
    /// Minor release available
    Minor,
    /// Major release available
    Major,
    /// Latest is below 1.0.0
    NonSemver,
    /// Latest is a pre-release
    Prerelease,
}

impl GroupKind {
    /// Every group, highest priority first
    pub const ALL: [GroupKind; 7] = [
        GroupKind::Mismatch,
        GroupKind::Missing,
        GroupKind::Patch,
        GroupKind::Minor,
        GroupKind::Major,
        GroupKind::NonSemver,
        GroupKind::Prerelease,
    ];

    /// Short colored-heading label
    pub fn title(&self) -> &'static str {
        match self {
            GroupKind::Mismatch => "Mismatch",
            GroupKind::Missing => "Missing",
            GroupKind::Patch => "Patch Update",
            GroupKind::Minor => "Minor Update",
            GroupKind::Major => "Major Update",
            GroupKind::NonSemver => "Non-Semver",
            GroupKind::Prerelease => "Prerelease",
        }
    }

    /// One-line description shown next to the title
    pub fn description(&self) -> &'static str {
        match self {
            GroupKind::Mismatch => "Update package.json to match version installed.",
            GroupKind::Missing => "Missing. You probably want these.",
            GroupKind::Patch => "Backwards-compatible bug fixes.",
            GroupKind::Minor => "New backwards-compatible features.",
            GroupKind::Major => "Potentially breaking API changes. Use caution.",
            GroupKind::NonSemver => "Versions less than 1.0.0, caution.",
            GroupKind::Prerelease => "Unstable version, caution.",
        }
    }

    /// Whether a record belongs to this group
    pub fn matches(&self, record: &PackageRecord) -> bool {
        match self {
            GroupKind::Mismatch => record.mismatch && record.bump.is_none(),
            GroupKind::Missing => record.not_installed && record.bump.is_none(),
            GroupKind::Patch => record.bump == Some(BumpClass::Patch),
            GroupKind::Minor => record.bump == Some(BumpClass::Minor),
            GroupKind::Major => record.bump == Some(BumpClass::Major),
            GroupKind::NonSemver => record.bump == Some(BumpClass::NonSemver),
            GroupKind::Prerelease => matches!(
                record.bump,
                Some(
                    BumpClass::Prerelease
                        | BumpClass::Premajor
                        | BumpClass::Preminor
                        | BumpClass::Prepatch
                )
            ),
        }
    }
}

/// A non-empty group and the records it claimed, in input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordGroup<'a> {
    /// Category
    pub kind: GroupKind,
    /// Claimed records
    pub records: Vec<&'a PackageRecord>,
}

/// Partition selectable records into groups.
///
/// Each record lands in the first group that matches it. Records that are
/// not selectable, and groups that end up empty, are left out.
pub fn group_records(records: &[PackageRecord]) -> Vec<RecordGroup<'_>> {
    let mut unclaimed: Vec<&PackageRecord> =
        records.iter().filter(|r| r.is_selectable()).collect();
    let mut groups = Vec::new();

    for kind in GroupKind::ALL {
        let (members, rest): (Vec<_>, Vec<_>) =
            unclaimed.into_iter().partition(|r| kind.matches(r));
        unclaimed = rest;
        if !members.is_empty() {
            groups.push(RecordGroup {
                kind,
                records: members,
            });
        }
    }
    groups
}

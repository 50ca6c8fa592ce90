//! Dependency analysis
//!
//! This module provides functionality to:
//! - Parse npm version ranges and compare versions
//! - Classify the update between the version in use and the latest release
//! - Build one record per package
//! - Aggregate records for every candidate package of a run

mod classifier;
mod range;
mod summary;

pub use classifier::{classify, resolve_latest, version_diff};
pub use range::{max_satisfying, parse_version, satisfies, valid_range, NpmRange};
pub use summary::{Exclusion, LocalFacts, PackageRecordBuilder};

use crate::config::RunContext;
use crate::domain::PackageRecord;
use crate::manifest::PackageJson;
use crate::progress::Progress;
use crate::registry::RegistryLookup;
use crate::usage::UsageReport;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Registry lookups in flight at once
pub const MAX_CONCURRENT_LOOKUPS: usize = 10;

/// A package-level failure surfaced next to the records
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageIssue {
    /// Package the issue belongs to
    pub package: String,
    /// Human-readable description
    pub message: String,
}

/// Result of analyzing one project (or the global install)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    /// One record per non-excluded candidate, in candidate order
    pub packages: Vec<PackageRecord>,
    /// Registry and manifest failures, in candidate order
    pub errors: Vec<PackageIssue>,
}

impl AnalysisResult {
    /// Split records into the result, collecting their diagnostics
    pub fn from_records(packages: Vec<PackageRecord>) -> Self {
        let errors = packages
            .iter()
            .flat_map(|record| {
                [&record.registry_error, &record.manifest_error]
                    .into_iter()
                    .flatten()
                    .map(|message| PackageIssue {
                        package: record.module_name.clone(),
                        message: message.clone(),
                    })
            })
            .collect();
        Self { packages, errors }
    }

    /// Records that have something to report
    pub fn needing_attention(&self) -> impl Iterator<Item = &PackageRecord> {
        self.packages.iter().filter(|r| r.needs_attention())
    }

    /// Returns true if nothing needs reporting
    pub fn is_clean(&self) -> bool {
        self.needing_attention().next().is_none()
    }
}

/// Names to analyze, in order and without duplicates.
///
/// Global mode: every globally installed package, sorted by name.
/// Project mode: `dependencies`, then `devDependencies`, then names the usage
/// report says are required but undeclared. The dependency filter drops whole
/// sections.
pub fn candidate_names(
    ctx: &RunContext,
    project: &PackageJson,
    global_packages: &BTreeMap<String, String>,
    usage: &UsageReport,
) -> Vec<String> {
    if ctx.global {
        return global_packages.keys().cloned().collect();
    }

    let production = project
        .dependencies
        .iter()
        .filter(|_| ctx.dependency_filter.includes_production())
        .map(|(name, _)| name.as_str());
    let dev = project
        .dev_dependencies
        .iter()
        .filter(|_| ctx.dependency_filter.includes_dev())
        .map(|(name, _)| name.as_str());

    let mut seen = HashSet::new();
    production
        .chain(dev)
        .chain(usage.missing_names())
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Analyze every candidate, at most [`MAX_CONCURRENT_LOOKUPS`] at a time.
/// Output order follows candidate order regardless of completion order.
pub async fn analyze(
    builder: &PackageRecordBuilder<'_>,
    registry: &dyn RegistryLookup,
    candidates: &[String],
    progress: &Progress,
) -> AnalysisResult {
    tracing::info!(
        count = candidates.len(),
        registry = registry.registry_name(),
        "analyzing packages"
    );

    let records: Vec<Option<PackageRecord>> = stream::iter(candidates)
        .map(|name| async move {
            let record = builder.summarize(registry, name).await;
            progress.checked(name);
            record
        })
        .buffered(MAX_CONCURRENT_LOOKUPS)
        .collect()
        .await;

    AnalysisResult::from_records(records.into_iter().flatten().collect())
}

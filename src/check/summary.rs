//! Per-package record construction
//!
//! Combines what package.json declares, what node_modules contains, what the
//! registry publishes and what the usage analyzer reported into one
//! [`PackageRecord`], or decides that the package is not reported at all.

use super::classifier::{classify, resolve_latest};
use super::range::{max_satisfying, parse_version, satisfies, valid_range};
use crate::config::RunContext;
use crate::domain::{BumpClass, PackageRecord};
use crate::error::RegistryError;
use crate::manifest::{InstalledPackage, ModuleLocator, PackageJson};
use crate::registry::{RegistryInfo, RegistryLookup};
use crate::usage::UsageReport;
use std::collections::BTreeMap;
use std::path::Path;

/// Why a package produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// The installed package.json says `"private": true`
    Private,
    /// The declared range is a git/file/URL spec that cannot be compared
    NotSemverRange,
    /// The name matches an ignore pattern
    Ignored,
}

/// Local facts gathered before the registry is consulted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFacts {
    /// Package name
    pub name: String,
    /// What is on disk
    pub installed: InstalledPackage,
    /// Range from package.json, or the installed version for global packages
    pub declared_range: Option<String>,
    /// Declared under devDependencies
    pub is_dev_dependency: bool,
}

/// Builds records from shared, read-only run inputs
pub struct PackageRecordBuilder<'a> {
    ctx: &'a RunContext,
    project: &'a PackageJson,
    global_packages: &'a BTreeMap<String, String>,
    usage: &'a UsageReport,
    locator: &'a ModuleLocator,
}

impl<'a> PackageRecordBuilder<'a> {
    /// Create a builder over the inputs of one run
    pub fn new(
        ctx: &'a RunContext,
        project: &'a PackageJson,
        global_packages: &'a BTreeMap<String, String>,
        usage: &'a UsageReport,
        locator: &'a ModuleLocator,
    ) -> Self {
        Self {
            ctx,
            project,
            global_packages,
            usage,
            locator,
        }
    }

    fn declared_range(&self, name: &str) -> Option<&str> {
        self.project
            .declared_range(name)
            .or_else(|| self.global_packages.get(name).map(String::as_str))
    }

    /// Gather on-disk facts and apply the exclusion filters, in order:
    /// private package, non-semver range, ignore pattern
    pub fn local_facts(&self, name: &str) -> Result<LocalFacts, Exclusion> {
        let installed = self.locator.inspect(name);
        if installed.private {
            return Err(Exclusion::Private);
        }

        let declared_range = self.declared_range(name);
        if declared_range.is_some_and(|range| !valid_range(range)) {
            return Err(Exclusion::NotSemverRange);
        }

        if self.ctx.ignore.matches(name) {
            return Err(Exclusion::Ignored);
        }

        Ok(LocalFacts {
            name: name.to_string(),
            installed,
            declared_range: declared_range.map(str::to_string),
            is_dev_dependency: self.project.is_dev_dependency(name),
        })
    }

    /// Classify a package from its local facts and the registry response
    pub fn build_record(
        &self,
        facts: LocalFacts,
        registry: Result<RegistryInfo, RegistryError>,
    ) -> PackageRecord {
        let name = facts.name.as_str();
        let mut record = PackageRecord::new(name, facts.installed.is_installed);
        record.is_dev_dependency = facts.is_dev_dependency;
        record.unused = self.usage.is_unused(name);
        record.missing_locations = self
            .usage
            .missing_files(name)
            .map(|files| found_in(files, &self.ctx.project_dir));
        record.used_in_scripts = self.project.script_mentioning(name).map(str::to_string);
        record.manifest_error = facts.installed.error.as_ref().map(ToString::to_string);

        let info = match registry {
            Ok(info) => info,
            Err(e) => {
                record.registry_error = Some(e.to_string());
                record.declared_range = facts.declared_range;
                record.installed = facts.installed.version;
                return record;
            }
        };

        let range = facts.declared_range.as_deref();
        let installed_version = facts.installed.version.as_deref();

        let latest = resolve_latest(installed_version, info.latest.as_deref(), &info.tags);
        let wanted = range
            .and_then(|r| max_satisfying(&info.versions, r))
            .map(str::to_string);
        let in_use = installed_version
            .map(str::to_string)
            .or_else(|| wanted.clone());
        let semver_valid = in_use.as_deref().and_then(parse_version).is_some();

        if record.manifest_error.is_none() {
            let bump = classify(in_use.as_deref(), latest.as_deref());
            let checked_range = range.filter(|r| valid_range(r));
            let checked_in_use = in_use.as_deref().filter(|_| semver_valid);

            if let (Some(range), Some(in_use)) = (checked_range, checked_in_use) {
                record.mismatch = !satisfies(in_use, range);
                record.easy_upgrade = latest.as_deref().is_some_and(|l| satisfies(l, range))
                    && bump != Some(BumpClass::Major);
            }
            record.bump = bump;
        }

        record.homepage = info.homepage;
        record.latest = latest;
        record.installed = in_use;
        record.package_wanted = wanted;
        record.declared_range = facts.declared_range;
        record.semver_valid = semver_valid;
        record
    }

    /// Build the record for one package, or None if it is excluded
    pub async fn summarize(
        &self,
        registry: &dyn RegistryLookup,
        name: &str,
    ) -> Option<PackageRecord> {
        let facts = match self.local_facts(name) {
            Ok(facts) => facts,
            Err(reason) => {
                tracing::debug!(package = name, ?reason, "package excluded");
                return None;
            }
        };

        let info = registry.lookup(name).await;
        if let Err(e) = &info {
            tracing::warn!(package = name, error = %e, "registry lookup failed");
        }
        Some(self.build_record(facts, info))
    }
}

/// "Found in: a.js, b.js" with paths shown relative to the project
fn found_in(files: &[String], project_dir: &Path) -> String {
    let shown: Vec<String> = files
        .iter()
        .map(|file| {
            Path::new(file)
                .strip_prefix(project_dir)
                .map(|rel| rel.display().to_string())
                .unwrap_or_else(|_| file.clone())
        })
        .collect();
    format!("Found in: {}", shown.join(", "))
}

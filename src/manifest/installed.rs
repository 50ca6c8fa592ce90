//! Installed package discovery under a node_modules directory

use super::PackageJson;
use crate::error::ManifestError;
use std::path::{Path, PathBuf};

/// Facts about a package as found on disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledPackage {
    /// The package directory exists
    pub is_installed: bool,
    /// `version` from the package's own package.json
    pub version: Option<String>,
    /// `private` from the package's own package.json
    pub private: bool,
    /// The directory exists but its package.json could not be read
    pub error: Option<ManifestError>,
}

/// Locates packages inside one node_modules root
#[derive(Debug, Clone)]
pub struct ModuleLocator {
    root: PathBuf,
}

impl ModuleLocator {
    /// Locator for `<project>/node_modules`
    pub fn for_project(project_dir: &Path) -> Self {
        Self::new(project_dir.join("node_modules"))
    }

    /// Locator for an explicit node_modules directory (e.g. the global root)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The node_modules directory this locator searches
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory a package would be installed in; scoped names nest one level
    pub fn module_path(&self, name: &str) -> PathBuf {
        name.split('/').fold(self.root.clone(), |path, part| path.join(part))
    }

    /// Inspect a package on disk
    pub fn inspect(&self, name: &str) -> InstalledPackage {
        let dir = self.module_path(name);
        if !dir.is_dir() {
            return InstalledPackage::default();
        }

        match PackageJson::read(&dir.join("package.json")) {
            Ok(pkg) => InstalledPackage {
                is_installed: true,
                version: pkg.version,
                private: pkg.private,
                error: None,
            },
            Err(error) => InstalledPackage {
                is_installed: true,
                error: Some(error),
                ..InstalledPackage::default()
            },
        }
    }

    /// Every package installed directly under the root with its version,
    /// sorted by name. Scoped packages (`@scope/name`) are included; dot
    /// directories such as `.bin` are not.
    pub fn list_installed(&self) -> Vec<(String, String)> {
        let mut names = Vec::new();
        for entry in read_dir_names(&self.root) {
            if entry.starts_with('.') {
                continue;
            }
            if entry.starts_with('@') {
                for scoped in read_dir_names(&self.root.join(&entry)) {
                    if !scoped.starts_with('.') {
                        names.push(format!("{}/{}", entry, scoped));
                    }
                }
            } else {
                names.push(entry);
            }
        }
        names.sort();

        names
            .into_iter()
            .filter_map(|name| {
                let pkg = PackageJson::read(&self.module_path(&name).join("package.json"));
                match pkg {
                    Ok(PackageJson {
                        version: Some(version),
                        ..
                    }) => Some((name, version)),
                    Ok(_) => None,
                    Err(e) => {
                        tracing::debug!(package = %name, error = %e, "skipping unreadable package");
                        None
                    }
                }
            })
            .collect()
    }
}

fn read_dir_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .filter_map(Result::ok)
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.file_name().into_string().ok())
        .collect()
}

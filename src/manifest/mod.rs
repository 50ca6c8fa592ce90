//! Manifest reading
//!
//! This module provides functionality to:
//! - Read a project's package.json (dependencies, devDependencies, scripts)
//! - Locate installed packages and read their own package.json

mod installed;
mod package_json;

pub use installed::{InstalledPackage, ModuleLocator};
pub use package_json::PackageJson;

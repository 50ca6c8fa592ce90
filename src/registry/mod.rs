//! Registry lookups for published package metadata
//!
//! This module provides:
//! - The `RegistryLookup` seam consumed by the record builder
//! - HTTP client shared foundation with retry logic
//! - npm registry implementation

mod client;
mod npm;

pub use client::HttpClient;
pub use npm::{NpmRegistry, DEFAULT_REGISTRY_URL};

use crate::error::RegistryError;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// What the registry knows about one package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryInfo {
    /// Version the `latest` dist-tag points at
    pub latest: Option<String>,
    /// Every published version
    pub versions: Vec<String>,
    /// All dist-tags (tag name -> version)
    pub tags: BTreeMap<String, String>,
    /// Project homepage, if any
    pub homepage: Option<String>,
}

/// Trait for registry lookups
#[async_trait]
pub trait RegistryLookup: Send + Sync {
    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// Fetch metadata for a package
    async fn lookup(&self, package: &str) -> Result<RegistryInfo, RegistryError>;
}

//! npm Registry adapter
//!
//! Fetches package metadata from an npm-compatible registry.
//! API endpoint: {registry}/{package}

use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryInfo, RegistryLookup};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Public npm registry base URL
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// npm Registry adapter
pub struct NpmRegistry {
    client: HttpClient,
    base_url: String,
}

/// npm package document (packument), only the fields we read
#[derive(Debug, Deserialize)]
struct Packument {
    #[serde(rename = "dist-tags", default)]
    dist_tags: BTreeMap<String, String>,
    #[serde(default)]
    versions: Map<String, Value>,
    #[serde(default)]
    homepage: Option<String>,
    #[serde(default)]
    repository: Option<Repository>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Repository {
    Url(String),
    Detailed { url: Option<String> },
}

impl NpmRegistry {
    /// Create an adapter for the public registry
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, DEFAULT_REGISTRY_URL)
    }

    /// Create an adapter for a custom registry (mirrors, private registries)
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Build the URL for a package; scoped names keep their `@` but escape the `/`
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}", self.base_url, package.replace('/', "%2F"))
    }
}

/// Convert a registry document into the facts the analysis needs
fn into_registry_info(doc: Packument) -> RegistryInfo {
    let latest = doc.dist_tags.get("latest").cloned();

    let homepage = doc
        .homepage
        .or_else(|| {
            latest
                .as_deref()
                .and_then(|l| doc.versions.get(l))
                .and_then(|v| v.get("homepage"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .or_else(|| {
            doc.repository.and_then(|repo| match repo {
                Repository::Url(url) => Some(url),
                Repository::Detailed { url } => url,
            })
            .map(|url| repository_homepage(&url))
        });

    RegistryInfo {
        latest,
        versions: doc.versions.keys().cloned().collect(),
        tags: doc.dist_tags,
        homepage,
    }
}

/// Turn a repository URL such as `git+https://github.com/a/b.git` into a browsable one
fn repository_homepage(url: &str) -> String {
    let url = url.strip_prefix("git+").unwrap_or(url);
    let url = url.strip_suffix(".git").unwrap_or(url);
    if let Some(rest) = url.strip_prefix("git://") {
        return format!("https://{}", rest);
    }
    if let Some(rest) = url.strip_prefix("git@") {
        return format!("https://{}", rest.replacen(':', "/", 1));
    }
    url.to_string()
}

#[async_trait]
impl RegistryLookup for NpmRegistry {
    fn registry_name(&self) -> &'static str {
        "npm"
    }

    async fn lookup(&self, package: &str) -> Result<RegistryInfo, RegistryError> {
        let url = self.build_url(package);
        tracing::debug!(package, %url, "fetching packument");
        let doc: Packument = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;

        Ok(into_registry_info(doc))
    }
}

//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues reading a package.json (project or installed package)
//! - RegistryError: Issues with npm registry communication
//! - ConfigError: Issues with CLI or config file configuration
//! - InstallError: Package manager invocation failures
//! - UsageError: Issues loading an unused/missing usage report

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::PackageManagerKind;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Package registry related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Package manager related errors
    #[error(transparent)]
    Install(#[from] InstallError),

    /// Usage report related errors
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// Terminal interaction failed
    #[error("failed to interact with terminal: {0}")]
    Prompt(#[source] std::io::Error),
}

/// Errors related to package.json reading
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    /// package.json does not exist
    #[error("A package.json was not found at {path}")]
    NotFound { path: PathBuf },

    /// package.json exists but could not be read or parsed
    #[error("A package.json was found at {path}, but it is not valid: {message}")]
    Invalid { path: PathBuf, message: String },
}

/// Errors related to package registry communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry} registry")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry} registry")]
    RateLimitExceeded { registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML
    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// Unknown package manager name
    #[error("invalid installer '{value}': expected 'auto', 'npm', 'yarn' or 'pnpm'")]
    InvalidInstaller { value: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },

    /// Global node_modules root could not be determined
    #[error("could not determine global node_modules directory: {message}")]
    GlobalRoot { message: String },
}

/// Errors raised while running the package manager
#[derive(Error, Debug)]
pub enum InstallError {
    /// The process could not be started
    #[error("failed to run {manager}: {source}")]
    Spawn {
        manager: PackageManagerKind,
        #[source]
        source: std::io::Error,
    },

    /// The process exited unsuccessfully
    #[error("{manager} {} exited with {status}", args.join(" "))]
    ExitStatus {
        manager: PackageManagerKind,
        args: Vec<String>,
        status: String,
    },
}

/// Errors related to loading a usage report
#[derive(Error, Debug)]
pub enum UsageError {
    /// Report file could not be read
    #[error("failed to read usage report {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report file is not valid JSON
    #[error("failed to parse usage report {path}: {message}")]
    ParseError { path: PathBuf, message: String },
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new Invalid error
    pub fn invalid(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::Invalid {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Classifies an IO failure: a missing file is `NotFound`, anything else `Invalid`
    pub fn from_io(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        if error.kind() == std::io::ErrorKind::NotFound {
            Self::not_found(path)
        } else {
            Self::invalid(path, format!("{:?}: {}", error.kind(), error))
        }
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new RateLimitExceeded error
    pub fn rate_limit_exceeded(registry: impl Into<String>) -> Self {
        RegistryError::RateLimitExceeded {
            registry: registry.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }
}

//! depaudit - npm dependency auditor library
//!
//! This library provides the core functionality for auditing a Node.js
//! project's dependencies:
//! - Outdated packages, classified by the kind of update available
//! - Installed versions that no longer match package.json
//! - Declared but missing packages, and used but undeclared ones
//! - Grouped, optionally interactive updates through npm, yarn or pnpm

pub mod check;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod package_manager;
pub mod progress;
pub mod registry;
pub mod update;
pub mod usage;

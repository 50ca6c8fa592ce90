//! Core domain models for depaudit
//!
//! This module contains the fundamental types used throughout the application:
//! - Bump classification between versions
//! - The per-package audit record
//! - Package manager identities

mod bump;
mod manager;
mod package_record;

pub use bump::BumpClass;
pub use manager::PackageManagerKind;
pub use package_record::PackageRecord;

//! Update flow for analyzed packages
//!
//! This module provides:
//! - Grouping of updatable records into ordered categories
//! - Selection strategies (everything, or prompt-driven)
//! - Install specifiers split into production and development batches
//! - The orchestrator that runs the package manager for each batch

mod command;
mod group;
mod orchestrator;
mod select;

pub use command::{build_specifier, UpdateBatches};
pub use group::{group_records, GroupKind, RecordGroup};
pub use orchestrator::{
    install_args, persistence_flags, BatchKind, InstallRunner, UpdateOrchestrator, UpdateOutcome,
    UpdateState,
};
pub use select::{AutoSelect, InteractiveSelect, SelectionStrategy};

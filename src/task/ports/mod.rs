//! Port contracts for task lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod directory;
pub mod store;

pub use directory::{DirectoryError, DirectoryResult, UserDirectory, UserRef};
pub use store::{TaskStore, TaskStoreError, TaskStoreResult};
